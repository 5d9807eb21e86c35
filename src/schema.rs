//! Feature schema and schema resolution.
//!
//! A [`Schema`] is the ordered, duplicate-free list of feature names a model
//! was trained on. [`SchemaResolver`] derives it from a loaded
//! [`ModelArtifact`] according to the artifact's shape.

use std::collections::HashMap;

use crate::artifact::ModelArtifact;
use crate::model::Predict;

/// Default raw schema, used when an artifact carries no feature names.
pub const DEFAULT_FEATURES: [&str; 10] = [
    "trip_distance",
    "fare_amount",
    "extra",
    "mta_tax",
    "tip_amount",
    "tolls_amount",
    "improvement_surcharge",
    "congestion_surcharge",
    "trip_duration",
    "passenger_count",
];

/// Errors that can occur while resolving or constructing a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("model artifact has no feature names and no fallback schema is allowed")]
    Unresolved,

    #[error("feature name list from the {origin} is empty")]
    Empty { origin: SchemaSource },

    #[error("feature name at position {position} is blank")]
    BlankName { position: usize },

    #[error("feature {name:?} appears at positions {first} and {second}")]
    Duplicate {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Where a resolved schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSource {
    /// List stored next to the model.
    PairedList,
    /// Names embedded in the model itself.
    ModelMetadata,
    /// [`DEFAULT_FEATURES`].
    DefaultFallback,
}

impl std::fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PairedList => "paired feature list",
            Self::ModelMetadata => "model metadata",
            Self::DefaultFallback => "default feature list",
        };
        f.write_str(name)
    }
}

/// Behaviour when the artifact carries no feature names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaFallback {
    /// Use [`DEFAULT_FEATURES`].
    #[default]
    Default,
    /// Fail with [`SchemaError::Unresolved`].
    Strict,
}

/// Ordered list of unique feature names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Create a schema, validating that names are non-blank and unique.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankName { position });
            }
            if let Some(&first) = index.get(name.as_str()) {
                return Err(SchemaError::Duplicate {
                    name: name.clone(),
                    first,
                    second: position,
                });
            }
            index.insert(name.clone(), position);
        }
        Ok(Self { names, index })
    }

    /// The ten-column default schema.
    pub fn default_features() -> Self {
        let names = DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect();
        Self::new(names).expect("default feature list is valid")
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema has no columns. Resolved schemas are never empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate column names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Column position by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// A schema together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub schema: Schema,
    pub source: SchemaSource,
}

/// Derives the canonical schema from a loaded artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaResolver {
    fallback: SchemaFallback,
}

impl SchemaResolver {
    /// Create a resolver with the given fallback policy.
    pub fn new(fallback: SchemaFallback) -> Self {
        Self { fallback }
    }

    /// Resolve the schema for `artifact`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Unresolved`] for an artifact without names under
    ///   [`SchemaFallback::Strict`]
    /// - [`SchemaError::Empty`], [`SchemaError::BlankName`] or
    ///   [`SchemaError::Duplicate`] for an unusable name list
    pub fn resolve(&self, artifact: &ModelArtifact) -> Result<ResolvedSchema, SchemaError> {
        let (names, source) = match artifact {
            ModelArtifact::Paired { feature_names, .. } => {
                (feature_names.clone(), SchemaSource::PairedList)
            }
            ModelArtifact::SelfDescribing { model } => {
                let names = model.feature_names().map(<[String]>::to_vec).unwrap_or_default();
                (names, SchemaSource::ModelMetadata)
            }
            ModelArtifact::Unknown { .. } => match self.fallback {
                SchemaFallback::Default => {
                    tracing::warn!(
                        "model artifact has no feature names, using the default feature list"
                    );
                    let names = DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect();
                    (names, SchemaSource::DefaultFallback)
                }
                SchemaFallback::Strict => return Err(SchemaError::Unresolved),
            },
        };

        if names.is_empty() {
            return Err(SchemaError::Empty { origin: source });
        }
        let schema = Schema::new(names)?;

        let n_features = artifact.model().n_features();
        if n_features != schema.len() {
            tracing::warn!(
                schema_len = schema.len(),
                n_features,
                shape = %artifact.shape(),
                "resolved schema length differs from the model's feature count"
            );
        }
        tracing::debug!(%source, n_columns = schema.len(), "resolved feature schema");

        Ok(ResolvedSchema { schema, source })
    }
}
