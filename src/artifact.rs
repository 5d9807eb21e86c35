//! Model artifact loading.
//!
//! An artifact is a JSON file holding one of three shapes:
//!
//! ```text
//! {"model": {..}, "feature_names": [..]}   paired object
//! [{..}, [..]]                             paired array
//! {"kind": .., ..}                         bare model (with or without
//!                                          an embedded "feature_names")
//! ```
//!
//! Loading classifies the file into an [`ArtifactShape`] once, so schema
//! resolution handles each shape explicitly instead of probing fields.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::model::{ModelError, ModelPayload, Predict, Regressor};

/// Errors that can occur when loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized artifact layout: {0}")]
    Layout(String),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

/// Which of the three supported layouts an artifact used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactShape {
    /// Model stored alongside an explicit feature-name list.
    Paired,
    /// Model carries its own feature names.
    SelfDescribing,
    /// Model with no feature-name metadata at all.
    Unknown,
}

impl std::fmt::Display for ArtifactShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Paired => "paired",
            Self::SelfDescribing => "self-describing",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A loaded model artifact, classified by shape.
#[derive(Debug, Clone)]
pub enum ModelArtifact {
    /// `(model, feature_names)` pair. The paired list wins over any names
    /// embedded in the model.
    Paired {
        model: Regressor,
        feature_names: Vec<String>,
    },
    /// Model exposing `feature_names` natively.
    SelfDescribing { model: Regressor },
    /// Model without feature-name metadata.
    Unknown { model: Regressor },
}

impl ModelArtifact {
    /// Load an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let artifact = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            shape = %artifact.shape(),
            kind = artifact.model().kind(),
            n_features = artifact.model().n_features(),
            "loaded model artifact"
        );
        Ok(artifact)
    }

    /// Parse an artifact from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Parse an artifact from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Classify an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        match value {
            Value::Array(items) => Self::from_pair_array(items),
            Value::Object(mut map) if map.contains_key("model") => {
                let model = map
                    .remove("model")
                    .ok_or_else(|| LoadError::Layout("missing \"model\"".to_string()))?;
                let names = map.remove("feature_names").ok_or_else(|| {
                    LoadError::Layout("paired artifact has no \"feature_names\"".to_string())
                })?;
                Self::paired(model, names)
            }
            Value::Object(map) => {
                let payload: ModelPayload = serde_json::from_value(Value::Object(map))?;
                Ok(Self::bare(Regressor::try_from(payload)?))
            }
            other => Err(LoadError::Layout(format!(
                "expected an object or a [model, feature_names] pair, got {}",
                json_type_name(&other)
            ))),
        }
    }

    fn from_pair_array(items: Vec<Value>) -> Result<Self, LoadError> {
        let len = items.len();
        let mut items = items.into_iter();
        match (items.next(), items.next(), len) {
            (Some(model), Some(names), 2) => Self::paired(model, names),
            _ => Err(LoadError::Layout(format!(
                "paired array must have exactly 2 elements, got {len}"
            ))),
        }
    }

    fn paired(model: Value, names: Value) -> Result<Self, LoadError> {
        let payload: ModelPayload = serde_json::from_value(model)?;
        let feature_names: Vec<String> = serde_json::from_value(names)?;
        Ok(Self::Paired {
            model: Regressor::try_from(payload)?,
            feature_names,
        })
    }

    /// Wrap a model that was not stored with a paired name list.
    pub fn bare(model: Regressor) -> Self {
        if model.feature_names().is_some() {
            Self::SelfDescribing { model }
        } else {
            Self::Unknown { model }
        }
    }

    /// Artifact layout.
    pub fn shape(&self) -> ArtifactShape {
        match self {
            Self::Paired { .. } => ArtifactShape::Paired,
            Self::SelfDescribing { .. } => ArtifactShape::SelfDescribing,
            Self::Unknown { .. } => ArtifactShape::Unknown,
        }
    }

    /// The inference object.
    pub fn model(&self) -> &Regressor {
        match self {
            Self::Paired { model, .. }
            | Self::SelfDescribing { model }
            | Self::Unknown { model } => model,
        }
    }

    /// Consume the artifact, keeping only the inference object.
    pub fn into_model(self) -> Regressor {
        match self {
            Self::Paired { model, .. }
            | Self::SelfDescribing { model }
            | Self::Unknown { model } => model,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
