//! Pipeline configuration with builder pattern.
//!
//! [`EstimatorConfig`] uses the `bon` crate for builder generation and is
//! validated when built.
//!
//! # Example
//!
//! ```
//! use fare_estimator::config::EstimatorConfig;
//! use fare_estimator::schema::SchemaFallback;
//!
//! // All defaults
//! let config = EstimatorConfig::builder().build().unwrap();
//!
//! // Refuse to guess a schema for models without feature names
//! let config = EstimatorConfig::builder()
//!     .schema_fallback(SchemaFallback::Strict)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::features::{CategoricalRegistry, DEFAULT_FILL_VALUE};
use crate::schema::SchemaFallback;

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("fill_value must be finite, got {0}")]
    NonFiniteFillValue(f64),
}

/// Configuration for an [`Estimator`](crate::estimator::Estimator).
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct EstimatorConfig {
    /// What to do when the artifact has no feature names.
    /// Default: [`SchemaFallback::Default`].
    #[builder(default)]
    pub schema_fallback: SchemaFallback,

    /// Value for schema columns the builder has no source for. Default: 0.0.
    #[builder(default = DEFAULT_FILL_VALUE)]
    pub fill_value: f64,

    /// One-hot families. Default: [`CategoricalRegistry::standard`].
    #[builder(default)]
    pub registry: CategoricalRegistry,
}

/// Custom finishing function that validates the config.
impl<S: estimator_config_builder::IsComplete> EstimatorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteFillValue`] if `fill_value` is NaN
    /// or infinite.
    pub fn build(self) -> Result<EstimatorConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl EstimatorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.fill_value.is_finite() {
            return Err(ConfigError::NonFiniteFillValue(self.fill_value));
        }
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            schema_fallback: SchemaFallback::default(),
            fill_value: DEFAULT_FILL_VALUE,
            registry: CategoricalRegistry::standard(),
        }
    }
}
