//! Feature building: raw trip input → values keyed by schema column.
//!
//! # Overview
//!
//! - [`RawInput`]: user-supplied trip attributes
//! - [`TripTimes`]: pickup/dropoff timestamps and the values derived from them
//! - [`CategoricalRegistry`]: one-hot families (rate code, payment type,
//!   trip type, weekday, hour of day)
//! - [`FeatureBuilder`]: fills every schema column
//!
//! Each schema column is resolved in a fixed order:
//!
//! 1. a categorical family claims it → 1.0 / 0.0 indicator; when a schema
//!    spells the active category more than once (`hour_8`, `hour_08`), only
//!    the first such column in schema order gets 1.0
//! 2. a direct field has that name → the field value
//! 3. otherwise → the fill value
//!
//! No step fails; an unknown category leaves every indicator of its
//! family at 0.0.

mod categorical;
mod input;

use std::collections::HashMap;

pub use categorical::{
    CategoricalFamily, CategoricalRegistry, Category, FamilyId, Selector, SuffixParser,
};
pub use input::{
    parse_weekday_name, weekday_name, InputError, RawInput, TripTimes, DEFAULT_CONGESTION_SURCHARGE,
    DEFAULT_EXTRA, DEFAULT_FARE_AMOUNT, DEFAULT_IMPROVEMENT_SURCHARGE, DEFAULT_MTA_TAX,
    DEFAULT_PASSENGER_COUNT, DEFAULT_TIP_AMOUNT, DEFAULT_TOLLS_AMOUNT, DEFAULT_TRIP_DISTANCE,
    PASSENGER_COUNT_RANGE, TRIP_DURATION_MINUTES, WEEKDAY_NAMES,
};

use crate::schema::Schema;

// =============================================================================
// Typical-trip constants
// =============================================================================
//
// These categorical values are not user-adjustable; every submission is
// treated as a standard-rate, credit-card, street-hail trip.

/// Standard rate.
pub const RATE_CODE_ID: u32 = 1;
/// Credit card.
pub const PAYMENT_TYPE: u32 = 1;
/// Street hail.
pub const TRIP_TYPE: u32 = 1;
pub const VENDOR_ID: u32 = 2;
pub const PICKUP_LOCATION_ID: u32 = 74;
pub const DROPOFF_LOCATION_ID: u32 = 75;
/// `"N"`: the trip record was not held in vehicle memory.
pub const STORE_AND_FWD_FLAG: u32 = 0;

/// Value for schema columns nothing else claims.
pub const DEFAULT_FILL_VALUE: f64 = 0.0;

/// Feature values keyed by schema column name.
pub type FeatureMap = HashMap<String, f64>;

/// Values of every non-indicator field the builder knows about.
///
/// Timestamps are Unix seconds of the naive local time.
pub fn direct_fields(input: &RawInput, times: &TripTimes) -> HashMap<&'static str, f64> {
    let mut fields: HashMap<&'static str, f64> = input.amounts().into_iter().collect();

    fields.insert("passenger_count", f64::from(input.passenger_count));
    fields.insert("trip_duration", times.duration_minutes());
    fields.insert(
        "lpep_pickup_datetime",
        times.pickup.and_utc().timestamp() as f64,
    );
    fields.insert(
        "lpep_dropoff_datetime",
        times.dropoff.and_utc().timestamp() as f64,
    );
    fields.insert("hour_of_day", f64::from(times.hour));
    fields.insert(
        "day_of_week",
        f64::from(times.weekday.num_days_from_monday()),
    );
    fields.insert("month", f64::from(times.month));

    fields.insert("RatecodeID", f64::from(RATE_CODE_ID));
    fields.insert("payment_type", f64::from(PAYMENT_TYPE));
    fields.insert("trip_type", f64::from(TRIP_TYPE));
    fields.insert("VendorID", f64::from(VENDOR_ID));
    fields.insert("PULocationID", f64::from(PICKUP_LOCATION_ID));
    fields.insert("DOLocationID", f64::from(DROPOFF_LOCATION_ID));
    fields.insert("store_and_fwd_flag", f64::from(STORE_AND_FWD_FLAG));

    fields
}

/// Maps raw input onto the columns of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder<'a> {
    registry: &'a CategoricalRegistry,
    fill_value: f64,
}

impl<'a> FeatureBuilder<'a> {
    /// Create a builder over `registry`, filling unmatched columns with
    /// `fill_value`.
    pub fn new(registry: &'a CategoricalRegistry, fill_value: f64) -> Self {
        Self {
            registry,
            fill_value,
        }
    }

    /// Build a value for every column of `schema`.
    pub fn build(&self, input: &RawInput, schema: &Schema) -> FeatureMap {
        let times = TripTimes::from_pickup(input.pickup());
        let direct = direct_fields(input, &times);

        let mut features = FeatureMap::with_capacity(schema.len());
        let mut matched: HashMap<FamilyId, bool> = HashMap::new();

        for column in schema.iter() {
            let value = if let Some((family, category)) = self.registry.classify(column) {
                let found = matched.entry(family.id()).or_default();
                let value = family.indicator(category, &times);
                if value == 1.0 && *found {
                    // another spelling of the active category already holds the 1.0
                    tracing::debug!(
                        column,
                        family = %family.id(),
                        "duplicate indicator column left at zero"
                    );
                    0.0
                } else {
                    *found |= value == 1.0;
                    value
                }
            } else if let Some(&value) = direct.get(column) {
                value
            } else {
                tracing::debug!(column, fill = self.fill_value, "no source for schema column");
                self.fill_value
            };
            features.insert(column.to_string(), value);
        }

        for (id, found) in matched {
            if !found {
                if let Some(family) = self.registry.family(id) {
                    tracing::debug!(
                        family = %id,
                        expected = family.active_column(&times),
                        "active category has no indicator column; family left at zero"
                    );
                }
            }
        }

        features
    }
}
