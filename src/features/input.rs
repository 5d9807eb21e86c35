//! Raw trip input and the values derived from it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Fixed trip duration assumed for every submission, in minutes.
///
/// Dropoff time is always pickup + this offset; it is never computed from
/// an independent dropoff input.
pub const TRIP_DURATION_MINUTES: i64 = 15;

// Form defaults.
pub const DEFAULT_TRIP_DISTANCE: f64 = 2.5;
pub const DEFAULT_FARE_AMOUNT: f64 = 10.0;
pub const DEFAULT_MTA_TAX: f64 = 0.5;
pub const DEFAULT_TOLLS_AMOUNT: f64 = 0.0;
pub const DEFAULT_TIP_AMOUNT: f64 = 2.0;
pub const DEFAULT_PASSENGER_COUNT: u8 = 1;
pub const DEFAULT_EXTRA: f64 = 0.0;
pub const DEFAULT_IMPROVEMENT_SURCHARGE: f64 = 0.3;
pub const DEFAULT_CONGESTION_SURCHARGE: f64 = 2.5;

/// Accepted passenger counts.
pub const PASSENGER_COUNT_RANGE: std::ops::RangeInclusive<u8> = 1..=6;

/// Errors reported when validating user input at the form boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("passenger count must be between 1 and 6, got {0}")]
    PassengerCount(u8),

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// User-supplied trip attributes for one submission.
///
/// Only `pickup_date` and `pickup_time` are required when deserializing;
/// every amount falls back to the form default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    #[serde(default = "default_trip_distance")]
    pub trip_distance: f64,
    #[serde(default = "default_fare_amount")]
    pub fare_amount: f64,
    #[serde(default = "default_mta_tax")]
    pub mta_tax: f64,
    #[serde(default = "default_tolls_amount")]
    pub tolls_amount: f64,
    #[serde(default = "default_tip_amount")]
    pub tip_amount: f64,
    #[serde(default = "default_passenger_count")]
    pub passenger_count: u8,
    #[serde(default = "default_extra")]
    pub extra: f64,
    #[serde(default = "default_improvement_surcharge")]
    pub improvement_surcharge: f64,
    #[serde(default = "default_congestion_surcharge")]
    pub congestion_surcharge: f64,
}

fn default_trip_distance() -> f64 {
    DEFAULT_TRIP_DISTANCE
}
fn default_fare_amount() -> f64 {
    DEFAULT_FARE_AMOUNT
}
fn default_mta_tax() -> f64 {
    DEFAULT_MTA_TAX
}
fn default_tolls_amount() -> f64 {
    DEFAULT_TOLLS_AMOUNT
}
fn default_tip_amount() -> f64 {
    DEFAULT_TIP_AMOUNT
}
fn default_passenger_count() -> u8 {
    DEFAULT_PASSENGER_COUNT
}
fn default_extra() -> f64 {
    DEFAULT_EXTRA
}
fn default_improvement_surcharge() -> f64 {
    DEFAULT_IMPROVEMENT_SURCHARGE
}
fn default_congestion_surcharge() -> f64 {
    DEFAULT_CONGESTION_SURCHARGE
}

impl RawInput {
    /// Input for a pickup at `date` and `time` with every amount at its
    /// form default.
    pub fn new(pickup_date: NaiveDate, pickup_time: NaiveTime) -> Self {
        Self {
            pickup_date,
            pickup_time,
            trip_distance: DEFAULT_TRIP_DISTANCE,
            fare_amount: DEFAULT_FARE_AMOUNT,
            mta_tax: DEFAULT_MTA_TAX,
            tolls_amount: DEFAULT_TOLLS_AMOUNT,
            tip_amount: DEFAULT_TIP_AMOUNT,
            passenger_count: DEFAULT_PASSENGER_COUNT,
            extra: DEFAULT_EXTRA,
            improvement_surcharge: DEFAULT_IMPROVEMENT_SURCHARGE,
            congestion_surcharge: DEFAULT_CONGESTION_SURCHARGE,
        }
    }

    /// Check the constraints the form enforces on its widgets.
    pub fn validate(&self) -> Result<(), InputError> {
        if !PASSENGER_COUNT_RANGE.contains(&self.passenger_count) {
            return Err(InputError::PassengerCount(self.passenger_count));
        }
        for (field, value) in self.amounts() {
            if !value.is_finite() {
                return Err(InputError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Numeric amounts keyed by their feature name.
    pub fn amounts(&self) -> [(&'static str, f64); 8] {
        [
            ("trip_distance", self.trip_distance),
            ("fare_amount", self.fare_amount),
            ("extra", self.extra),
            ("mta_tax", self.mta_tax),
            ("tip_amount", self.tip_amount),
            ("tolls_amount", self.tolls_amount),
            ("improvement_surcharge", self.improvement_surcharge),
            ("congestion_surcharge", self.congestion_surcharge),
        ]
    }

    /// Pickup timestamp (date + time, naive local time).
    pub fn pickup(&self) -> NaiveDateTime {
        self.pickup_date.and_time(self.pickup_time)
    }
}

/// Values derived from the pickup timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripTimes {
    pub pickup: NaiveDateTime,
    pub dropoff: NaiveDateTime,
    pub weekday: Weekday,
    pub hour: u32,
    pub month: u32,
}

impl TripTimes {
    /// Derive dropoff, weekday, hour and month from the pickup timestamp.
    pub fn from_pickup(pickup: NaiveDateTime) -> Self {
        Self {
            pickup,
            dropoff: pickup + TimeDelta::minutes(TRIP_DURATION_MINUTES),
            weekday: pickup.weekday(),
            hour: pickup.hour(),
            month: pickup.month(),
        }
    }

    /// Trip duration in minutes.
    pub fn duration_minutes(&self) -> f64 {
        (self.dropoff - self.pickup).num_seconds() as f64 / 60.0
    }

    /// English weekday name, e.g. `"Monday"`.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Full English names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Parse a full English weekday name (exact case).
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    WEEKDAY_NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| WEEKDAYS[i])
}
