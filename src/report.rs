//! User-facing messages and the static model performance view.

use std::fmt::Write as _;

use crate::predict::{PredictError, Prediction};

/// Evaluation metrics measured when the shipped model was trained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSummary {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Metrics displayed on the performance view.
pub const PERFORMANCE: PerformanceSummary = PerformanceSummary {
    mse: 24.59,
    rmse: 4.96,
    mae: 3.89,
    r2: 0.90,
};

/// Feature importances displayed on the performance view, highest first.
pub const FEATURE_IMPORTANCES: [(&str, f64); 9] = [
    ("payment_type", 0.14),
    ("RatecodeID", 0.13),
    ("mta_tax", 0.12),
    ("month", 0.11),
    ("trip_type", 0.10),
    ("tip_amount", 0.09),
    ("day_of_week", 0.08),
    ("hour_of_day", 0.07),
    ("trip_distance", 0.06),
];

const BAR_WIDTH: usize = 40;

/// `Estimated Total Fare: $12.34`
pub fn success_message(prediction: &Prediction) -> String {
    format!("Estimated Total Fare: {prediction}")
}

/// `Prediction failed: <cause>`
pub fn failure_message(error: &PredictError) -> String {
    format!("Prediction failed: {error}")
}

/// Message for either outcome of a prediction.
pub fn outcome_message(outcome: &Result<Prediction, PredictError>) -> String {
    match outcome {
        Ok(prediction) => success_message(prediction),
        Err(error) => failure_message(error),
    }
}

/// Render the performance view as plain text: a metrics line followed by a
/// horizontal bar chart of feature importances.
pub fn render_performance() -> String {
    let mut out = String::new();
    let p = PERFORMANCE;

    let _ = writeln!(out, "Model Performance Analysis");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Mean Squared Error: {:.2}   RMSE: {:.2}   MAE: {:.2}   R² Score: {:.2}",
        p.mse, p.rmse, p.mae, p.r2
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Feature Importance");

    let max = FEATURE_IMPORTANCES
        .iter()
        .map(|&(_, w)| w)
        .fold(0.0_f64, f64::max);
    let label_width = FEATURE_IMPORTANCES
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    for (name, weight) in FEATURE_IMPORTANCES {
        let len = if max > 0.0 {
            ((weight / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{name:<label_width$}  {bar} {weight:.2}",
            bar = "█".repeat(len)
        );
    }

    out
}
