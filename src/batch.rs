//! JSON-lines batch estimation.
//!
//! Each non-blank line is one [`RawInput`] object. Lines are estimated
//! independently: a malformed or invalid line produces an
//! `Invalid input on line N: ...` message and processing moves on.

use std::io::{self, BufRead, Write};

use crate::estimator::Estimator;
use crate::features::{InputError, RawInput};
use crate::report::outcome_message;

/// Reasons a batch line is rejected before estimation.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Counts of estimated and failed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub ok: usize,
    pub failed: usize,
}

/// Parse and validate one line.
pub fn parse_line(line: &str) -> Result<RawInput, LineError> {
    let input: RawInput = serde_json::from_str(line)?;
    input.validate()?;
    Ok(input)
}

/// Estimate every line of `reader`, writing one message per non-blank line
/// to `out`. Line numbers count blank lines too.
///
/// # Errors
///
/// Only I/O errors on `reader` or `out`; bad lines are counted in the
/// summary.
pub fn run<R: BufRead, W: Write>(
    estimator: &Estimator,
    reader: R,
    mut out: W,
) -> io::Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;

        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!(line_no, error = %e, "rejected batch line");
                summary.failed += 1;
                writeln!(out, "Invalid input on line {line_no}: {e}")?;
                continue;
            }
        };

        let outcome = estimator.estimate(&input);
        if outcome.is_ok() {
            summary.ok += 1;
        } else {
            summary.failed += 1;
        }
        writeln!(out, "{}", outcome_message(&outcome))?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use ndarray::Array1;

    use super::*;
    use crate::artifact::ModelArtifact;
    use crate::config::EstimatorConfig;
    use crate::model::LinearModel;

    fn estimator(n_features: usize) -> Estimator {
        let model = LinearModel::new(Array1::ones(n_features), 0.0);
        Estimator::from_artifact(ModelArtifact::bare(model.into()), EstimatorConfig::default())
            .unwrap()
    }

    fn run_lines(estimator: &Estimator, lines: &str) -> (BatchSummary, Vec<String>) {
        let mut out = Vec::new();
        let summary = run(estimator, lines.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        (summary, text.lines().map(str::to_string).collect())
    }

    #[test]
    fn continues_past_bad_lines() {
        let lines = concat!(
            r#"{"pickup_date": "2024-01-15", "pickup_time": "09:00:00"}"#,
            "\n\n",
            r#"{"pickup_date": "2024-01-15", "#,
            "\n",
            r#"{"pickup_date": "2024-01-15", "pickup_time": "09:00:00", "passenger_count": 9}"#,
            "\n",
            r#"{"pickup_date": "2024-01-15", "pickup_time": "09:00:00", "tip_amount": 0.0}"#,
            "\n",
        );
        let (summary, messages) = run_lines(&estimator(10), lines);

        assert_eq!(summary, BatchSummary { ok: 2, failed: 2 });
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], "Estimated Total Fare: $33.80");
        assert!(messages[1].starts_with("Invalid input on line 3: "), "{}", messages[1]);
        assert_eq!(
            messages[2],
            "Invalid input on line 4: passenger count must be between 1 and 6, got 9"
        );
        assert_eq!(messages[3], "Estimated Total Fare: $31.80");
    }

    #[test]
    fn missing_pickup_is_rejected() {
        let err = parse_line(r#"{"pickup_date": "2024-01-15"}"#).unwrap_err();
        assert!(matches!(err, LineError::Json(_)));
        assert!(err.to_string().contains("pickup_time"));
    }

    #[test]
    fn prediction_failures_are_counted() {
        let lines = r#"{"pickup_date": "2024-01-15", "pickup_time": "09:00:00"}"#;
        let (summary, messages) = run_lines(&estimator(3), lines);

        assert_eq!(summary, BatchSummary { ok: 0, failed: 1 });
        assert_eq!(
            messages,
            ["Prediction failed: model expects 3 features but received 10"]
        );
    }
}
