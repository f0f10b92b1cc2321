//! Gradient-boosted regression stumps over per-game feature rows.
//!
//! Squared loss, so each round fits the current residuals. Rows are expected in
//! chronological order; the trailing share of them is withheld from training and
//! gates the ensemble size (the round count with the lowest validation error wins).

use thiserror::Error;

/// Fitting needs at least one training and one validation row.
pub const MIN_ROWS: usize = 2;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("insufficient data: {rows} complete rows, at least {MIN_ROWS} required")]
    InsufficientData { rows: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Boosting rounds fitted before validation gating.
    pub rounds: usize,
    pub learning_rate: f64,
    /// Trailing share of rows withheld for validation, clamped to at least one
    /// row on either side of the split.
    pub holdout_ratio: f64,
}
impl Config {
    fn validate(&self) -> Result<(), FitError> {
        if self.rounds == 0 {
            return Err(FitError::InvalidConfig("rounds must be at least 1".into()));
        }
        if self.learning_rate <= 0.0 || self.learning_rate > 1.0 {
            return Err(FitError::InvalidConfig(format!(
                "learning rate {} outside (0, 1]",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.holdout_ratio) {
            return Err(FitError::InvalidConfig(format!(
                "holdout ratio {} outside [0, 1)",
                self.holdout_ratio
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: 200,
            learning_rate: 0.1,
            holdout_ratio: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Stump {
    feature: usize,
    threshold: f64,
    below: f64,
    above: f64,
}
impl Stump {
    #[inline]
    fn predict(&self, row: &[f64]) -> f64 {
        if row[self.feature] <= self.threshold {
            self.below
        } else {
            self.above
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientBoostedModel {
    base: f64,
    learning_rate: f64,
    stumps: Vec<Stump>,
}
impl GradientBoostedModel {
    /// Fits an ensemble to `(rows, targets)` pairs. Rows must share a width and
    /// be chronological; the most recent ones form the validation holdout.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], config: &Config) -> Result<Self, FitError> {
        config.validate()?;
        assert_eq!(rows.len(), targets.len(), "row/target count mismatch");
        if rows.len() < MIN_ROWS {
            return Err(FitError::InsufficientData { rows: rows.len() });
        }

        let holdout = ((rows.len() as f64 * config.holdout_ratio).round() as usize)
            .clamp(1, rows.len() - 1);
        let split = rows.len() - holdout;
        let (train_rows, valid_rows) = rows.split_at(split);
        let (train_targets, valid_targets) = targets.split_at(split);

        let base = train_targets.iter().sum::<f64>() / train_targets.len() as f64;
        let mut model = Self {
            base,
            learning_rate: config.learning_rate,
            stumps: Vec::with_capacity(config.rounds),
        };

        let candidates = candidate_splits(train_rows);
        let mut residuals: Vec<f64> = train_targets
            .iter()
            .map(|&target| target - base)
            .collect();

        let mut best_rounds = 0;
        let mut best_error = model.validation_error(valid_rows, valid_targets);
        for _ in 0..config.rounds {
            let Some(stump) = best_stump(train_rows, &residuals, &candidates) else {
                break;
            };
            for (row, residual) in train_rows.iter().zip(residuals.iter_mut()) {
                *residual -= config.learning_rate * stump.predict(row);
            }
            model.stumps.push(stump);

            let error = model.validation_error(valid_rows, valid_targets);
            if error < best_error {
                best_error = error;
                best_rounds = model.stumps.len();
            }
        }
        model.stumps.truncate(best_rounds);
        Ok(model)
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.base
            + self.learning_rate
                * self
                    .stumps
                    .iter()
                    .map(|stump| stump.predict(row))
                    .sum::<f64>()
    }

    /// Rounds retained after validation gating.
    pub fn rounds(&self) -> usize {
        self.stumps.len()
    }

    fn validation_error(&self, rows: &[Vec<f64>], targets: &[f64]) -> f64 {
        let sum_sq: f64 = rows
            .iter()
            .zip(targets)
            .map(|(row, &target)| (target - self.predict(row)).powi(2))
            .sum();
        (sum_sq / rows.len() as f64).sqrt()
    }
}

/// Midpoints between consecutive distinct values, per feature.
fn candidate_splits(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.first().map(Vec::len).unwrap_or_default();
    (0..width)
        .map(|feature| {
            let mut values: Vec<f64> = rows.iter().map(|row| row[feature]).collect();
            values.sort_unstable_by(|a, b| a.total_cmp(b));
            values.dedup();
            values
                .windows(2)
                .map(|pair| (pair[0] + pair[1]) / 2.0)
                .collect()
        })
        .collect()
}

/// The stump minimising the squared error of the residuals, or `None` when no
/// feature admits a split (all rows identical).
fn best_stump(rows: &[Vec<f64>], residuals: &[f64], candidates: &[Vec<f64>]) -> Option<Stump> {
    let mut best: Option<(f64, Stump)> = None;
    for (feature, thresholds) in candidates.iter().enumerate() {
        for &threshold in thresholds {
            let (mut below_sum, mut below_count) = (0.0, 0usize);
            let (mut above_sum, mut above_count) = (0.0, 0usize);
            for (row, &residual) in rows.iter().zip(residuals) {
                if row[feature] <= threshold {
                    below_sum += residual;
                    below_count += 1;
                } else {
                    above_sum += residual;
                    above_count += 1;
                }
            }
            if below_count == 0 || above_count == 0 {
                continue;
            }
            let below = below_sum / below_count as f64;
            let above = above_sum / above_count as f64;
            let sse: f64 = rows
                .iter()
                .zip(residuals)
                .map(|(row, &residual)| {
                    let fitted = if row[feature] <= threshold { below } else { above };
                    (residual - fitted).powi(2)
                })
                .sum();
            let stump = Stump {
                feature,
                threshold,
                below,
                above,
            };
            match &best {
                Some((best_sse, _)) if sse >= *best_sse => {}
                _ => best = Some((sse, stump)),
            }
        }
    }
    best.map(|(_, stump)| stump)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;

    fn monotone_rows(count: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let rows: Vec<Vec<f64>> = (0..count).map(|i| vec![i as f64, 1.0]).collect();
        let targets: Vec<f64> = (0..count).map(|i| 2.0 * i as f64).collect();
        (rows, targets)
    }

    #[test]
    fn rejects_zero_rows() {
        let err = GradientBoostedModel::fit(&[], &[], &Config::default()).unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { rows: 0 }));
    }

    #[test]
    fn rejects_single_row() {
        let err =
            GradientBoostedModel::fit(&[vec![1.0, 2.0]], &[3.0], &Config::default()).unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { rows: 1 }));
    }

    #[test]
    fn rejects_invalid_config() {
        let (rows, targets) = monotone_rows(10);
        for config in [
            Config {
                rounds: 0,
                ..Config::default()
            },
            Config {
                learning_rate: 0.0,
                ..Config::default()
            },
            Config {
                learning_rate: 1.5,
                ..Config::default()
            },
            Config {
                holdout_ratio: 1.0,
                ..Config::default()
            },
        ] {
            let outcome = GradientBoostedModel::fit(&rows, &targets, &config);
            assert!(matches!(outcome, Err(FitError::InvalidConfig(_))));
        }
    }

    #[test]
    fn constant_targets_predict_the_constant() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets = vec![7.0; 10];
        let model = GradientBoostedModel::fit(&rows, &targets, &Config::default()).unwrap();
        assert_float_relative_eq!(7.0, model.predict(&[3.0]));
        assert_float_relative_eq!(7.0, model.predict(&[42.0]));
    }

    #[test]
    fn monotone_targets_order_predictions() {
        let (rows, targets) = monotone_rows(20);
        let model = GradientBoostedModel::fit(&rows, &targets, &Config::default()).unwrap();
        let low = model.predict(&[1.0, 1.0]);
        let high = model.predict(&[18.0, 1.0]);
        assert!(low < high, "expected {low} < {high}");
        assert!(low >= 0.0 && high <= 38.0, "predictions escaped target range");
    }

    #[test]
    fn validation_gates_ensemble_size() {
        let (rows, targets) = monotone_rows(20);
        let config = Config {
            rounds: 50,
            ..Config::default()
        };
        let model = GradientBoostedModel::fit(&rows, &targets, &config).unwrap();
        assert!(model.rounds() <= config.rounds);
    }

    #[test]
    fn identical_rows_fall_back_to_base() {
        let rows = vec![vec![5.0, 1.0]; 6];
        let targets = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let model = GradientBoostedModel::fit(&rows, &targets, &Config::default()).unwrap();
        assert_eq!(0, model.rounds());
        // base is the training mean: 5 training rows, 1 held out
        assert_float_relative_eq!(3.0, model.predict(&[5.0, 1.0]));
    }

    #[test]
    fn fit_is_deterministic() {
        let (rows, targets) = monotone_rows(15);
        let first = GradientBoostedModel::fit(&rows, &targets, &Config::default()).unwrap();
        let second = GradientBoostedModel::fit(&rows, &targets, &Config::default()).unwrap();
        assert_eq!(first, second);
    }
}
