//! Next-game point estimation over a windowed statistic sequence.
//!
//! The methods form a closed set, dispatched per variant. The stochastic ones
//! consume an injected [Rand]; fitted models live for a single call and are
//! never cached across requests.

use linregress::fit_low_level_regression_model;
use strum_macros::Display;
use thiserror::Error;
use tinyrand::{Rand, RandRange};

use crate::boost::{self, GradientBoostedModel};
use crate::poisson;
use crate::stats::{self, DerivedGameRecord, Stat};

/// Resamples drawn by [Method::ResamplingAverage] unless overridden.
pub const DEFAULT_RESAMPLES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum Method {
    /// Ordinary least squares over (game index, value), evaluated one game past
    /// the window. Deterministic.
    #[strum(serialize = "linear trend")]
    LinearTrend,

    /// Mean of `resamples` draws with replacement from the window values.
    #[strum(serialize = "resampling average")]
    ResamplingAverage { resamples: usize },

    /// One Poisson variate at a rate equal to the window mean.
    #[strum(serialize = "count process")]
    CountProcess,

    /// Gradient-boosted regression over the per-game feature breakdown,
    /// predicting from the most recent complete game.
    #[strum(serialize = "gradient boosted")]
    GradientBoosted(boost::Config),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub stat: Stat,
    pub method: Method,
    pub estimate: f64,
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("no recorded values for the statistic in the window")]
    EmptyWindow,

    #[error("{0}")]
    Model(#[from] boost::FitError),

    #[error("trend fit failed: {0}")]
    Trend(#[from] linregress::Error),
}

/// Estimates the next game's value of `stat` over the filtered window.
pub fn predict(
    games: &[DerivedGameRecord],
    stat: Stat,
    method: &Method,
    rand: &mut impl Rand,
) -> Result<f64, ForecastError> {
    match method {
        Method::LinearTrend => linear_trend(&samples(games, stat)?),
        Method::ResamplingAverage { resamples } => {
            Ok(resampling_average(&samples(games, stat)?, *resamples, rand))
        }
        Method::CountProcess => Ok(count_process(&samples(games, stat)?, rand)),
        Method::GradientBoosted(config) => gradient_boosted(games, stat, config),
    }
}

fn samples(games: &[DerivedGameRecord], stat: Stat) -> Result<Vec<f64>, ForecastError> {
    let series = stats::series(games, stat);
    if series.is_empty() {
        return Err(ForecastError::EmptyWindow);
    }
    Ok(series)
}

fn linear_trend(samples: &[f64]) -> Result<f64, ForecastError> {
    if samples.len() == 1 {
        // a single observation carries no trend
        return Ok(samples[0]);
    }
    let rows = samples.len();
    // row-major (response, intercept, index) triples
    let mut data = Vec::with_capacity(rows * 3);
    for (index, &value) in samples.iter().enumerate() {
        data.extend_from_slice(&[value, 1.0, index as f64]);
    }
    let model = fit_low_level_regression_model(&data, rows, 3)?;
    let coefficients = model.parameters();
    Ok(coefficients[0] + coefficients[1] * rows as f64)
}

fn resampling_average(samples: &[f64], resamples: usize, rand: &mut impl Rand) -> f64 {
    debug_assert!(!samples.is_empty());
    let mut sum = 0.0;
    for _ in 0..resamples {
        sum += samples[rand.next_range(0..samples.len())];
    }
    sum / resamples as f64
}

fn count_process(samples: &[f64], rand: &mut impl Rand) -> f64 {
    debug_assert!(!samples.is_empty());
    let rate = samples.iter().sum::<f64>() / samples.len() as f64;
    poisson::draw(rate, rand) as f64
}

/// Feature vector for the tree regressor: minutes plus the attempt and
/// peripheral box-score breakdown. `None` when any component is unrecorded.
fn feature_row(game: &DerivedGameRecord) -> Option<Vec<f64>> {
    let minutes = game.base.minutes?;
    Some(vec![
        minutes,
        game.base.fg_attempts.into(),
        game.base.rebounds.into(),
        game.base.assists.into(),
        game.base.steals.into(),
        game.base.blocks.into(),
        game.base.turnovers.into(),
        game.base.fouls.into(),
    ])
}

fn gradient_boosted(
    games: &[DerivedGameRecord],
    stat: Stat,
    config: &boost::Config,
) -> Result<f64, ForecastError> {
    let mut rows = Vec::with_capacity(games.len());
    let mut targets = Vec::with_capacity(games.len());
    for game in games {
        // rows missing any feature or the target are dropped before fitting
        if let (Some(features), Some(target)) = (feature_row(game), stat.value(game)) {
            rows.push(features);
            targets.push(target);
        }
    }
    let model = GradientBoostedModel::fit(&rows, &targets, config)?;
    let latest = rows.last().ok_or(ForecastError::EmptyWindow)?;
    Ok(model.predict(latest))
}

/// Exercises every estimation strategy with its default parameters.
pub fn default_methods() -> Vec<Method> {
    vec![
        Method::LinearTrend,
        Method::ResamplingAverage {
            resamples: DEFAULT_RESAMPLES,
        },
        Method::CountProcess,
        Method::GradientBoosted(boost::Config::default()),
    ]
}
