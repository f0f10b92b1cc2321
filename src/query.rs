//! One dashboard query, run to completion: resolve → fetch → filter → derive → forecast.
//!
//! Every failure mode terminates the current query with a user-visible state;
//! nothing is swallowed and nothing crosses into the next query.

use thiserror::Error;
use tinyrand::Rand;
use tracing::{debug, warn};

use crate::data::{self, GameLog, Season};
use crate::filter::{self, FilterSpec, Location};
use crate::forecast::{self, ForecastError, ForecastResult, Method};
use crate::roster::{PlayerRecord, Roster};
use crate::stats::{self, DerivedGameRecord, Stat};

/// Windows below this produce statistically fragile estimates; the pipeline
/// proceeds but logs a warning.
pub const MIN_RELIABLE_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub player: String,
    pub season: Season,
    pub spec: FilterSpec,
    /// Statistic to forecast; `None` skips the estimation stage.
    pub forecast_stat: Option<Stat>,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no roster entry for {0:?}")]
    PlayerNotFound(String),

    #[error("no games played in {0}")]
    EmptyGameLog(Season),

    #[error("no {location} games match the filter over {season}")]
    EmptyFilteredWindow { location: Location, season: Season },

    #[error("upstream provider failure: {0}")]
    Upstream(#[from] anyhow::Error),
}

/// Everything one rendered view needs: the windowed log, its reference means,
/// and the per-method estimates, with withheld predictions kept visible.
#[derive(Debug)]
pub struct Snapshot {
    pub player: PlayerRecord,
    pub games: Vec<DerivedGameRecord>,
    pub means: Vec<(Stat, f64)>,
    pub forecasts: Vec<ForecastResult>,
    pub withheld: Vec<(Method, ForecastError)>,
}

/// Resolves the player and fetches the live game log, then assembles the view.
/// Resolution failures halt the query before any fetch is attempted.
pub async fn run(
    query: &Query,
    roster: &Roster,
    methods: &[Method],
    rand: &mut impl Rand,
) -> Result<Snapshot, QueryError> {
    let player = roster
        .resolve(&query.player)
        .ok_or_else(|| QueryError::PlayerNotFound(query.player.clone()))?
        .clone();
    let log = data::fetch_game_log(player.id, &query.season).await?;
    assemble(player, log, query, methods, rand)
}

/// The pure remainder of the pipeline, shared by the live and snapshot paths.
pub fn assemble(
    player: PlayerRecord,
    log: GameLog,
    query: &Query,
    methods: &[Method],
    rand: &mut impl Rand,
) -> Result<Snapshot, QueryError> {
    if log.is_empty() {
        return Err(QueryError::EmptyGameLog(query.season.clone()));
    }
    let filtered = filter::filter(&log, &query.spec);
    if filtered.is_empty() {
        return Err(QueryError::EmptyFilteredWindow {
            location: query.spec.location,
            season: query.season.clone(),
        });
    }
    if filtered.len() < MIN_RELIABLE_WINDOW {
        warn!(
            "window of {} games is below the reliable minimum of {MIN_RELIABLE_WINDOW}",
            filtered.len()
        );
    }
    debug!(
        "assembling view for {}: {} of {} games after filtering",
        player.full_name,
        filtered.len(),
        log.len()
    );

    let games = stats::augment(&filtered);
    let means = stats::window_means(&games);

    let mut forecasts = vec![];
    let mut withheld = vec![];
    if let Some(stat) = query.forecast_stat {
        for method in methods {
            match forecast::predict(&games, stat, method, rand) {
                Ok(estimate) => forecasts.push(ForecastResult {
                    stat,
                    method: method.clone(),
                    estimate,
                }),
                Err(err) => {
                    warn!("{method} prediction for {stat} withheld: {err}");
                    withheld.push((method.clone(), err));
                }
            }
        }
    }

    Ok(Snapshot {
        player,
        games,
        means,
        forecasts,
        withheld,
    })
}
