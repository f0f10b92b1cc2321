//! Derived statistics over a filtered game log.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

use crate::data::GameRecord;

/// The box-score statistics the dashboard tracks and forecasts. `PRA` is the
/// composite points + rebounds + assists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Stat {
    #[strum(serialize = "PTS")]
    Pts,
    #[strum(serialize = "REB")]
    Reb,
    #[strum(serialize = "AST")]
    Ast,
    #[strum(serialize = "PRA")]
    Pra,
    #[strum(serialize = "MIN")]
    Min,
    #[strum(serialize = "FGA")]
    Fga,
}
impl Stat {
    /// This statistic's value for one game; `None` when the underlying
    /// box-score field was not recorded.
    pub fn value(&self, game: &DerivedGameRecord) -> Option<f64> {
        match self {
            Stat::Pts => Some(game.base.points.into()),
            Stat::Reb => Some(game.base.rebounds.into()),
            Stat::Ast => Some(game.base.assists.into()),
            Stat::Pra => Some(game.pra.into()),
            Stat::Min => game.base.minutes,
            Stat::Fga => Some(game.base.fg_attempts.into()),
        }
    }
}

/// A game record augmented with the composite statistic. Computed, never
/// persisted independently of its source record.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedGameRecord {
    pub base: GameRecord,
    pub pra: u16,
}

/// Augments each record with `PRA = PTS + REB + AST`, exact integer arithmetic.
pub fn augment(log: &[GameRecord]) -> Vec<DerivedGameRecord> {
    log.iter()
        .map(|game| DerivedGameRecord {
            pra: game.points + game.rebounds + game.assists,
            base: game.clone(),
        })
        .collect()
}

/// The windowed value sequence for one statistic, in game order, skipping
/// games where the statistic was not recorded.
pub fn series(games: &[DerivedGameRecord], stat: Stat) -> Vec<f64> {
    games.iter().filter_map(|game| stat.value(game)).collect()
}

/// Arithmetic mean; undefined over an empty sequence.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of every tracked statistic over the window, omitting statistics with
/// no recorded values. Used as the chart reference line and as forecast input.
pub fn window_means(games: &[DerivedGameRecord]) -> Vec<(Stat, f64)> {
    Stat::iter()
        .filter_map(|stat| mean(&series(games, stat)).map(|mean| (stat, mean)))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use strum::EnumCount;

    use super::*;
    use crate::testing::game;

    fn sample_games() -> Vec<DerivedGameRecord> {
        let mut first = game("2024-01-01", "LAL vs. BOS");
        first.points = 30;
        first.rebounds = 10;
        first.assists = 5;
        first.fg_attempts = 20;
        first.minutes = Some(38.0);
        let mut second = game("2024-01-03", "LAL @ DEN");
        second.points = 20;
        second.rebounds = 6;
        second.assists = 9;
        second.fg_attempts = 16;
        second.minutes = None;
        augment(&[first, second])
    }

    #[test]
    fn composite_equals_sum_of_parts() {
        let games = sample_games();
        for game in &games {
            assert_eq!(
                game.base.points + game.base.rebounds + game.base.assists,
                game.pra
            );
        }
        assert_eq!(45, games[0].pra);
        assert_eq!(35, games[1].pra);
    }

    #[test]
    fn series_skips_unrecorded_values() {
        let games = sample_games();
        assert_eq!(vec![30.0, 20.0], series(&games, Stat::Pts));
        assert_eq!(vec![38.0], series(&games, Stat::Min));
    }

    #[test]
    fn mean_of_empty_is_undefined() {
        assert_eq!(None, mean(&[]));
        assert_eq!(Some(2.0), mean(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn window_means_cover_recorded_stats() {
        let games = sample_games();
        let means = window_means(&games);
        assert_eq!(Stat::COUNT, means.len());
        let lookup = |stat| {
            means
                .iter()
                .find(|(candidate, _)| *candidate == stat)
                .map(|(_, mean)| *mean)
                .unwrap()
        };
        assert_float_relative_eq!(25.0, lookup(Stat::Pts));
        assert_float_relative_eq!(8.0, lookup(Stat::Reb));
        assert_float_relative_eq!(7.0, lookup(Stat::Ast));
        assert_float_relative_eq!(40.0, lookup(Stat::Pra));
        assert_float_relative_eq!(18.0, lookup(Stat::Fga));
        // MIN falls back to the sole recorded game
        assert_float_relative_eq!(38.0, lookup(Stat::Min));
    }

    #[test]
    fn window_means_omit_fully_unrecorded_stats() {
        let mut record = game("2024-01-01", "LAL vs. BOS");
        record.minutes = None;
        let games = augment(&[record]);
        let means = window_means(&games);
        assert!(!means.iter().any(|(stat, _)| *stat == Stat::Min));
        assert_eq!(Stat::COUNT - 1, means.len());
    }

    #[test]
    fn stat_parses_and_displays() {
        assert_eq!(Stat::Pts, "PTS".parse().unwrap());
        assert_eq!(Stat::Pra, "pra".parse().unwrap());
        assert_eq!("PTS", Stat::Pts.to_string());
        assert_eq!("PRA", Stat::Pra.to_string());
    }
}
