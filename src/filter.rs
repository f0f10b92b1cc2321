//! Location and trailing-window narrowing of a game log.

use strum_macros::{Display, EnumIter, EnumString};

use crate::data::{GameLog, GameRecord, MatchupFormat};

/// Default trailing window when the caller expresses no preference.
pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Location {
    Overall,
    Home,
    Away,
}
impl Location {
    /// Whether a matchup string belongs to this location subset, per the
    /// separator tokens in `format`.
    pub fn matches(&self, matchup: &str, format: &MatchupFormat) -> bool {
        match self {
            Location::Overall => true,
            Location::Home => matchup.contains(format.home_token),
            Location::Away => matchup.contains(format.away_token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub location: Location,
    pub window: usize,
    pub format: MatchupFormat,
}
impl FilterSpec {
    pub fn new(location: Location, window: usize) -> Self {
        Self {
            location,
            window,
            format: MatchupFormat::default(),
        }
    }
}

/// Narrows an ascending game log to the location subset, then to the trailing
/// `window` most recent games. The input's chronological order is preserved, so
/// the tail of the subset *is* the window, already ascending. Fewer matching
/// games than `window` yields all of them; zero yields an empty log.
pub fn filter(log: &[GameRecord], spec: &FilterSpec) -> GameLog {
    let mut subset: GameLog = log
        .iter()
        .filter(|game| spec.location.matches(&game.matchup, &spec.format))
        .cloned()
        .collect();
    let excess = subset.len().saturating_sub(spec.window);
    subset.split_off(excess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::game;

    fn sample_log() -> GameLog {
        vec![
            game("2024-01-01", "LAL vs. BOS"),
            game("2024-01-03", "LAL @ DEN"),
            game("2024-01-05", "LAL vs. MIA"),
            game("2024-01-07", "LAL @ GSW"),
            game("2024-01-09", "LAL vs. PHX"),
        ]
    }

    #[test]
    fn overall_with_wide_window_returns_log_unchanged() {
        let log = sample_log();
        let filtered = filter(&log, &FilterSpec::new(Location::Overall, 10));
        assert_eq!(log, filtered);
    }

    #[test]
    fn home_keeps_only_home_separator() {
        let log = sample_log();
        let filtered = filter(&log, &FilterSpec::new(Location::Home, 10));
        assert_eq!(3, filtered.len());
        for game in &filtered {
            assert!(game.matchup.contains("vs."));
            assert!(!game.matchup.contains('@'));
        }
    }

    #[test]
    fn away_keeps_only_away_separator() {
        let log = sample_log();
        let filtered = filter(&log, &FilterSpec::new(Location::Away, 10));
        assert_eq!(2, filtered.len());
        for game in &filtered {
            assert!(game.matchup.contains('@'));
            assert!(!game.matchup.contains("vs."));
        }
    }

    #[test]
    fn window_keeps_most_recent_in_ascending_order() {
        let log = sample_log();
        let filtered = filter(&log, &FilterSpec::new(Location::Overall, 2));
        let dates: Vec<_> = filtered.iter().map(|game| game.date.to_string()).collect();
        assert_eq!(vec!["2024-01-07", "2024-01-09"], dates);
    }

    #[test]
    fn window_bounds_result_length() {
        let log = sample_log();
        for window in 1..=7 {
            let filtered = filter(&log, &FilterSpec::new(Location::Home, window));
            assert!(filtered.len() <= window.min(3));
            let mut dates: Vec<_> = filtered.iter().map(|game| game.date).collect();
            let sorted = {
                let mut copy = dates.clone();
                copy.sort();
                copy
            };
            assert_eq!(sorted, dates);
            dates.dedup();
            assert_eq!(dates.len(), filtered.len());
        }
    }

    #[test]
    fn no_matching_games_yields_empty_log() {
        let log = vec![game("2024-01-01", "LAL @ BOS"), game("2024-01-03", "LAL @ DEN")];
        let filtered = filter(&log, &FilterSpec::new(Location::Home, 10));
        assert!(filtered.is_empty());
    }

    #[test]
    fn separator_tokens_are_configurable() {
        let log = vec![game("2024-01-01", "LAL v BOS"), game("2024-01-03", "LAL at DEN")];
        let mut spec = FilterSpec::new(Location::Home, 10);
        spec.format = MatchupFormat {
            home_token: " v ",
            away_token: " at ",
        };
        let filtered = filter(&log, &spec);
        assert_eq!(1, filtered.len());
        assert_eq!("LAL v BOS", filtered[0].matchup);
    }

    #[test]
    fn location_parses_case_insensitively() {
        assert_eq!(Location::Home, "home".parse().unwrap());
        assert_eq!(Location::Away, "AWAY".parse().unwrap());
        assert_eq!(Location::Overall, "Overall".parse().unwrap());
    }
}
