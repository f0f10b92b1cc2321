//! Testing helpers.

use chrono::NaiveDate;

use crate::data::GameRecord;

/// A played game with unremarkable box-score numbers; tests overwrite the
/// fields they care about.
pub fn game(date: &str, matchup: &str) -> GameRecord {
    GameRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        matchup: matchup.to_string(),
        points: 20,
        rebounds: 5,
        assists: 5,
        steals: 1,
        blocks: 1,
        turnovers: 2,
        fouls: 2,
        fg_attempts: 15,
        fg_pct: Some(0.5),
        minutes: Some(34.0),
    }
}
