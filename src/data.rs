//! Game-log data model and retrieval from the upstream stats provider.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::roster::PlayerId;

const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
const SEASON_TYPE: &str = "Regular Season";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Positions counted as guards when aggregating opposing-backcourt scoring.
const GUARD_POSITIONS: [&str; 3] = ["G", "PG", "SG"];

/// A season in the provider's `"YYYY-YY"` form, e.g. `"2023-24"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(String);
impl Season {
    pub fn starting(year: u16) -> Self {
        Self(format!("{}-{:02}", year, (year + 1) % 100))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = || -> Option<Season> {
            let (first, second) = s.split_once('-')?;
            if first.len() != 4 || second.len() != 2 {
                return None;
            }
            let start: u16 = first.parse().ok()?;
            let end: u8 = second.parse().ok()?;
            if u16::from(end) != (start + 1) % 100 {
                return None;
            }
            Some(Season::starting(start))
        };
        parse().ok_or_else(|| SeasonParseError(format!("invalid season {s:?}, expected YYYY-YY")))
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SeasonParseError(String);

/// One played game as reported by the provider. `minutes` and `fg_pct` are optional
/// because the provider emits nulls for them (DNP entries, zero-attempt games).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub matchup: String,
    pub points: u16,
    pub rebounds: u16,
    pub assists: u16,
    pub steals: u16,
    pub blocks: u16,
    pub turnovers: u16,
    pub fouls: u16,
    pub fg_attempts: u16,
    pub fg_pct: Option<f64>,
    pub minutes: Option<f64>,
}

/// Per-game records for one (player, season) pair, ascending by date, no duplicate dates.
pub type GameLog = Vec<GameRecord>;

/// Separator tokens the provider embeds in matchup strings. Matching is a
/// case-sensitive substring test; the defaults reflect the provider's encoding,
/// e.g. `"LAL vs. BOS"` for home and `"LAL @ BOS"` for away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchupFormat {
    pub home_token: &'static str,
    pub away_token: &'static str,
}

impl Default for MatchupFormat {
    fn default() -> Self {
        Self {
            home_token: "vs.",
            away_token: "@",
        }
    }
}

/// Extracts the opponent abbreviation, the trailing token of a matchup string.
pub fn opponent(matchup: &str) -> Option<&str> {
    matchup.split_whitespace().last()
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "resultSets")]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    rows: Vec<Vec<Value>>,
}
impl ResultSet {
    fn column(&self, name: &str) -> anyhow::Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| anyhow!("provider response missing column {name}"))
    }
}

impl Envelope {
    fn take_result_set(self, name: &str) -> anyhow::Result<ResultSet> {
        self.result_sets
            .into_iter()
            .find(|set| set.name == name)
            .ok_or_else(|| anyhow!("provider response missing result set {name}"))
    }
}

fn count_cell(row: &[Value], index: usize, column: &str) -> anyhow::Result<u16> {
    let value = row
        .get(index)
        .and_then(Value::as_u64)
        .with_context(|| format!("missing or non-numeric {column}"))?;
    u16::try_from(value).with_context(|| format!("{column} out of range"))
}

fn float_cell(row: &[Value], index: usize) -> Option<f64> {
    row.get(index).and_then(Value::as_f64)
}

fn text_cell<'a>(row: &'a [Value], index: usize, column: &str) -> anyhow::Result<&'a str> {
    row.get(index)
        .and_then(Value::as_str)
        .with_context(|| format!("missing {column}"))
}

/// Maps the provider's game-log result set into a [GameLog], restoring chronological
/// order and rejecting duplicate game dates as upstream corruption.
fn summarise_game_log(set: &ResultSet) -> anyhow::Result<GameLog> {
    let date = set.column("GAME_DATE")?;
    let matchup = set.column("MATCHUP")?;
    let points = set.column("PTS")?;
    let rebounds = set.column("REB")?;
    let assists = set.column("AST")?;
    let steals = set.column("STL")?;
    let blocks = set.column("BLK")?;
    let turnovers = set.column("TOV")?;
    let fouls = set.column("PF")?;
    let fg_attempts = set.column("FGA")?;
    let fg_pct = set.column("FG_PCT")?;
    let minutes = set.column("MIN")?;

    let mut log = Vec::with_capacity(set.rows.len());
    for row in &set.rows {
        let date_text = text_cell(row, date, "GAME_DATE")?;
        let date = NaiveDate::parse_from_str(date_text, "%b %d, %Y")
            .with_context(|| format!("unparseable game date {date_text:?}"))?;
        log.push(GameRecord {
            date,
            matchup: text_cell(row, matchup, "MATCHUP")?.to_string(),
            points: count_cell(row, points, "PTS")?,
            rebounds: count_cell(row, rebounds, "REB")?,
            assists: count_cell(row, assists, "AST")?,
            steals: count_cell(row, steals, "STL")?,
            blocks: count_cell(row, blocks, "BLK")?,
            turnovers: count_cell(row, turnovers, "TOV")?,
            fouls: count_cell(row, fouls, "PF")?,
            fg_attempts: count_cell(row, fg_attempts, "FGA")?,
            fg_pct: float_cell(row, fg_pct),
            minutes: float_cell(row, minutes),
        });
    }
    log.sort_unstable_by_key(|game| game.date);
    for pair in log.windows(2) {
        if pair[0].date == pair[1].date {
            bail!("duplicate game date {} in provider response", pair[0].date);
        }
    }
    Ok(log)
}

/// Averages guard points per game by team abbreviation over a league-wide player dash.
fn guard_scoring_by_team(set: &ResultSet) -> anyhow::Result<FxHashMap<String, f64>> {
    let position = set.column("PLAYER_POSITION")?;
    let team = set.column("TEAM_ABBREVIATION")?;
    let points = set.column("PTS")?;

    let mut accumulated: FxHashMap<String, (f64, u32)> = FxHashMap::default();
    for row in &set.rows {
        let Some(position) = row.get(position).and_then(Value::as_str) else {
            continue;
        };
        if !GUARD_POSITIONS.contains(&position) {
            continue;
        }
        let team = text_cell(row, team, "TEAM_ABBREVIATION")?;
        let Some(points) = float_cell(row, points) else {
            continue;
        };
        let entry = accumulated.entry(team.to_string()).or_insert((0.0, 0));
        entry.0 += points;
        entry.1 += 1;
    }
    Ok(accumulated
        .into_iter()
        .map(|(team, (sum, count))| (team, sum / count as f64))
        .collect())
}

fn http_client() -> anyhow::Result<&'static Client> {
    static CLIENT: OnceCell<Client> = OnceCell::new();
    CLIENT.get_or_try_init(|| {
        // the stats host rejects requests without browser-looking headers
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0",
            ),
        );
        headers.insert(REFERER, HeaderValue::from_static("https://stats.nba.com/"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
        headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
        Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")
    })
}

/// Downloads the season's per-game log for a player. An empty log is a valid
/// outcome (season not started, no games played); provider failures surface
/// directly with no retry.
pub async fn fetch_game_log(player_id: PlayerId, season: &Season) -> anyhow::Result<GameLog> {
    let envelope: Envelope = http_client()?
        .get(format!("{STATS_BASE_URL}/playergamelog"))
        .query(&[
            ("PlayerID", player_id.to_string()),
            ("Season", season.to_string()),
            ("SeasonType", SEASON_TYPE.to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let set = envelope.take_result_set("PlayerGameLog")?;
    let log = summarise_game_log(&set)?;
    debug!("fetched {} games for player {player_id} in {season}", log.len());
    Ok(log)
}

/// Downloads the league-wide per-game player dash and reduces it to average guard
/// scoring per team, the opposing-backcourt context shown next to a matchup.
pub async fn fetch_guard_scoring(season: &Season) -> anyhow::Result<FxHashMap<String, f64>> {
    let envelope: Envelope = http_client()?
        .get(format!("{STATS_BASE_URL}/leaguedashplayerstats"))
        .query(&[
            ("Season", season.to_string()),
            ("SeasonType", SEASON_TYPE.to_string()),
            ("PerMode", "PerGame".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let set = envelope.take_result_set("LeagueDashPlayerStats")?;
    guard_scoring_by_team(&set)
}
