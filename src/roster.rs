//! Static roster snapshot and player-name resolution.

use std::path::Path;

use anyhow::Context;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::file;

pub type PlayerId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub full_name: String,
}

/// A read-only lookup over a roster snapshot. Loaded once and never mutated;
/// resolution is an exact, case-insensitive match on the full name.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<PlayerRecord>,
    by_name: FxHashMap<String, usize>,
}
impl Roster {
    /// The roster snapshot bundled with the crate, parsed on first use. Covers the
    /// players a dashboard is realistically queried for; pass an external snapshot
    /// to the bins for a full-league table.
    pub fn embedded() -> &'static Roster {
        static EMBEDDED: OnceCell<Roster> = OnceCell::new();
        EMBEDDED.get_or_init(|| {
            let players: Vec<PlayerRecord> =
                serde_json::from_str(include_str!("../data/roster.json"))
                    .expect("malformed bundled roster snapshot");
            Roster::from(players)
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Roster> {
        let players: Vec<PlayerRecord> =
            file::read_json(&path).context("failed to read roster snapshot")?;
        Ok(Roster::from(players))
    }

    pub fn resolve(&self, name: &str) -> Option<&PlayerRecord> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.players[index])
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl From<Vec<PlayerRecord>> for Roster {
    fn from(players: Vec<PlayerRecord>) -> Self {
        let mut by_name =
            FxHashMap::with_capacity_and_hasher(players.len(), Default::default());
        for (index, player) in players.iter().enumerate() {
            // first entry wins for duplicate names
            by_name.entry(player.full_name.to_lowercase()).or_insert(index);
        }
        Self { players, by_name }
    }
}
