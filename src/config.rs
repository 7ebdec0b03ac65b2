//! Page Configuration
//!
//! The server embeds a JSON bootstrap block in every page:
//! `<script id="hearth-bootstrap" type="application/json">`. It names the
//! family, the user and the page, and carries the initial board data.
//! A couple of client-side knobs can be overridden from `localStorage`.

use serde::Deserialize;
use thiserror::Error;

use crate::board::BoardState;
use crate::models::{
    CalendarEvent, Chore, ChoreAssignment, Feature, ListItem, Meal, Note, ShoppingList,
    VaultEntry,
};
use crate::unread::KeyValueStore;

pub const BOOTSTRAP_ELEMENT_ID: &str = "hearth-bootstrap";
pub const LOG_LEVEL_KEY: &str = "hearth_log_level";
pub const TOAST_MS_KEY: &str = "hearth_toast_ms";

const DEFAULT_TOAST_MS: u32 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bootstrap element #{0} not found")]
    Missing(&'static str),
    #[error("invalid bootstrap JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Initial items of one list
#[derive(Debug, Clone, Deserialize)]
pub struct ListBootstrap {
    #[serde(flatten)]
    pub list: ShoppingList,
    #[serde(default)]
    pub items: Vec<ListItem>,
}

/// The server-embedded page description
#[derive(Debug, Clone, Deserialize)]
pub struct Bootstrap {
    pub family_id: u32,
    pub user_id: u32,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub page: Feature,
    /// Socket.io endpoint; same origin when absent
    #[serde(default)]
    pub socket_url: Option<String>,
    #[serde(default)]
    pub lists: Vec<ListBootstrap>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub chore_bank: Vec<Chore>,
    #[serde(default)]
    pub chores: Vec<ChoreAssignment>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub vault: Vec<VaultEntry>,
}

impl Bootstrap {
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the bootstrap block from the current document
    pub fn from_document() -> Result<Self, ConfigError> {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(BOOTSTRAP_ELEMENT_ID))
            .and_then(|el| el.text_content())
            .ok_or(ConfigError::Missing(BOOTSTRAP_ELEMENT_ID))?;
        Self::parse(&text)
    }

    /// Initial board state. Notes are split into the pinned and board
    /// containers and kept newest first as the server sends them.
    pub fn board(&self) -> BoardState {
        let mut state = BoardState { current: self.page, ..BoardState::default() };
        for entry in &self.lists {
            state.lists.push(entry.list.clone());
            state.items.insert(entry.list.id, entry.items.clone());
        }
        state.events = self.events.clone();
        state.meals = self.meals.iter().map(|m| (m.day.clone(), m.clone())).collect();
        state.chore_bank = self.chore_bank.clone();
        state.chores = self.chores.clone();
        let (pinned, board): (Vec<Note>, Vec<Note>) =
            self.notes.iter().cloned().partition(|n| n.is_pinned);
        state.pinned_notes = pinned;
        state.notes = board;
        state.vault = self.vault.clone();
        state
    }
}

/// Settings that stay fixed for the page's lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub family_id: u32,
    pub user_id: u32,
    pub is_owner: bool,
    pub page: Feature,
    pub socket_url: Option<String>,
    pub log_level: log::LevelFilter,
    pub toast_ms: u32,
}

impl AppConfig {
    pub fn new(bootstrap: &Bootstrap, overrides: &impl KeyValueStore) -> Self {
        let log_level = overrides
            .get(LOG_LEVEL_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(log::LevelFilter::Info);
        let toast_ms = overrides
            .get(TOAST_MS_KEY)
            .and_then(|raw| raw.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TOAST_MS);

        Self {
            family_id: bootstrap.family_id,
            user_id: bootstrap.user_id,
            is_owner: bootstrap.is_owner,
            page: bootstrap.page,
            socket_url: bootstrap.socket_url.clone(),
            log_level,
            toast_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unread::MemoryStore;

    const SAMPLE: &str = r#"{
        "family_id": 2,
        "user_id": 7,
        "is_owner": true,
        "page": "bulletin_board",
        "lists": [{"id": 4, "name": "Groceries", "items": [{"id": 1, "text": "Milk"}]}],
        "meals": [{"id": 3, "day": "Friday", "description": "Pizza"}],
        "notes": [
            {"id": 9, "content": "Pinned", "is_pinned": true},
            {"id": 8, "content": "New"},
            {"id": 5, "content": "Old"}
        ]
    }"#;

    #[test]
    fn test_parse_and_build_board() {
        let bootstrap = Bootstrap::parse(SAMPLE).unwrap();
        assert_eq!(bootstrap.page, Feature::BulletinBoard);

        let board = bootstrap.board();
        assert_eq!(board.current, Feature::BulletinBoard);
        assert_eq!(board.items[&4][0].text, "Milk");
        assert_eq!(board.meals["Friday"].description, "Pizza");
        assert_eq!(board.pinned_notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![9]);
        assert_eq!(board.notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![8, 5]);
    }

    #[test]
    fn test_minimal_bootstrap_defaults() {
        let bootstrap = Bootstrap::parse(r#"{"family_id": 1, "user_id": 1}"#).unwrap();
        assert_eq!(bootstrap.page, Feature::Dashboard);
        assert!(!bootstrap.is_owner);
        assert!(bootstrap.board().lists.is_empty());

        let config = AppConfig::new(&bootstrap, &MemoryStore::default());
        assert_eq!(config.log_level, log::LevelFilter::Info);
        assert_eq!(config.toast_ms, DEFAULT_TOAST_MS);
    }

    #[test]
    fn test_storage_overrides() {
        let bootstrap = Bootstrap::parse(r#"{"family_id": 1, "user_id": 1}"#).unwrap();
        let mut store = MemoryStore::default();
        store.set(LOG_LEVEL_KEY, "debug");
        store.set(TOAST_MS_KEY, "0");

        let config = AppConfig::new(&bootstrap, &store);
        assert_eq!(config.log_level, log::LevelFilter::Debug);
        // Zero would hide toasts instantly; fall back
        assert_eq!(config.toast_ms, DEFAULT_TOAST_MS);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(Bootstrap::parse("{"), Err(ConfigError::Json(_))));
    }
}
