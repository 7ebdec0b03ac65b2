//! Read-only Server Queries
//!
//! JSON lookups and server-rendered fragments.

use chrono::NaiveDate;
use serde::Deserialize;

use super::{check_envelope, get_json, get_text, ApiError};
use crate::models::{InviteableUser, Note};

/// Users who can still be invited to the current family
pub async fn inviteable_users() -> Result<Vec<InviteableUser>, ApiError> {
    let body = get_json("/api/inviteable_users").await?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// One week of the admin chore history
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoreHistory {
    pub grid_html: String,
    pub nav_html: String,
    pub week_display: String,
}

pub fn chore_history_path(week: NaiveDate) -> String {
    format!("/api/chore_history/{}", week.format("%Y-%m-%d"))
}

/// Week a history navigation link points at (`.../chore_history/2026-10-05`)
pub fn history_week_from_href(href: &str) -> Option<NaiveDate> {
    let (_, date) = href.trim_end_matches('/').rsplit_once("/chore_history/")?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

pub async fn chore_history(week: NaiveDate) -> Result<ChoreHistory, ApiError> {
    let body = get_json(&chore_history_path(week)).await?;
    let body = check_envelope(true, 200, Some(body))?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn rendered_note_path(note_id: u32, pinned: bool) -> String {
    if pinned {
        format!("/internal/render_pinned_post/{}", note_id)
    } else {
        format!("/internal/render_bulletin_post/{}", note_id)
    }
}

/// Fetch the server's rendering of a note we do not hold locally
pub async fn rendered_note(note_id: u32, pinned: bool) -> Result<Note, ApiError> {
    let html = get_text(&rendered_note_path(note_id, pinned)).await?;
    Ok(Note {
        id: note_id,
        content: String::new(),
        author: String::new(),
        author_id: None,
        timestamp: String::new(),
        raw_timestamp: None,
        is_pinned: pinned,
        html: Some(html),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let week = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert_eq!(chore_history_path(week), "/api/chore_history/2026-10-12");
        assert_eq!(rendered_note_path(4, true), "/internal/render_pinned_post/4");
        assert_eq!(rendered_note_path(4, false), "/internal/render_bulletin_post/4");
    }

    #[test]
    fn test_history_week_from_href() {
        assert_eq!(
            history_week_from_href("/chore_history/2026-10-05"),
            NaiveDate::from_ymd_opt(2026, 10, 5)
        );
        assert_eq!(
            history_week_from_href("https://example.org/chore_history/2026-10-05/"),
            NaiveDate::from_ymd_opt(2026, 10, 5)
        );
        assert_eq!(history_week_from_href("/chores"), None);
        assert_eq!(history_week_from_href("/chore_history/soon"), None);
    }

    #[test]
    fn test_history_reply_shape() {
        let body = serde_json::json!({
            "success": true, "grid_html": "<table></table>", "nav_html": "<nav></nav>",
            "week_display": "October 12, 2026"
        });
        let history: ChoreHistory = serde_json::from_value(body).unwrap();
        assert_eq!(history.week_display, "October 12, 2026");
    }
}
