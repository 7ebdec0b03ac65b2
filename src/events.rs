//! Push Events
//!
//! Wire shapes of the server's named real-time messages, and of the
//! messages this client emits. Each consumed event decodes into a
//! [`Change`] so it flows through the same reducer as form outcomes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::board::Change;
use crate::models::{deserialize_id, CalendarEvent, Feature, ListItem, Meal, Note, ShoppingList};

/// Names of every event the client listens for
pub const CONSUMED_EVENTS: &[&str] = &[
    "item_added",
    "item_edited",
    "item_deleted",
    "item_toggled",
    "list_added",
    "list_deleted",
    "event_added",
    "event_updated",
    "event_deleted",
    "note_added",
    "note_deleted",
    "note_pinned",
    "meal_updated",
    "meal_deleted",
    "chore_toggled",
    "new_activity",
];

#[derive(Debug, Error)]
pub enum EventError {
    #[error("unknown push event `{0}`")]
    Unknown(String),
    #[error("malformed `{name}` payload: {source}")]
    Payload {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("bad activity timestamp `{0}`")]
    Timestamp(String),
}

// ========================
// Inbound payloads
// ========================

#[derive(Deserialize)]
struct ItemAddedPayload {
    #[serde(deserialize_with = "deserialize_id")]
    list_id: u32,
    item: ListItem,
}

#[derive(Deserialize)]
struct ItemEditedPayload {
    #[serde(deserialize_with = "deserialize_id")]
    item_id: u32,
    new_text: String,
}

#[derive(Deserialize)]
struct ItemIdPayload {
    #[serde(deserialize_with = "deserialize_id")]
    item_id: u32,
}

#[derive(Deserialize)]
struct ItemToggledPayload {
    #[serde(deserialize_with = "deserialize_id")]
    item_id: u32,
    done_status: bool,
}

#[derive(Deserialize)]
struct ListAddedPayload {
    #[serde(deserialize_with = "deserialize_id")]
    list_id: u32,
    #[serde(default)]
    card_html: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ListIdPayload {
    #[serde(deserialize_with = "deserialize_id")]
    list_id: u32,
}

#[derive(Deserialize)]
struct EventPayload {
    event: CalendarEvent,
}

#[derive(Deserialize)]
struct EventIdPayload {
    #[serde(deserialize_with = "deserialize_id")]
    event_id: u32,
}

#[derive(Deserialize)]
struct NotePayload {
    note: Note,
}

#[derive(Deserialize)]
struct NoteIdPayload {
    #[serde(deserialize_with = "deserialize_id")]
    note_id: u32,
}

#[derive(Deserialize)]
struct NotePinnedPayload {
    #[serde(deserialize_with = "deserialize_id")]
    note_id: u32,
    is_pinned: bool,
}

#[derive(Deserialize)]
struct MealUpdatedPayload {
    meal: Meal,
    #[serde(default)]
    sid: Option<String>,
}

#[derive(Deserialize)]
struct MealDeletedPayload {
    day: String,
    #[serde(default = "dinner")]
    meal_type: String,
}

fn dinner() -> String {
    "Dinner".to_string()
}

#[derive(Deserialize)]
struct ChoreToggledPayload {
    #[serde(deserialize_with = "deserialize_id")]
    assignment_id: u32,
    is_complete: bool,
    #[serde(default)]
    sid: Option<String>,
}

#[derive(Deserialize)]
struct ActivityPayload {
    feature: Feature,
    timestamp: String,
}

/// Parse the server's `isoformat()` timestamps (no zone, optional fraction)
pub fn parse_activity_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

fn payload<T: for<'de> Deserialize<'de>>(name: &str, data: Value) -> Result<T, EventError> {
    serde_json::from_value(data).map_err(|source| EventError::Payload {
        name: name.to_string(),
        source,
    })
}

/// Decode a named push event into the change it reports
pub fn decode_push(name: &str, data: Value) -> Result<Change, EventError> {
    let change = match name {
        "item_added" => {
            let p: ItemAddedPayload = payload(name, data)?;
            Change::ItemAdded { list_id: p.list_id, item: p.item }
        }
        "item_edited" => {
            let p: ItemEditedPayload = payload(name, data)?;
            Change::ItemEdited { item_id: p.item_id, new_text: p.new_text }
        }
        "item_deleted" => {
            let p: ItemIdPayload = payload(name, data)?;
            Change::ItemDeleted { item_id: p.item_id }
        }
        "item_toggled" => {
            let p: ItemToggledPayload = payload(name, data)?;
            Change::ItemToggled { item_id: p.item_id, done: p.done_status }
        }
        "list_added" => {
            let p: ListAddedPayload = payload(name, data)?;
            Change::ListAdded {
                list: ShoppingList { id: p.list_id, name: p.name, card_html: p.card_html },
            }
        }
        "list_deleted" => {
            let p: ListIdPayload = payload(name, data)?;
            Change::ListDeleted { list_id: p.list_id }
        }
        "event_added" => {
            let p: EventPayload = payload(name, data)?;
            Change::EventAdded { event: p.event }
        }
        "event_updated" => {
            let p: EventPayload = payload(name, data)?;
            Change::EventUpdated { event: p.event }
        }
        "event_deleted" => {
            let p: EventIdPayload = payload(name, data)?;
            Change::EventDeleted { event_id: p.event_id }
        }
        "note_added" => {
            let p: NotePayload = payload(name, data)?;
            Change::NoteAdded { note: p.note }
        }
        "note_deleted" => {
            let p: NoteIdPayload = payload(name, data)?;
            Change::NoteDeleted { note_id: p.note_id }
        }
        "note_pinned" => {
            let p: NotePinnedPayload = payload(name, data)?;
            Change::NotePinned { note_id: p.note_id, is_pinned: p.is_pinned }
        }
        "meal_updated" => {
            let p: MealUpdatedPayload = payload(name, data)?;
            Change::MealUpdated { meal: p.meal, sid: p.sid }
        }
        "meal_deleted" => {
            let p: MealDeletedPayload = payload(name, data)?;
            Change::MealDeleted { day: p.day, meal_type: p.meal_type }
        }
        "chore_toggled" => {
            let p: ChoreToggledPayload = payload(name, data)?;
            Change::ChoreToggled {
                assignment_id: p.assignment_id,
                is_complete: p.is_complete,
                sid: p.sid,
            }
        }
        "new_activity" => {
            let p: ActivityPayload = payload(name, data)?;
            let timestamp = parse_activity_timestamp(&p.timestamp)
                .ok_or_else(|| EventError::Timestamp(p.timestamp.clone()))?;
            Change::NewActivity { feature: p.feature, timestamp }
        }
        other => return Err(EventError::Unknown(other.to_string())),
    };
    Ok(change)
}

// ========================
// Outbound messages
// ========================

/// Messages this client emits on the push channel
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEmit {
    Join { list_id: u32 },
    JoinFamilyRoom { family_id: u32 },
    ToggleDone { item_id: u32 },
    ToggleChore { assignment_id: u32 },
    SaveMeal { day: String, description: String, notes: String },
}

#[derive(Serialize)]
struct JoinArgs {
    list_id: u32,
}

#[derive(Serialize)]
struct FamilyRoomArgs {
    family_id: u32,
}

#[derive(Serialize)]
struct ToggleDoneArgs {
    item_to_toggle: u32,
}

#[derive(Serialize)]
struct ToggleChoreArgs {
    assignment_id: u32,
}

#[derive(Serialize)]
struct SaveMealArgs<'a> {
    day: &'a str,
    description: &'a str,
    notes: &'a str,
}

impl ClientEmit {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEmit::Join { .. } => "join",
            ClientEmit::JoinFamilyRoom { .. } => "join_family_room",
            ClientEmit::ToggleDone { .. } => "toggle_done",
            ClientEmit::ToggleChore { .. } => "toggle_chore",
            ClientEmit::SaveMeal { .. } => "save_meal",
        }
    }

    pub fn payload(&self) -> Value {
        let value = match self {
            ClientEmit::Join { list_id } => serde_json::to_value(JoinArgs { list_id: *list_id }),
            ClientEmit::JoinFamilyRoom { family_id } => {
                serde_json::to_value(FamilyRoomArgs { family_id: *family_id })
            }
            ClientEmit::ToggleDone { item_id } => {
                serde_json::to_value(ToggleDoneArgs { item_to_toggle: *item_id })
            }
            ClientEmit::ToggleChore { assignment_id } => {
                serde_json::to_value(ToggleChoreArgs { assignment_id: *assignment_id })
            }
            ClientEmit::SaveMeal { day, description, notes } => serde_json::to_value(SaveMealArgs {
                day,
                description,
                notes,
            }),
        };
        value.unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_consumed_event_is_decodable_by_name() {
        for name in CONSUMED_EVENTS {
            // Empty payloads fail on fields, never as unknown events
            let err = decode_push(name, json!({})).unwrap_err();
            assert!(matches!(err, EventError::Payload { .. } | EventError::Timestamp(_)), "{name}");
        }
    }

    #[test]
    fn test_unknown_event() {
        assert!(matches!(decode_push("chat", json!({})), Err(EventError::Unknown(n)) if n == "chat"));
    }

    #[test]
    fn test_item_added() {
        let change = decode_push(
            "item_added",
            json!({
                "list_id": 4,
                "item": {"id": 11, "text": "Bread", "done": false,
                         "author": {"username": "kim"}, "raw_timestamp": "2026-10-17T08:00:00"}
            }),
        )
        .unwrap();
        match change {
            Change::ItemAdded { list_id, item } => {
                assert_eq!(list_id, 4);
                assert_eq!(item.text, "Bread");
                assert_eq!(item.author.unwrap().username, "kim");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_deletions_accept_string_ids() {
        assert_eq!(
            decode_push("item_deleted", json!({"list_id": 4, "item_id": "11"})).unwrap(),
            Change::ItemDeleted { item_id: 11 }
        );
        assert_eq!(
            decode_push("note_deleted", json!({"note_id": "3"})).unwrap(),
            Change::NoteDeleted { note_id: 3 }
        );
    }

    #[test]
    fn test_meal_deleted_defaults_to_dinner() {
        assert_eq!(
            decode_push("meal_deleted", json!({"day": "Tuesday"})).unwrap(),
            Change::MealDeleted { day: "Tuesday".into(), meal_type: "Dinner".into() }
        );
    }

    #[test]
    fn test_chore_toggled_carries_sid() {
        assert_eq!(
            decode_push("chore_toggled", json!({"assignment_id": 2, "is_complete": true, "sid": "abc"})).unwrap(),
            Change::ChoreToggled { assignment_id: 2, is_complete: true, sid: Some("abc".into()) }
        );
    }

    #[test]
    fn test_new_activity_timestamp_formats() {
        let with_fraction = decode_push(
            "new_activity",
            json!({"feature": "calendar", "timestamp": "2026-10-17T08:30:00.123456"}),
        )
        .unwrap();
        assert!(matches!(with_fraction, Change::NewActivity { feature: Feature::Calendar, .. }));

        assert!(parse_activity_timestamp("2026-10-17T08:30:00").is_some());
        assert!(parse_activity_timestamp("2026-10-17T08:30:00Z").is_some());
        assert!(matches!(
            decode_push("new_activity", json!({"feature": "calendar", "timestamp": "yesterday"})),
            Err(EventError::Timestamp(_))
        ));
    }

    #[test]
    fn test_emit_payloads_match_server_field_names() {
        assert_eq!(ClientEmit::ToggleDone { item_id: 5 }.payload(), json!({"item_to_toggle": 5}));
        assert_eq!(ClientEmit::JoinFamilyRoom { family_id: 2 }.name(), "join_family_room");
        assert_eq!(
            ClientEmit::SaveMeal { day: "Monday".into(), description: "Soup".into(), notes: "".into() }.payload(),
            json!({"day": "Monday", "description": "Soup", "notes": ""})
        );
    }
}
