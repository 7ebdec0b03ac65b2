//! Form Requests
//!
//! One variant per intercepted form. Each knows its endpoint, the fields it
//! posts, whether it needs confirmation first, and how its JSON reply maps
//! onto board [`Change`]s.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{post_form, ApiError};
use crate::board::Change;
use crate::models::{deserialize_id, CalendarEvent, Chore, ListItem, Note, VaultEntry};

#[derive(Debug, Clone, PartialEq)]
pub enum FormRequest {
    CreateList { name: String },
    DeleteList { list_id: u32 },
    AddItem { list_id: u32, text: String },
    EditItem { item_id: u32, text: String },
    DeleteItem { item_id: u32 },
    ToggleItem { item_id: u32 },
    AddEvent { title: String, date: String, time: String },
    EditEvent { event_id: u32, title: String, date: String, time: String },
    DeleteEvent { event_id: u32 },
    DeleteMeal { meal_id: u32 },
    AddNote { content: String },
    DeleteNote { note_id: u32 },
    PinNote { note_id: u32 },
    AddChore { name: String, points: u32 },
    DeleteChore { chore_id: u32 },
    GenerateChores,
    VaultAdd { category: String, title: String, content: String },
    VaultEdit { entry_id: u32, category: String, title: String, content: String },
    VaultDelete { entry_id: u32 },
    InviteUser { username: String },
}

/// What a successful submission did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOutcome {
    pub changes: Vec<Change>,
    /// Server message worth a success toast
    pub notice: Option<String>,
    /// The page must be reloaded to show the result
    pub reload: bool,
}

impl FormOutcome {
    fn change(change: Change) -> Self {
        Self { changes: vec![change], ..Self::default() }
    }

    fn with_notice(mut self, body: &Value) -> Self {
        self.notice = body.get("message").and_then(Value::as_str).map(str::to_string);
        self
    }
}

#[derive(Deserialize)]
struct VaultEntryRef {
    #[serde(deserialize_with = "deserialize_id")]
    id: u32,
    category: String,
}

fn field<T: DeserializeOwned>(body: &Value, name: &str) -> Result<T, ApiError> {
    let raw = body
        .get(name)
        .cloned()
        .ok_or_else(|| ApiError::Decode(format!("missing `{}`", name)))?;
    serde_json::from_value(raw).map_err(|e| ApiError::Decode(format!("`{}`: {}", name, e)))
}

impl FormRequest {
    pub fn endpoint(&self) -> String {
        match self {
            FormRequest::CreateList { .. } => "/create_list".into(),
            FormRequest::DeleteList { .. } => "/delete_list".into(),
            FormRequest::AddItem { .. } => "/add_item".into(),
            FormRequest::EditItem { .. } => "/edit_item".into(),
            FormRequest::DeleteItem { .. } => "/delete_item".into(),
            FormRequest::ToggleItem { .. } => "/toggle".into(),
            FormRequest::AddEvent { .. } => "/add_event".into(),
            FormRequest::EditEvent { event_id, .. } => format!("/edit_event/{}", event_id),
            FormRequest::DeleteEvent { .. } => "/delete_event".into(),
            FormRequest::DeleteMeal { .. } => "/delete_meal".into(),
            FormRequest::AddNote { .. } => "/add_note".into(),
            FormRequest::DeleteNote { .. } => "/delete_note".into(),
            FormRequest::PinNote { .. } => "/pin_note".into(),
            FormRequest::AddChore { .. } => "/chores/add".into(),
            FormRequest::DeleteChore { .. } => "/chores/delete".into(),
            FormRequest::GenerateChores => "/chores/generate".into(),
            FormRequest::VaultAdd { .. } => "/vault/add".into(),
            FormRequest::VaultEdit { entry_id, .. } => format!("/vault/edit/{}", entry_id),
            FormRequest::VaultDelete { .. } => "/vault/delete".into(),
            FormRequest::InviteUser { .. } => "/invite_user".into(),
        }
    }

    /// Form fields, named as the server reads them
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            FormRequest::CreateList { name } => vec![("new_list_name", name.clone())],
            FormRequest::DeleteList { list_id } => vec![("list_to_delete", list_id.to_string())],
            FormRequest::AddItem { list_id, text } => {
                vec![("list_id", list_id.to_string()), ("item", text.clone())]
            }
            FormRequest::EditItem { item_id, text } => {
                vec![("item_id", item_id.to_string()), ("new_text", text.clone())]
            }
            FormRequest::DeleteItem { item_id } => vec![("item_to_delete", item_id.to_string())],
            FormRequest::ToggleItem { item_id } => vec![("item_to_toggle", item_id.to_string())],
            FormRequest::AddEvent { title, date, time }
            | FormRequest::EditEvent { title, date, time, .. } => vec![
                ("title", title.clone()),
                ("date", date.clone()),
                ("time", time.clone()),
            ],
            FormRequest::DeleteEvent { event_id } => vec![("event_id", event_id.to_string())],
            FormRequest::DeleteMeal { meal_id } => vec![("meal_id", meal_id.to_string())],
            FormRequest::AddNote { content } => vec![("content", content.clone())],
            FormRequest::DeleteNote { note_id } | FormRequest::PinNote { note_id } => {
                vec![("note_id", note_id.to_string())]
            }
            FormRequest::AddChore { name, points } => {
                vec![("chore_name", name.clone()), ("chore_points", points.to_string())]
            }
            FormRequest::DeleteChore { chore_id } => vec![("chore_id", chore_id.to_string())],
            FormRequest::GenerateChores => vec![],
            FormRequest::VaultAdd { category, title, content }
            | FormRequest::VaultEdit { category, title, content, .. } => vec![
                ("category", category.clone()),
                ("title", title.clone()),
                ("content", content.clone()),
            ],
            FormRequest::VaultDelete { entry_id } => vec![("entry_id", entry_id.to_string())],
            FormRequest::InviteUser { username } => vec![("username", username.clone())],
        }
    }

    /// Prompt for the shared confirmation dialog, if this form needs one
    pub fn confirm_prompt(&self) -> Option<&'static str> {
        match self {
            FormRequest::DeleteList { .. } => Some("Delete this list and all of its items?"),
            FormRequest::DeleteEvent { .. } => Some("Delete this event?"),
            FormRequest::DeleteMeal { .. } => Some("Remove this meal from the plan?"),
            FormRequest::DeleteNote { .. } => Some("Delete this note?"),
            FormRequest::DeleteChore { .. } => Some("Remove this chore from the chore bank?"),
            FormRequest::GenerateChores => Some("Assign this week's chores to everyone?"),
            FormRequest::VaultDelete { .. } => Some("Permanently delete this vault entry?"),
            _ => None,
        }
    }

    /// Map a successful reply onto board changes
    pub fn outcome(&self, body: &Value) -> Result<FormOutcome, ApiError> {
        let outcome = match self {
            // The list card arrives through `list_added` for everyone, us included
            FormRequest::CreateList { .. } => FormOutcome::default(),
            FormRequest::DeleteList { list_id } => {
                FormOutcome::change(Change::ListDeleted { list_id: *list_id })
            }
            FormRequest::AddItem { list_id, .. } => FormOutcome::change(Change::ItemAdded {
                list_id: *list_id,
                item: field::<ListItem>(body, "item")?,
            }),
            FormRequest::EditItem { item_id, .. } => FormOutcome::change(Change::ItemEdited {
                item_id: *item_id,
                new_text: field(body, "new_text")?,
            }),
            FormRequest::DeleteItem { item_id } => {
                FormOutcome::change(Change::ItemDeleted { item_id: *item_id })
            }
            FormRequest::ToggleItem { item_id } => FormOutcome::change(Change::ItemToggled {
                item_id: *item_id,
                done: field(body, "done_status")?,
            }),
            FormRequest::AddEvent { .. } => FormOutcome::change(Change::EventAdded {
                event: field::<CalendarEvent>(body, "event")?,
            }),
            FormRequest::EditEvent { .. } => FormOutcome::change(Change::EventUpdated {
                event: field::<CalendarEvent>(body, "event")?,
            }),
            FormRequest::DeleteEvent { event_id } => {
                FormOutcome::change(Change::EventDeleted { event_id: *event_id })
            }
            FormRequest::DeleteMeal { meal_id } => {
                FormOutcome::change(Change::MealRemoved { meal_id: *meal_id })
            }
            FormRequest::AddNote { .. } => FormOutcome::change(Change::NoteAdded {
                note: field::<Note>(body, "note")?,
            }),
            FormRequest::DeleteNote { note_id } => {
                FormOutcome::change(Change::NoteDeleted { note_id: *note_id })
            }
            FormRequest::PinNote { note_id } => FormOutcome::change(Change::NotePinned {
                note_id: *note_id,
                is_pinned: field(body, "is_pinned")?,
            }),
            FormRequest::AddChore { .. } => FormOutcome::change(Change::ChoreAdded {
                chore: field::<Chore>(body, "chore")?,
            })
            .with_notice(body),
            FormRequest::DeleteChore { chore_id } => {
                FormOutcome::change(Change::ChoreDeleted { chore_id: *chore_id }).with_notice(body)
            }
            FormRequest::GenerateChores => FormOutcome { reload: true, ..FormOutcome::default() }
                .with_notice(body),
            FormRequest::VaultAdd { title, content, .. }
            | FormRequest::VaultEdit { title, content, .. } => {
                let entry: VaultEntryRef = field(body, "entry")?;
                let entry = VaultEntry {
                    id: entry.id,
                    category: entry.category,
                    title: title.trim().to_string(),
                    content: content.trim().to_string(),
                };
                let change = if matches!(self, FormRequest::VaultAdd { .. }) {
                    Change::VaultAdded { entry }
                } else {
                    Change::VaultEdited { entry }
                };
                FormOutcome::change(change).with_notice(body)
            }
            FormRequest::VaultDelete { entry_id } => {
                FormOutcome::change(Change::VaultDeleted { entry_id: *entry_id }).with_notice(body)
            }
            FormRequest::InviteUser { .. } => FormOutcome::default().with_notice(body),
        };
        Ok(outcome)
    }
}

/// Send a form and decode its outcome
pub async fn submit(request: &FormRequest) -> Result<FormOutcome, ApiError> {
    let body = post_form(&request.endpoint(), &request.fields()).await?;
    request.outcome(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoints_with_path_ids() {
        let edit = FormRequest::EditEvent {
            event_id: 12,
            title: "t".into(),
            date: "2026-10-20".into(),
            time: "10:00".into(),
        };
        assert_eq!(edit.endpoint(), "/edit_event/12");
        assert_eq!(
            FormRequest::VaultEdit { entry_id: 3, category: "c".into(), title: "t".into(), content: "x".into() }.endpoint(),
            "/vault/edit/3"
        );
        assert_eq!(FormRequest::GenerateChores.endpoint(), "/chores/generate");
        assert_eq!(FormRequest::ToggleItem { item_id: 2 }.endpoint(), "/toggle");
    }

    #[test]
    fn test_field_names_match_server_forms() {
        assert_eq!(
            FormRequest::AddItem { list_id: 4, text: "Milk".into() }.fields(),
            vec![("list_id", "4".to_string()), ("item", "Milk".to_string())]
        );
        assert_eq!(FormRequest::DeleteList { list_id: 2 }.fields(), vec![("list_to_delete", "2".to_string())]);
        assert_eq!(FormRequest::AddChore { name: "Dishes".into(), points: 5 }.fields()[1], ("chore_points", "5".to_string()));
    }

    #[test]
    fn test_only_destructive_forms_confirm() {
        assert!(FormRequest::DeleteNote { note_id: 1 }.confirm_prompt().is_some());
        assert!(FormRequest::GenerateChores.confirm_prompt().is_some());
        assert!(FormRequest::AddNote { content: "hi".into() }.confirm_prompt().is_none());
        assert!(FormRequest::DeleteItem { item_id: 1 }.confirm_prompt().is_none());
    }

    #[test]
    fn test_add_item_outcome() {
        let body = json!({"success": true, "item": {"id": 9, "text": "Milk", "done": false}});
        let outcome = FormRequest::AddItem { list_id: 4, text: "Milk".into() }.outcome(&body).unwrap();
        match &outcome.changes[..] {
            [Change::ItemAdded { list_id: 4, item }] => assert_eq!(item.id, 9),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!outcome.reload);
    }

    #[test]
    fn test_missing_payload_is_a_decode_error() {
        let body = json!({"success": true});
        let err = FormRequest::AddNote { content: "x".into() }.outcome(&body).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_toggle_and_pin_take_server_state() {
        let body = json!({"success": true, "done_status": true, "is_pinned": false});
        assert_eq!(
            FormRequest::ToggleItem { item_id: 1 }.outcome(&body).unwrap().changes,
            vec![Change::ItemToggled { item_id: 1, done: true }]
        );
        assert_eq!(
            FormRequest::PinNote { note_id: 2 }.outcome(&body).unwrap().changes,
            vec![Change::NotePinned { note_id: 2, is_pinned: false }]
        );
    }

    #[test]
    fn test_generate_chores_reloads_with_notice() {
        let body = json!({"success": true, "message": "Successfully assigned 4 chores"});
        let outcome = FormRequest::GenerateChores.outcome(&body).unwrap();
        assert!(outcome.reload);
        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.notice.as_deref(), Some("Successfully assigned 4 chores"));
    }

    #[test]
    fn test_vault_entry_built_from_reply_and_fields() {
        let body = json!({
            "success": true,
            "message": "Vault entry updated successfully!",
            "entry": {"id": 5, "category": "Insurance", "original_category": "Misc"}
        });
        let request = FormRequest::VaultEdit {
            entry_id: 5,
            category: " Insurance ".into(),
            title: " Car ".into(),
            content: "Policy 42".into(),
        };
        let outcome = request.outcome(&body).unwrap();
        assert_eq!(
            outcome.changes,
            vec![Change::VaultEdited {
                entry: VaultEntry { id: 5, category: "Insurance".into(), title: "Car".into(), content: "Policy 42".into() }
            }]
        );
        assert!(outcome.notice.is_some());
    }
}
