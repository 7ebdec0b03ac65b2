//! Frontend Models
//!
//! Data structures mirroring the entities the server renders and pushes.

use serde::{Deserialize, Deserializer, Serialize};

/// Accept an id sent either as a JSON number or as a numeric string.
///
/// The server echoes raw form values back for some deletions, so
/// `"12"` and `12` must both decode.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u32),
        Str(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Feature areas of the organizer, as named in `new_activity` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Dashboard,
    Calendar,
    MealPlanner,
    BulletinBoard,
    Chores,
    Vault,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Dashboard,
        Feature::Calendar,
        Feature::MealPlanner,
        Feature::BulletinBoard,
        Feature::Chores,
        Feature::Vault,
    ];

    /// Wire / storage key
    pub fn key(self) -> &'static str {
        match self {
            Feature::Dashboard => "dashboard",
            Feature::Calendar => "calendar",
            Feature::MealPlanner => "meal_planner",
            Feature::BulletinBoard => "bulletin_board",
            Feature::Chores => "chores",
            Feature::Vault => "vault",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Dashboard => "Lists",
            Feature::Calendar => "Calendar",
            Feature::MealPlanner => "Meals",
            Feature::BulletinBoard => "Bulletin",
            Feature::Chores => "Chores",
            Feature::Vault => "Vault",
        }
    }
}

impl Default for Feature {
    fn default() -> Self {
        Feature::Dashboard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    #[serde(default)]
    pub id: Option<u32>,
}

/// Shopping list summary card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Server-rendered summary card, present when the list arrives by push
    #[serde(default)]
    pub card_html: Option<String>,
}

/// Row of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub raw_timestamp: Option<String>,
}

/// Calendar event (also the agenda cache entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub title: String,
    pub date: chrono::NaiveDate,
    /// `HH:MM`, zero padded so it sorts lexically
    pub time: String,
    #[serde(default)]
    pub formatted_date: Option<String>,
    #[serde(default)]
    pub formatted_time: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

impl CalendarEvent {
    pub fn display_when(&self) -> String {
        let date = self
            .formatted_date
            .clone()
            .unwrap_or_else(|| self.date.format("%a, %b %d").to_string());
        let time = self.formatted_time.clone().unwrap_or_else(|| self.time.clone());
        format!("{} at {}", date, time)
    }
}

fn default_meal_type() -> String {
    "Dinner".to_string()
}

/// One meal slot; one per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub day: String,
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub notes_html: Option<String>,
}

/// Days of the meal planner week, in display order
pub const WEEK_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Chore in the family chore bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub name: String,
    pub points: u32,
}

/// A chore assigned to a member for the current week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreAssignment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub chore_name: String,
    pub points: u32,
    #[serde(default)]
    pub is_complete: bool,
    pub member_id: u32,
    pub member_name: String,
}

/// Bulletin board note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: Option<u32>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub raw_timestamp: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Server-rendered card, used when the note was fetched as a fragment
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteableUser {
    pub username: String,
}
