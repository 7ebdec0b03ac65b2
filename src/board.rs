//! Board State & Reducer
//!
//! Push events and form outcomes both decode into a [`Change`]. [`reduce`]
//! turns a change into the view patches it implies given the current
//! state, and [`BoardState::apply`] performs them. `reduce` never mutates,
//! so echo suppression and idempotence live entirely in it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use reactive_stores::Store;

use crate::models::{
    CalendarEvent, Chore, ChoreAssignment, Feature, ListItem, Meal, Note, ShoppingList,
    VaultEntry,
};

/// Everything that can happen to the board, whichever channel reported it
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    ListAdded { list: ShoppingList },
    ListDeleted { list_id: u32 },
    ItemAdded { list_id: u32, item: ListItem },
    ItemEdited { item_id: u32, new_text: String },
    ItemDeleted { item_id: u32 },
    ItemToggled { item_id: u32, done: bool },
    EventAdded { event: CalendarEvent },
    EventUpdated { event: CalendarEvent },
    EventDeleted { event_id: u32 },
    MealUpdated { meal: Meal, sid: Option<String> },
    MealDeleted { day: String, meal_type: String },
    MealRemoved { meal_id: u32 },
    ChoreToggled { assignment_id: u32, is_complete: bool, sid: Option<String> },
    ChoreAdded { chore: Chore },
    ChoreDeleted { chore_id: u32 },
    NoteAdded { note: Note },
    NoteDeleted { note_id: u32 },
    NotePinned { note_id: u32, is_pinned: bool },
    NoteFetched { note: Note },
    VaultAdded { entry: VaultEntry },
    VaultEdited { entry: VaultEntry },
    VaultDeleted { entry_id: u32 },
    NewActivity { feature: Feature, timestamp: NaiveDateTime },
    /// Local: optimistic flip before `toggle_done` is confirmed
    ItemToggledLocally { item_id: u32 },
    /// Local: optimistic flip before `toggle_chore` is confirmed
    ChoreToggledLocally { assignment_id: u32 },
    /// Local: the user opened a feature page
    FeatureVisited { feature: Feature, at: NaiveDateTime },
    /// Local: the push channel (re)connected with a session id
    Connected { sid: String },
}

/// A single view mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    AppendList(ShoppingList),
    RemoveList(u32),
    AppendItem { list_id: u32, item: ListItem },
    RemoveItem { list_id: u32, item_id: u32 },
    SetItemDone { list_id: u32, item_id: u32, done: bool },
    SetItemText { list_id: u32, item_id: u32, text: String },
    InsertEvent(CalendarEvent),
    ReplaceEvent(CalendarEvent),
    RemoveEvent(u32),
    SetMeal(Meal),
    ClearMeal { day: String },
    SetChoreComplete { assignment_id: u32, complete: bool },
    AppendChore(Chore),
    RemoveChore(u32),
    PrependNote { note: Note, pinned: bool },
    RemoveNote(u32),
    MoveNote { note_id: u32, pinned: bool },
    /// Not a mutation: the note is not held locally and must be fetched
    FetchNote { note_id: u32, pinned: bool },
    UpsertVault(VaultEntry),
    RemoveVault(u32),
    MarkUnread(Feature),
    MarkSeen { feature: Feature, at: NaiveDateTime },
    SetSid(String),
}

/// Client-side mirror of what the page shows
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    pub lists: Vec<ShoppingList>,
    /// List items keyed by list id
    pub items: BTreeMap<u32, Vec<ListItem>>,
    /// Calendar cache, also feeds the agenda
    pub events: Vec<CalendarEvent>,
    /// Meal cells keyed by day name
    pub meals: BTreeMap<String, Meal>,
    pub chore_bank: Vec<Chore>,
    pub chores: Vec<ChoreAssignment>,
    /// Board notes, newest first
    pub notes: Vec<Note>,
    /// Pinned notes, newest first
    pub pinned_notes: Vec<Note>,
    pub vault: Vec<VaultEntry>,
    pub unread: BTreeSet<Feature>,
    pub last_seen: BTreeMap<Feature, NaiveDateTime>,
    pub current: Feature,
    /// Our push session id, used to drop echoes of our own actions
    pub own_sid: Option<String>,
}

impl BoardState {
    /// Which list currently shows an item
    pub fn list_of_item(&self, item_id: u32) -> Option<u32> {
        self.items
            .iter()
            .find(|(_, rows)| rows.iter().any(|i| i.id == item_id))
            .map(|(list_id, _)| *list_id)
    }

    pub fn item(&self, item_id: u32) -> Option<&ListItem> {
        self.items.values().flatten().find(|i| i.id == item_id)
    }

    pub fn has_event(&self, event_id: u32) -> bool {
        self.events.iter().any(|e| e.id == event_id)
    }

    pub fn note(&self, note_id: u32) -> Option<(&Note, bool)> {
        self.pinned_notes
            .iter()
            .find(|n| n.id == note_id)
            .map(|n| (n, true))
            .or_else(|| self.notes.iter().find(|n| n.id == note_id).map(|n| (n, false)))
    }

    fn is_own(&self, sid: &Option<String>) -> bool {
        matches!((sid, &self.own_sid), (Some(a), Some(b)) if a == b)
    }

    /// Perform one patch
    pub fn apply(&mut self, patch: &Patch) {
        match patch {
            Patch::AppendList(list) => {
                self.lists.push(list.clone());
                self.items.entry(list.id).or_default();
            }
            Patch::RemoveList(list_id) => {
                self.lists.retain(|l| l.id != *list_id);
                self.items.remove(list_id);
            }
            Patch::AppendItem { list_id, item } => {
                self.items.entry(*list_id).or_default().push(item.clone());
            }
            Patch::RemoveItem { list_id, item_id } => {
                if let Some(rows) = self.items.get_mut(list_id) {
                    rows.retain(|i| i.id != *item_id);
                }
            }
            Patch::SetItemDone { list_id, item_id, done } => {
                if let Some(item) = self.item_mut(*list_id, *item_id) {
                    item.done = *done;
                }
            }
            Patch::SetItemText { list_id, item_id, text } => {
                if let Some(item) = self.item_mut(*list_id, *item_id) {
                    item.text = text.clone();
                }
            }
            Patch::InsertEvent(event) => self.events.push(event.clone()),
            Patch::ReplaceEvent(event) => {
                if let Some(slot) = self.events.iter_mut().find(|e| e.id == event.id) {
                    *slot = event.clone();
                }
            }
            Patch::RemoveEvent(event_id) => self.events.retain(|e| e.id != *event_id),
            Patch::SetMeal(meal) => {
                self.meals.insert(meal.day.clone(), meal.clone());
            }
            Patch::ClearMeal { day } => {
                self.meals.remove(day);
            }
            Patch::SetChoreComplete { assignment_id, complete } => {
                if let Some(a) = self.chores.iter_mut().find(|a| a.id == *assignment_id) {
                    a.is_complete = *complete;
                }
            }
            Patch::AppendChore(chore) => self.chore_bank.push(chore.clone()),
            Patch::RemoveChore(chore_id) => self.chore_bank.retain(|c| c.id != *chore_id),
            Patch::PrependNote { note, pinned } => {
                let mut note = note.clone();
                note.is_pinned = *pinned;
                self.container_mut(*pinned).insert(0, note);
            }
            Patch::RemoveNote(note_id) => {
                self.notes.retain(|n| n.id != *note_id);
                self.pinned_notes.retain(|n| n.id != *note_id);
            }
            Patch::MoveNote { note_id, pinned } => {
                let source = self.container_mut(!*pinned);
                if let Some(pos) = source.iter().position(|n| n.id == *note_id) {
                    let mut note = source.remove(pos);
                    note.is_pinned = *pinned;
                    self.container_mut(*pinned).insert(0, note);
                }
            }
            Patch::FetchNote { .. } => {}
            Patch::UpsertVault(entry) => {
                match self.vault.iter_mut().find(|e| e.id == entry.id) {
                    Some(slot) => *slot = entry.clone(),
                    None => self.vault.push(entry.clone()),
                }
            }
            Patch::RemoveVault(entry_id) => self.vault.retain(|e| e.id != *entry_id),
            Patch::MarkUnread(feature) => {
                self.unread.insert(*feature);
            }
            Patch::MarkSeen { feature, at } => {
                self.unread.remove(feature);
                self.last_seen.insert(*feature, *at);
                self.current = *feature;
            }
            Patch::SetSid(sid) => self.own_sid = Some(sid.clone()),
        }
    }

    fn item_mut(&mut self, list_id: u32, item_id: u32) -> Option<&mut ListItem> {
        self.items.get_mut(&list_id)?.iter_mut().find(|i| i.id == item_id)
    }

    fn container_mut(&mut self, pinned: bool) -> &mut Vec<Note> {
        if pinned {
            &mut self.pinned_notes
        } else {
            &mut self.notes
        }
    }
}

/// Compute the patches a change implies. Pure.
pub fn reduce(state: &BoardState, change: &Change) -> Vec<Patch> {
    match change {
        Change::ListAdded { list } => {
            if state.lists.iter().any(|l| l.id == list.id) {
                vec![]
            } else {
                vec![Patch::AppendList(list.clone())]
            }
        }
        Change::ListDeleted { list_id } => {
            if state.lists.iter().any(|l| l.id == *list_id) || state.items.contains_key(list_id) {
                vec![Patch::RemoveList(*list_id)]
            } else {
                vec![]
            }
        }
        Change::ItemAdded { list_id, item } => {
            // The acting client usually gets both the response and the push
            if state.item(item.id).is_some() || !state.items.contains_key(list_id) {
                vec![]
            } else {
                vec![Patch::AppendItem { list_id: *list_id, item: item.clone() }]
            }
        }
        Change::ItemEdited { item_id, new_text } => match state.list_of_item(*item_id) {
            Some(list_id) => vec![Patch::SetItemText {
                list_id,
                item_id: *item_id,
                text: new_text.clone(),
            }],
            None => vec![],
        },
        Change::ItemDeleted { item_id } => match state.list_of_item(*item_id) {
            Some(list_id) => vec![Patch::RemoveItem { list_id, item_id: *item_id }],
            None => vec![],
        },
        Change::ItemToggled { item_id, done } => match state.list_of_item(*item_id) {
            Some(list_id) => vec![Patch::SetItemDone { list_id, item_id: *item_id, done: *done }],
            None => vec![],
        },
        Change::ItemToggledLocally { item_id } => {
            match (state.list_of_item(*item_id), state.item(*item_id)) {
                (Some(list_id), Some(item)) => vec![Patch::SetItemDone {
                    list_id,
                    item_id: *item_id,
                    done: !item.done,
                }],
                _ => vec![],
            }
        }
        Change::EventAdded { event } => {
            if state.has_event(event.id) {
                vec![]
            } else {
                vec![Patch::InsertEvent(event.clone())]
            }
        }
        Change::EventUpdated { event } => {
            if state.has_event(event.id) {
                vec![Patch::ReplaceEvent(event.clone())]
            } else {
                vec![Patch::InsertEvent(event.clone())]
            }
        }
        Change::EventDeleted { event_id } => {
            if state.has_event(*event_id) {
                vec![Patch::RemoveEvent(*event_id)]
            } else {
                vec![]
            }
        }
        Change::MealUpdated { meal, sid } => {
            if state.is_own(sid) {
                vec![]
            } else {
                vec![Patch::SetMeal(meal.clone())]
            }
        }
        Change::MealDeleted { day, meal_type } => match state.meals.get(day) {
            Some(meal) if meal.meal_type.eq_ignore_ascii_case(meal_type) => {
                vec![Patch::ClearMeal { day: day.clone() }]
            }
            _ => vec![],
        },
        Change::MealRemoved { meal_id } => state
            .meals
            .values()
            .find(|m| m.id == *meal_id)
            .map(|m| vec![Patch::ClearMeal { day: m.day.clone() }])
            .unwrap_or_default(),
        Change::ChoreToggled { assignment_id, is_complete, sid } => {
            if state.is_own(sid) || !state.chores.iter().any(|a| a.id == *assignment_id) {
                vec![]
            } else {
                vec![Patch::SetChoreComplete {
                    assignment_id: *assignment_id,
                    complete: *is_complete,
                }]
            }
        }
        Change::ChoreToggledLocally { assignment_id } => state
            .chores
            .iter()
            .find(|a| a.id == *assignment_id)
            .map(|a| {
                vec![Patch::SetChoreComplete {
                    assignment_id: a.id,
                    complete: !a.is_complete,
                }]
            })
            .unwrap_or_default(),
        Change::ChoreAdded { chore } => {
            if state.chore_bank.iter().any(|c| c.id == chore.id) {
                vec![]
            } else {
                vec![Patch::AppendChore(chore.clone())]
            }
        }
        Change::ChoreDeleted { chore_id } => {
            if state.chore_bank.iter().any(|c| c.id == *chore_id) {
                vec![Patch::RemoveChore(*chore_id)]
            } else {
                vec![]
            }
        }
        Change::NoteAdded { note } => {
            if state.note(note.id).is_some() {
                vec![]
            } else {
                vec![Patch::PrependNote { note: note.clone(), pinned: note.is_pinned }]
            }
        }
        Change::NoteDeleted { note_id } => {
            if state.note(*note_id).is_some() {
                vec![Patch::RemoveNote(*note_id)]
            } else {
                vec![]
            }
        }
        Change::NotePinned { note_id, is_pinned } => match state.note(*note_id) {
            Some((_, pinned)) if pinned == *is_pinned => vec![],
            Some(_) => vec![Patch::MoveNote { note_id: *note_id, pinned: *is_pinned }],
            None => vec![Patch::FetchNote { note_id: *note_id, pinned: *is_pinned }],
        },
        Change::NoteFetched { note } => {
            let mut patches = Vec::new();
            if state.note(note.id).is_some() {
                patches.push(Patch::RemoveNote(note.id));
            }
            patches.push(Patch::PrependNote { note: note.clone(), pinned: note.is_pinned });
            patches
        }
        Change::VaultAdded { entry } | Change::VaultEdited { entry } => {
            vec![Patch::UpsertVault(entry.clone())]
        }
        Change::VaultDeleted { entry_id } => {
            if state.vault.iter().any(|e| e.id == *entry_id) {
                vec![Patch::RemoveVault(*entry_id)]
            } else {
                vec![]
            }
        }
        Change::NewActivity { feature, timestamp } => {
            let newer = state.last_seen.get(feature).map_or(true, |seen| timestamp > seen);
            if *feature != state.current && newer && !state.unread.contains(feature) {
                vec![Patch::MarkUnread(*feature)]
            } else {
                vec![]
            }
        }
        Change::FeatureVisited { feature, at } => {
            vec![Patch::MarkSeen { feature: *feature, at: *at }]
        }
        Change::Connected { sid } => vec![Patch::SetSid(sid.clone())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: u32, text: &str) -> ListItem {
        ListItem { id, text: text.to_string(), done: false, author: None, raw_timestamp: None }
    }

    fn note(id: u32) -> Note {
        Note {
            id,
            content: format!("Note {}", id),
            author: "sam".to_string(),
            author_id: Some(1),
            timestamp: String::new(),
            raw_timestamp: None,
            is_pinned: false,
            html: None,
        }
    }

    fn event(id: u32, title: &str) -> CalendarEvent {
        CalendarEvent {
            id,
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            time: "18:00".to_string(),
            formatted_date: None,
            formatted_time: None,
            author: None,
        }
    }

    fn meal(id: u32, day: &str, description: &str) -> Meal {
        Meal {
            id,
            day: day.to_string(),
            meal_type: "Dinner".to_string(),
            description: description.to_string(),
            notes: String::new(),
            notes_html: None,
        }
    }

    fn assignment(id: u32, complete: bool) -> ChoreAssignment {
        ChoreAssignment {
            id,
            chore_name: "Dishes".to_string(),
            points: 5,
            is_complete: complete,
            member_id: 1,
            member_name: "sam".to_string(),
        }
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn state_with_list(list_id: u32) -> BoardState {
        let mut state = BoardState::default();
        state.lists.push(ShoppingList { id: list_id, name: Some("Groceries".into()), card_html: None });
        state.items.insert(list_id, vec![]);
        state
    }

    fn run(state: &mut BoardState, change: Change) -> Vec<Patch> {
        let patches = reduce(state, &change);
        for p in &patches {
            state.apply(p);
        }
        patches
    }

    #[test]
    fn test_item_added_appends_exactly_once() {
        let mut state = state_with_list(4);
        let change = Change::ItemAdded { list_id: 4, item: item(10, "Milk") };

        assert_eq!(run(&mut state, change.clone()).len(), 1);
        // Same item again via the push echo
        assert!(run(&mut state, change).is_empty());
        assert_eq!(state.items[&4].len(), 1);
    }

    #[test]
    fn test_item_added_for_unshown_list_is_ignored() {
        let mut state = state_with_list(4);
        assert!(run(&mut state, Change::ItemAdded { list_id: 9, item: item(1, "x") }).is_empty());
        assert!(!state.items.contains_key(&9));
    }

    #[test]
    fn test_item_edit_toggle_delete() {
        let mut state = state_with_list(4);
        run(&mut state, Change::ItemAdded { list_id: 4, item: item(10, "Milk") });

        run(&mut state, Change::ItemEdited { item_id: 10, new_text: "Oat milk".into() });
        assert_eq!(state.item(10).unwrap().text, "Oat milk");

        // Toggle sets, never flips
        run(&mut state, Change::ItemToggled { item_id: 10, done: true });
        run(&mut state, Change::ItemToggled { item_id: 10, done: true });
        assert!(state.item(10).unwrap().done);

        run(&mut state, Change::ItemDeleted { item_id: 10 });
        assert!(state.item(10).is_none());
        assert!(run(&mut state, Change::ItemDeleted { item_id: 10 }).is_empty());
    }

    #[test]
    fn test_local_toggle_flips_then_push_confirms() {
        let mut state = state_with_list(1);
        run(&mut state, Change::ItemAdded { list_id: 1, item: item(2, "Eggs") });

        run(&mut state, Change::ItemToggledLocally { item_id: 2 });
        assert!(state.item(2).unwrap().done);
        run(&mut state, Change::ItemToggled { item_id: 2, done: true });
        assert!(state.item(2).unwrap().done);
    }

    #[test]
    fn test_list_added_and_deleted() {
        let mut state = BoardState::default();
        let list = ShoppingList { id: 3, name: None, card_html: Some("<div></div>".into()) };
        run(&mut state, Change::ListAdded { list: list.clone() });
        assert!(run(&mut state, Change::ListAdded { list }).is_empty());
        assert_eq!(state.lists.len(), 1);

        // A pushed list takes item pushes right away
        run(&mut state, Change::ItemAdded { list_id: 3, item: item(1, "a") });
        assert_eq!(state.items[&3].len(), 1);

        run(&mut state, Change::ListDeleted { list_id: 3 });
        assert!(state.lists.is_empty());
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_event_cache_add_update_delete() {
        let mut state = BoardState::default();
        run(&mut state, Change::EventAdded { event: event(1, "Soccer") });
        assert!(run(&mut state, Change::EventAdded { event: event(1, "Soccer") }).is_empty());

        run(&mut state, Change::EventUpdated { event: event(1, "Soccer final") });
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.events[0].title, "Soccer final");

        // Update for an event we never saw inserts it
        run(&mut state, Change::EventUpdated { event: event(2, "Recital") });
        assert_eq!(state.events.len(), 2);

        run(&mut state, Change::EventDeleted { event_id: 1 });
        assert_eq!(state.events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_meal_update_replaces_cell_and_skips_own_echo() {
        let mut state = BoardState::default();
        run(&mut state, Change::Connected { sid: "me".into() });

        run(&mut state, Change::MealUpdated { meal: meal(1, "Monday", "Pasta"), sid: Some("other".into()) });
        assert_eq!(state.meals["Monday"].description, "Pasta");

        let own = Change::MealUpdated { meal: meal(1, "Monday", "Soup"), sid: Some("me".into()) };
        assert!(run(&mut state, own).is_empty());
        assert_eq!(state.meals["Monday"].description, "Pasta");

        run(&mut state, Change::MealUpdated { meal: meal(1, "Monday", "Curry"), sid: None });
        assert_eq!(state.meals["Monday"].description, "Curry");
    }

    #[test]
    fn test_meal_deleted_by_day_and_by_id() {
        let mut state = BoardState::default();
        state.meals.insert("Monday".into(), meal(1, "Monday", "Pasta"));
        state.meals.insert("Friday".into(), meal(2, "Friday", "Pizza"));

        assert!(run(&mut state, Change::MealDeleted { day: "Monday".into(), meal_type: "Lunch".into() }).is_empty());
        run(&mut state, Change::MealDeleted { day: "Monday".into(), meal_type: "Dinner".into() });
        assert!(!state.meals.contains_key("Monday"));

        run(&mut state, Change::MealRemoved { meal_id: 2 });
        assert!(state.meals.is_empty());
    }

    #[test]
    fn test_chore_toggle_optimistic_and_echo() {
        let mut state = BoardState::default();
        state.chores.push(assignment(5, false));
        run(&mut state, Change::Connected { sid: "me".into() });

        run(&mut state, Change::ChoreToggledLocally { assignment_id: 5 });
        assert!(state.chores[0].is_complete);

        // Our own broadcast comes back; ignored
        let echo = Change::ChoreToggled { assignment_id: 5, is_complete: true, sid: Some("me".into()) };
        assert!(run(&mut state, echo).is_empty());

        let other = Change::ChoreToggled { assignment_id: 5, is_complete: false, sid: Some("them".into()) };
        run(&mut state, other);
        assert!(!state.chores[0].is_complete);
    }

    #[test]
    fn test_note_pin_migrates_between_containers() {
        let mut state = BoardState::default();
        run(&mut state, Change::NoteAdded { note: note(1) });
        run(&mut state, Change::NoteAdded { note: note(2) });
        assert_eq!(state.notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 1]);

        run(&mut state, Change::NotePinned { note_id: 1, is_pinned: true });
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.pinned_notes[0].id, 1);
        assert!(state.pinned_notes[0].is_pinned);

        // Already pinned: nothing to do
        assert!(run(&mut state, Change::NotePinned { note_id: 1, is_pinned: true }).is_empty());

        run(&mut state, Change::NotePinned { note_id: 1, is_pinned: false });
        assert_eq!(state.notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(state.pinned_notes.is_empty());
    }

    #[test]
    fn test_pin_of_unknown_note_requests_fetch() {
        let state = BoardState::default();
        let patches = reduce(&state, &Change::NotePinned { note_id: 8, is_pinned: true });
        assert_eq!(patches, vec![Patch::FetchNote { note_id: 8, pinned: true }]);

        let mut state = state;
        let mut fetched = note(8);
        fetched.is_pinned = true;
        run(&mut state, Change::NoteFetched { note: fetched });
        assert_eq!(state.pinned_notes.len(), 1);
    }

    #[test]
    fn test_note_deleted_from_either_container() {
        let mut state = BoardState::default();
        state.pinned_notes.push(note(1));
        state.notes.push(note(2));
        run(&mut state, Change::NoteDeleted { note_id: 1 });
        run(&mut state, Change::NoteDeleted { note_id: 2 });
        assert!(state.notes.is_empty() && state.pinned_notes.is_empty());
    }

    #[test]
    fn test_new_activity_marks_unread_only_when_newer_and_elsewhere() {
        let mut state = BoardState::default();
        state.current = Feature::Dashboard;
        state.last_seen.insert(Feature::Calendar, at(10));

        assert!(run(&mut state, Change::NewActivity { feature: Feature::Dashboard, timestamp: at(12) }).is_empty());
        assert!(run(&mut state, Change::NewActivity { feature: Feature::Calendar, timestamp: at(9) }).is_empty());

        run(&mut state, Change::NewActivity { feature: Feature::Calendar, timestamp: at(11) });
        assert!(state.unread.contains(&Feature::Calendar));

        // Never seen at all counts as newer
        run(&mut state, Change::NewActivity { feature: Feature::BulletinBoard, timestamp: at(1) });
        assert!(state.unread.contains(&Feature::BulletinBoard));

        run(&mut state, Change::FeatureVisited { feature: Feature::Calendar, at: at(13) });
        assert!(!state.unread.contains(&Feature::Calendar));
        assert_eq!(state.current, Feature::Calendar);
        assert_eq!(state.last_seen[&Feature::Calendar], at(13));
    }

    #[test]
    fn test_activity_compares_against_utc_visit() {
        use crate::events::parse_activity_timestamp;
        use crate::unread::visit_time;
        use chrono::Duration;

        let mut state = BoardState::default();
        let visited = visit_time();
        run(&mut state, Change::FeatureVisited { feature: Feature::Calendar, at: visited });
        run(&mut state, Change::FeatureVisited { feature: Feature::Dashboard, at: visited });

        // Server stamps `datetime.utcnow().isoformat()`
        let stamp = |t: NaiveDateTime| {
            parse_activity_timestamp(&t.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()).unwrap()
        };
        let before = stamp(visited - Duration::minutes(1));
        assert!(run(&mut state, Change::NewActivity { feature: Feature::Calendar, timestamp: before }).is_empty());

        let after = stamp(visited + Duration::minutes(1));
        run(&mut state, Change::NewActivity { feature: Feature::Calendar, timestamp: after });
        assert!(state.unread.contains(&Feature::Calendar));
    }

    #[test]
    fn test_chore_bank_add_once_and_delete_known_only() {
        let mut state = BoardState::default();
        let chore = Chore { id: 4, name: "Vacuum".into(), points: 3 };
        assert_eq!(run(&mut state, Change::ChoreAdded { chore: chore.clone() }).len(), 1);
        assert!(run(&mut state, Change::ChoreAdded { chore }).is_empty());
        assert_eq!(state.chore_bank.len(), 1);

        assert!(run(&mut state, Change::ChoreDeleted { chore_id: 9 }).is_empty());
        run(&mut state, Change::ChoreDeleted { chore_id: 4 });
        assert!(state.chore_bank.is_empty());
    }

    #[test]
    fn test_fetched_note_replaces_copy_in_other_container() {
        let mut state = BoardState::default();
        state.notes.push(note(3));

        let mut fetched = note(3);
        fetched.is_pinned = true;
        fetched.html = Some("<article></article>".into());
        let patches = run(&mut state, Change::NoteFetched { note: fetched });
        assert_eq!(patches.len(), 2);
        assert!(state.notes.is_empty());
        assert_eq!(state.pinned_notes.len(), 1);
        assert!(state.pinned_notes[0].html.is_some());
    }

    #[test]
    fn test_list_deleted_with_only_items_entry() {
        let mut state = BoardState::default();
        state.items.insert(6, vec![item(1, "Bread")]);
        assert_eq!(run(&mut state, Change::ListDeleted { list_id: 6 }), vec![Patch::RemoveList(6)]);
        assert!(state.items.is_empty());
        assert!(run(&mut state, Change::ListDeleted { list_id: 6 }).is_empty());
    }

    #[test]
    fn test_vault_upsert_and_delete() {
        let mut state = BoardState::default();
        let entry = VaultEntry { id: 1, category: "Wifi".into(), title: "Home".into(), content: "pw".into() };
        run(&mut state, Change::VaultAdded { entry: entry.clone() });
        run(&mut state, Change::VaultEdited { entry: VaultEntry { category: "Network".into(), ..entry } });
        assert_eq!(state.vault.len(), 1);
        assert_eq!(state.vault[0].category, "Network");
        run(&mut state, Change::VaultDeleted { entry_id: 1 });
        assert!(state.vault.is_empty());
    }
}
