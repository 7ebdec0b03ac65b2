//! Chore Progress
//!
//! Point totals per member and for the whole family, recomputed from the
//! local assignment cards. Optimistic: it reflects whatever the client has
//! seen, so a missed push can make it drift from the server.

use std::collections::BTreeMap;

use crate::models::ChoreAssignment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

impl Progress {
    /// Whole percent, truncated; 0 when there is nothing to do
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (u64::from(self.completed) * 100 / u64::from(self.total)) as u32
        }
    }

    fn add(&mut self, assignment: &ChoreAssignment) {
        self.total += assignment.points;
        if assignment.is_complete {
            self.completed += assignment.points;
        }
    }
}

/// One member's row on the chore board
#[derive(Debug, Clone, PartialEq)]
pub struct MemberProgress {
    pub member_id: u32,
    pub member_name: String,
    pub assignments: Vec<ChoreAssignment>,
    pub progress: Progress,
}

/// Group assignments by member, sorted by member name
pub fn member_progress(assignments: &[ChoreAssignment]) -> Vec<MemberProgress> {
    let mut by_member: BTreeMap<u32, MemberProgress> = BTreeMap::new();
    for a in assignments {
        let row = by_member.entry(a.member_id).or_insert_with(|| MemberProgress {
            member_id: a.member_id,
            member_name: a.member_name.clone(),
            assignments: Vec::new(),
            progress: Progress::default(),
        });
        row.progress.add(a);
        row.assignments.push(a.clone());
    }

    let mut rows: Vec<MemberProgress> = by_member.into_values().collect();
    rows.sort_by(|a, b| a.member_name.cmp(&b.member_name));
    rows
}

/// Family-wide totals
pub fn family_progress(assignments: &[ChoreAssignment]) -> Progress {
    let mut total = Progress::default();
    for a in assignments {
        total.add(a);
    }
    total
}
