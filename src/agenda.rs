//! Calendar Views
//!
//! Month grid and mobile agenda, both derived from the calendar event cache.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::CalendarEvent;

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The week after `week` in the chore history, unless that would go past
/// `current` (the running week)
pub fn next_history_week(week: NaiveDate, current: NaiveDate) -> Option<NaiveDate> {
    let next = week_start(week) + Days::new(7);
    (next <= week_start(current)).then_some(next)
}

/// A cell of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub event_count: usize,
}

/// Weeks (Monday first) covering the whole month, padded with days of the
/// neighbouring months
pub fn month_grid(year: i32, month: u32, events: &[CalendarEvent]) -> Vec<Vec<GridDay>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for e in events {
        *counts.entry(e.date).or_default() += 1;
    }

    let mut weeks = Vec::new();
    let mut day = week_start(first);
    loop {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            week.push(GridDay {
                date: day,
                in_month: day.month() == month && day.year() == year,
                event_count: counts.get(&day).copied().unwrap_or(0),
            });
            day = day + Days::new(1);
        }
        weeks.push(week);
        if day.month() != month || day.year() != year {
            break;
        }
    }
    weeks
}

/// Step a (year, month) pair by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// One day of the agenda list
#[derive(Debug, Clone, PartialEq)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

/// Events from `from` through the next `days` days, grouped by date and
/// ordered by time. Days without events are left out.
pub fn agenda(events: &[CalendarEvent], from: NaiveDate, days: u64) -> Vec<AgendaDay> {
    let until = from + Days::new(days);
    let mut grouped: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    for e in events.iter().filter(|e| e.date >= from && e.date < until) {
        grouped.entry(e.date).or_default().push(e.clone());
    }

    grouped
        .into_iter()
        .map(|(date, mut events)| {
            events.sort_by(|a, b| a.time.cmp(&b.time).then(a.id.cmp(&b.id)));
            AgendaDay { date, events }
        })
        .collect()
}

/// Events on a single day, ordered by time
pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<CalendarEvent> {
    agenda(events, date, 1).into_iter().next().map(|d| d.events).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: u32, date: NaiveDate, time: &str) -> CalendarEvent {
        CalendarEvent {
            id,
            title: format!("Event {}", id),
            date,
            time: time.to_string(),
            formatted_date: None,
            formatted_time: None,
            author: None,
        }
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2026-10-17 is a Saturday
        assert_eq!(week_start(ymd(2026, 10, 17)), ymd(2026, 10, 12));
        assert_eq!(week_start(ymd(2026, 10, 12)), ymd(2026, 10, 12));
    }

    #[test]
    fn test_next_history_week_stops_at_current() {
        let current = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(next_history_week(past, current), NaiveDate::from_ymd_opt(2026, 10, 12));
        assert_eq!(next_history_week(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(), current), None);
        // Mid-week dates snap to Monday first
        assert_eq!(
            next_history_week(NaiveDate::from_ymd_opt(2026, 10, 8).unwrap(), current),
            NaiveDate::from_ymd_opt(2026, 10, 12)
        );
    }

    #[test]
    fn test_month_grid_pads_to_full_weeks() {
        let events = vec![event(1, ymd(2026, 10, 1), "09:00"), event(2, ymd(2026, 10, 1), "10:00")];
        let grid = month_grid(2026, 10, &events);

        // Oct 2026: Thursday 1st to Saturday 31st
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|w| w.len() == 7));
        assert_eq!(grid[0][0].date, ymd(2026, 9, 28));
        assert!(!grid[0][0].in_month);
        assert_eq!(grid[0][3].date, ymd(2026, 10, 1));
        assert_eq!(grid[0][3].event_count, 2);
        assert_eq!(grid[4][6].date, ymd(2026, 11, 1));
    }

    #[test]
    fn test_month_grid_rejects_bad_month() {
        assert!(month_grid(2026, 13, &[]).is_empty());
    }

    #[test]
    fn test_shift_month_wraps_years() {
        assert_eq!(shift_month(2026, 12, 1), (2027, 1));
        assert_eq!(shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(shift_month(2026, 5, 0), (2026, 5));
    }

    #[test]
    fn test_agenda_groups_and_sorts() {
        let today = ymd(2026, 10, 17);
        let events = vec![
            event(1, ymd(2026, 10, 18), "18:00"),
            event(2, ymd(2026, 10, 18), "08:15"),
            event(3, ymd(2026, 10, 16), "12:00"),
            event(4, ymd(2026, 10, 24), "12:00"),
            event(5, today, "07:00"),
        ];

        let days = agenda(&events, today, 7);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, today);
        assert_eq!(days[1].events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 1]);

        assert_eq!(events_on(&events, ymd(2026, 10, 24)).len(), 1);
        assert!(events_on(&events, ymd(2026, 10, 25)).is_empty());
    }
}
