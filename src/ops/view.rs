//! The visible task list: filtering, numbering, and countdown text.
//!
//! `project` is a pure function of the tasks, the filters, and `now`.
//! Calendar-day comparisons happen in the zone of `now`, and naive stored
//! dates are read as wall-clock time in that zone.

use chrono::{DateTime, Days, FixedOffset, Local, Months, TimeZone, Utc};

use crate::model::config::TimeZonePolicy;
use crate::model::filter::{DetailFilter, StatusFilter, ViewFilters};
use crate::model::task::{Task, TaskId};
use crate::ops::countdown::{self, INVALID};
use crate::ops::due;

/// One displayed task
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    /// 1-based position in the visible list
    pub number: usize,
    pub task: Task,
    /// Resolved due instant, `None` if the stored date is unreadable
    pub due: Option<DateTime<FixedOffset>>,
    pub countdown: String,
}

impl ViewRow {
    pub fn id(&self) -> TaskId {
        self.task.id
    }

    /// Recompute the countdown text against `now`; true if it changed.
    pub fn refresh_countdown<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let text = match &self.due {
            Some(due) => countdown::countdown(due, now),
            None => INVALID.to_string(),
        };
        if text == self.countdown {
            return false;
        }
        self.countdown = text;
        true
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub fn matches_status(task: &Task, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => !task.is_completed,
        StatusFilter::Completed => task.is_completed,
    }
}

/// Case-insensitive substring match on the title. Empty matches everything.
pub fn matches_search(task: &Task, keyword: &str) -> bool {
    keyword.is_empty() || task.text.to_lowercase().contains(&keyword.to_lowercase())
}

/// Due-date range match. An unreadable due date matches only `All`.
pub fn matches_detail<Tz: TimeZone>(task: &Task, detail: DetailFilter, now: &DateTime<Tz>) -> bool {
    if detail == DetailFilter::All {
        return true;
    }
    let Some(due) = due::resolve(&task.due_date, &now.timezone()) else {
        return false;
    };
    let today = now.date_naive();
    match detail {
        DetailFilter::All => true,
        DetailFilter::Today => due.date_naive() == today,
        DetailFilter::NextDay => today.succ_opt() == Some(due.date_naive()),
        DetailFilter::Overdue => due < *now && !task.is_completed,
        DetailFilter::NextWeek => within(&due, now, now.clone().checked_add_days(Days::new(7))),
        DetailFilter::NextMonth => within(&due, now, now.clone().checked_add_months(Months::new(1))),
    }
}

/// `now < due <= end`
fn within<Tz: TimeZone>(due: &DateTime<Tz>, now: &DateTime<Tz>, end: Option<DateTime<Tz>>) -> bool {
    match end {
        Some(end) => *now < *due && *due <= end,
        None => false,
    }
}

pub fn matches<Tz: TimeZone>(task: &Task, filters: &ViewFilters, now: &DateTime<Tz>) -> bool {
    matches_status(task, filters.status)
        && matches_search(task, &filters.search)
        && matches_detail(task, filters.detail, now)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Visible rows in store order, each with its countdown at `now`.
pub fn project<Tz: TimeZone>(tasks: &[Task], filters: &ViewFilters, now: &DateTime<Tz>) -> Vec<ViewRow> {
    let tz = now.timezone();
    tasks
        .iter()
        .filter(|t| matches(t, filters, now))
        .enumerate()
        .map(|(i, task)| {
            let due = due::resolve(&task.due_date, &tz).map(|d| d.fixed_offset());
            let countdown = match &due {
                Some(d) => countdown::countdown(d, now),
                None => INVALID.to_string(),
            };
            ViewRow {
                number: i + 1,
                task: task.clone(),
                due,
                countdown,
            }
        })
        .collect()
}

/// `project` at the current instant, in the zone the policy names
pub fn project_now(tasks: &[Task], filters: &ViewFilters, policy: TimeZonePolicy) -> Vec<ViewRow> {
    match policy {
        TimeZonePolicy::Local => project(tasks, filters, &Local::now()),
        TimeZonePolicy::Utc => project(tasks, filters, &Utc::now()),
    }
}

/// The current instant under `policy`, as a fixed offset
pub fn now_in(policy: TimeZonePolicy) -> DateTime<FixedOffset> {
    match policy {
        TimeZonePolicy::Local => Local::now().fixed_offset(),
        TimeZonePolicy::Utc => Utc::now().fixed_offset(),
    }
}

/// A projected list remembered together with what it was projected from.
///
/// Timer ticks only rewrite countdown text. A change of store revision or of
/// filters means the rows must be projected again.
#[derive(Debug, Clone, Default)]
pub struct MaterializedView {
    pub rows: Vec<ViewRow>,
    pub revision: u64,
    pub filters: ViewFilters,
}

impl MaterializedView {
    pub fn build<Tz: TimeZone>(tasks: &[Task], filters: &ViewFilters, revision: u64, now: &DateTime<Tz>) -> Self {
        MaterializedView {
            rows: project(tasks, filters, now),
            revision,
            filters: filters.clone(),
        }
    }

    pub fn is_stale(&self, revision: u64, filters: &ViewFilters) -> bool {
        self.revision != revision || self.filters != *filters
    }

    /// Refresh every row's countdown; true if any text changed.
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let mut changed = false;
        for row in &mut self.rows {
            changed |= row.refresh_countdown(now);
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// `Oct 18, 2026`
pub fn format_due_date<Tz: TimeZone>(due: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    due.format("%b %d, %Y").to_string()
}

/// `02:30 PM`
pub fn format_due_time<Tz: TimeZone>(due: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    due.format("%I:%M %p").to_string()
}

/// Time plus countdown, e.g. `02:30 PM — 1h 0m 0s left`
pub fn due_label(row: &ViewRow) -> String {
    match &row.due {
        Some(due) => format!("{} — {}", format_due_time(due), row.countdown),
        None => row.countdown.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn at(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn task(id: TaskId, text: &str, due: &str) -> Task {
        Task::new(id, text, due)
    }

    fn ids(rows: &[ViewRow]) -> Vec<TaskId> {
        rows.iter().map(|r| r.task.id).collect()
    }

    fn detail(d: DetailFilter) -> ViewFilters {
        ViewFilters {
            detail: d,
            ..ViewFilters::default()
        }
    }

    #[test]
    fn default_filters_show_everything_numbered_in_order() {
        let tasks = vec![
            task(3, "c", "2026-10-20"),
            task(1, "a", "2026-10-01"),
            task(2, "b", "broken"),
        ];
        let rows = project(&tasks, &ViewFilters::default(), &now());
        assert_eq!(ids(&rows), vec![3, 1, 2]);
        assert_eq!(rows.iter().map(|r| r.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[1].countdown, "Expired");
        assert_eq!(rows[2].countdown, "Invalid date");
        assert_eq!(rows[2].due, None);
    }

    #[test]
    fn status_filter() {
        let mut done = task(2, "done", "2026-10-20");
        done.is_completed = true;
        let tasks = vec![task(1, "open", "2026-10-20"), done];
        let active = ViewFilters {
            status: StatusFilter::Active,
            ..ViewFilters::default()
        };
        let completed = ViewFilters {
            status: StatusFilter::Completed,
            ..ViewFilters::default()
        };
        assert_eq!(ids(&project(&tasks, &active, &now())), vec![1]);
        assert_eq!(ids(&project(&tasks, &completed, &now())), vec![2]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let tasks = vec![task(1, "Buy Milk", "2026-10-20"), task(2, "Walk dog", "2026-10-20")];
        let filters = ViewFilters {
            search: "milk".into(),
            ..ViewFilters::default()
        };
        assert_eq!(ids(&project(&tasks, &filters, &now())), vec![1]);
        let filters = ViewFilters {
            search: "MILK".into(),
            ..ViewFilters::default()
        };
        assert_eq!(ids(&project(&tasks, &filters, &now())), vec![1]);
    }

    #[test]
    fn today_and_next_day_use_calendar_days() {
        let tasks = vec![
            task(1, "early today", "2026-10-18T00:01"),
            task(2, "late today", "2026-10-18T23:59"),
            task(3, "tomorrow", "2026-10-19T08:00"),
            task(4, "day after", "2026-10-20T00:00"),
        ];
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::Today), &now())), vec![1, 2]);
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::NextDay), &now())), vec![3]);
    }

    #[test]
    fn calendar_day_follows_the_zone_of_now() {
        // 23:30 UTC on the 18th is already the 19th at +02:00
        let tasks = vec![task(1, "x", "2026-10-18T23:30:00Z")];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now_utc = now();
        let now_local = now_utc.with_timezone(&plus_two);
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::Today), &now_utc)), vec![1]);
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::NextDay), &now_local)), vec![1]);
    }

    #[test]
    fn overdue_excludes_completed() {
        let mut done = task(2, "done late", "2026-10-17");
        done.is_completed = true;
        let tasks = vec![task(1, "late", "2026-10-17"), done, task(3, "future", "2026-10-19")];
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::Overdue), &now())), vec![1]);
    }

    #[test]
    fn active_and_overdue_compose() {
        let mut done = task(2, "done late", "2026-10-17");
        done.is_completed = true;
        let tasks = vec![task(1, "late", "2026-10-17"), done];
        let filters = ViewFilters {
            status: StatusFilter::Active,
            detail: DetailFilter::Overdue,
            ..ViewFilters::default()
        };
        assert_eq!(ids(&project(&tasks, &filters, &now())), vec![1]);
    }

    #[test]
    fn next_week_boundary_is_inclusive() {
        let week = now() + Duration::days(7);
        let tasks = vec![
            task(1, "exact", &at(week)),
            task(2, "one second over", &at(week + Duration::seconds(1))),
            task(3, "now", &at(now())),
            task(4, "soon", &at(now() + Duration::seconds(1))),
        ];
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::NextWeek), &now())), vec![1, 4]);
    }

    #[test]
    fn next_month_is_one_calendar_month() {
        let tasks = vec![
            task(1, "exact", "2026-11-18T12:00:00Z"),
            task(2, "over", "2026-11-18T12:00:01Z"),
            task(3, "past", "2026-10-01T00:00:00Z"),
        ];
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::NextMonth), &now())), vec![1]);
    }

    #[test]
    fn next_month_clamps_at_month_end() {
        let jan31 = Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
        let tasks = vec![
            task(1, "feb end", "2026-02-28T12:00:00Z"),
            task(2, "march", "2026-03-01T00:00:00Z"),
        ];
        assert_eq!(ids(&project(&tasks, &detail(DetailFilter::NextMonth), &jan31)), vec![1]);
    }

    #[test]
    fn invalid_due_matches_only_all() {
        let tasks = vec![task(1, "broken", "whenever")];
        for d in DetailFilter::ALL {
            let rows = project(&tasks, &detail(d), &now());
            assert_eq!(rows.len(), usize::from(d == DetailFilter::All), "filter {}", d);
        }
    }

    #[test]
    fn tick_updates_countdown_only() {
        let tasks = vec![task(1, "soon", &at(now() + Duration::seconds(2)))];
        let mut view = MaterializedView::build(&tasks, &ViewFilters::default(), 4, &now());
        assert_eq!(view.rows[0].countdown, "2s left");

        assert!(view.tick(&(now() + Duration::seconds(1))));
        assert_eq!(view.rows[0].countdown, "1s left");
        assert!(view.tick(&(now() + Duration::seconds(3))));
        assert_eq!(view.rows[0].countdown, "Expired");
        assert!(!view.tick(&(now() + Duration::seconds(4))));
        assert_eq!(view.len(), 1);
        assert_eq!(view.revision, 4);
    }

    #[test]
    fn staleness_tracks_revision_and_filters() {
        let view = MaterializedView::build(&[], &ViewFilters::default(), 2, &now());
        assert!(!view.is_stale(2, &ViewFilters::default()));
        assert!(view.is_stale(3, &ViewFilters::default()));
        assert!(view.is_stale(2, &detail(DetailFilter::Today)));
    }

    #[test]
    fn display_helpers() {
        let tasks = vec![task(1, "x", "2026-10-18T14:30")];
        let rows = project(&tasks, &ViewFilters::default(), &now());
        let due = rows[0].due.unwrap();
        assert_eq!(format_due_date(&due), "Oct 18, 2026");
        assert_eq!(format_due_time(&due), "02:30 PM");
        assert_eq!(due_label(&rows[0]), "02:30 PM — 2h 30m 0s left");
    }
}
