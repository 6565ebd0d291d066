use crate::entity::{Activity, Day, Period, PersonId};
use crate::schedule::Schedule;
use chrono::{NaiveTime, TimeDelta};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// One period-slot of a generated personal schedule.
#[derive(Debug, Clone, Copy)]
pub struct AgendaEntry<'a> {
    pub day: &'a Day,
    pub period: &'a Period,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    /// The activity in this period whose member set contains the target
    /// person, or `None` when they are free.
    ///
    /// Well-formed data has at most one match per period. Nothing in the
    /// model prevents a person from appearing in two activities of the same
    /// period; in that case the lowest-id activity is reported, which is
    /// deterministic but otherwise arbitrary.
    pub activity: Option<&'a Activity>,
}

/// Lazy walk over every day (in cycle order) and every period of that day
/// (in the day's order), accumulating a running clock from the day's start
/// time.
///
/// Purely a read-only query; recompute it on demand by calling
/// [`Schedule::agenda_for`] again. Time arithmetic wraps past midnight.
pub struct Agenda<'a> {
    schedule: &'a Schedule,
    person: PersonId,
    day_index: usize,
    slot_index: usize,
    clock: Option<NaiveTime>,
}

impl<'a> Iterator for Agenda<'a> {
    type Item = AgendaEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let day = self.schedule.days().get(self.day_index)?;
            if self.slot_index >= day.periods().len() {
                self.day_index += 1;
                self.slot_index = 0;
                self.clock = None;
                continue;
            }
            let period_id = day.periods()[self.slot_index];
            self.slot_index += 1;
            let Some(period) = self.schedule.period(period_id) else {
                // Unreachable while the graph's no-dangling-reference
                // invariant holds.
                continue;
            };
            let starts_at = self.clock.unwrap_or(day.start_time);
            // NaiveTime arithmetic wraps at midnight, so only the in-day
            // remainder of the duration affects the result; the remainder
            // always fits a TimeDelta.
            let ends_at =
                starts_at + TimeDelta::minutes(period.duration_minutes() % MINUTES_PER_DAY);
            self.clock = Some(ends_at);
            let activity = period
                .activities()
                .iter()
                .filter_map(|id| self.schedule.activity(*id))
                .find(|activity| activity.members().contains(&self.person));
            return Some(AgendaEntry {
                day,
                period,
                starts_at,
                ends_at,
                activity,
            });
        }
    }
}

impl Schedule {
    /// Generates `person`'s schedule: one entry per period of every day,
    /// whether or not the person participates in it.
    pub fn agenda_for(&self, person: PersonId) -> Agenda<'_> {
        Agenda {
            schedule: self,
            person,
            day_index: 0,
            slot_index: 0,
            clock: None,
        }
    }
}
