use crate::entity::{Activity, ActivityId, Day, DayId, Period, PeriodId, Person, PersonId};
use crate::observable::ObservableList;

/// The schedule graph: four entity collections plus the relationships between
/// them.
///
/// The collections are the only place an entity exists; relationship fields
/// hold entity ids and are mutated exclusively through this type, which is
/// what keeps every reference resolvable. Removing an entity cascades: every
/// inbound reference from one level up is stripped before the call returns.
///
/// Operations naming an entity that is not (or no longer) in the graph are
/// no-ops reported through their `bool` return value, never errors.
pub struct Schedule {
    days: ObservableList<Day>,
    periods: ObservableList<Period>,
    activities: ObservableList<Activity>,
    persons: ObservableList<Person>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            days: ObservableList::new(),
            periods: ObservableList::new(),
            activities: ObservableList::new(),
            persons: ObservableList::new(),
        }
    }

    pub fn days(&self) -> &ObservableList<Day> {
        &self.days
    }

    pub fn periods(&self) -> &ObservableList<Period> {
        &self.periods
    }

    pub fn activities(&self) -> &ObservableList<Activity> {
        &self.activities
    }

    pub fn persons(&self) -> &ObservableList<Person> {
        &self.persons
    }

    pub fn day_index(&self, id: DayId) -> Option<usize> {
        self.days.iter().position(|day| day.id() == id)
    }

    pub fn period_index(&self, id: PeriodId) -> Option<usize> {
        self.periods.iter().position(|period| period.id() == id)
    }

    pub fn activity_index(&self, id: ActivityId) -> Option<usize> {
        self.activities.iter().position(|activity| activity.id() == id)
    }

    pub fn person_index(&self, id: PersonId) -> Option<usize> {
        self.persons.iter().position(|person| person.id() == id)
    }

    pub fn day(&self, id: DayId) -> Option<&Day> {
        self.days.iter().find(|day| day.id() == id)
    }

    pub fn period(&self, id: PeriodId) -> Option<&Period> {
        self.periods.iter().find(|period| period.id() == id)
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id() == id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.iter().find(|person| person.id() == id)
    }

    /// Appends a day to the cycle. No relationship side effects.
    pub fn add_day(&mut self, day: Day) -> DayId {
        let id = day.id();
        self.days.push(day);
        id
    }

    pub fn add_period(&mut self, period: Period) -> PeriodId {
        let id = period.id();
        self.periods.push(period);
        id
    }

    pub fn add_activity(&mut self, activity: Activity) -> ActivityId {
        let id = activity.id();
        self.activities.push(activity);
        id
    }

    pub fn add_person(&mut self, person: Person) -> PersonId {
        let id = person.id();
        self.persons.push(person);
        id
    }

    /// Removes a day from the cycle. Days are the root of the hierarchy, so
    /// nothing references them and there is no cascade.
    pub fn remove_day(&mut self, id: DayId) -> bool {
        match self.day_index(id) {
            Some(index) => {
                self.days.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Removes a period, stripping **every** occurrence of it from every
    /// day's sequence (a day may list the same period more than once).
    pub fn remove_period(&mut self, id: PeriodId) -> bool {
        let Some(index) = self.period_index(id) else {
            return false;
        };
        for day_index in 0..self.days.len() {
            let affected = self
                .days
                .get(day_index)
                .is_some_and(|day| day.periods.contains(&id));
            if affected {
                self.days
                    .update(day_index, |day| day.periods.retain(|period| *period != id));
            }
        }
        self.periods.remove_at(index);
        true
    }

    /// Removes an activity, stripping it from every period's activity set.
    pub fn remove_activity(&mut self, id: ActivityId) -> bool {
        let Some(index) = self.activity_index(id) else {
            return false;
        };
        for period_index in 0..self.periods.len() {
            let affected = self
                .periods
                .get(period_index)
                .is_some_and(|period| period.activities.contains(&id));
            if affected {
                self.periods.update(period_index, |period| {
                    period.activities.remove(&id);
                });
            }
        }
        self.activities.remove_at(index);
        true
    }

    /// Removes a person, stripping them from every activity's member set.
    pub fn remove_person(&mut self, id: PersonId) -> bool {
        let Some(index) = self.person_index(id) else {
            return false;
        };
        for activity_index in 0..self.activities.len() {
            let affected = self
                .activities
                .get(activity_index)
                .is_some_and(|activity| activity.members.contains(&id));
            if affected {
                self.activities.update(activity_index, |activity| {
                    activity.members.remove(&id);
                });
            }
        }
        self.persons.remove_at(index);
        true
    }

    /// Appends `period` to `day`'s sequence. The sequence is a multiset, so
    /// attaching an already-listed period appends a duplicate entry.
    pub fn attach_period(&mut self, day: DayId, period: PeriodId) -> bool {
        let Some(day_index) = self.day_index(day) else {
            return false;
        };
        if self.period_index(period).is_none() {
            return false;
        }
        self.days.update(day_index, |day| day.periods.push(period));
        true
    }

    /// Removes the first occurrence of `period` from `day`'s sequence.
    /// Returns false if the day, the period, or the link is absent.
    pub fn detach_period(&mut self, day: DayId, period: PeriodId) -> bool {
        let Some(day_index) = self.day_index(day) else {
            return false;
        };
        let position = self
            .days
            .get(day_index)
            .and_then(|day| day.periods.iter().position(|entry| *entry == period));
        match position {
            Some(position) => {
                self.days.update(day_index, |day| {
                    day.periods.remove(position);
                });
                true
            }
            None => false,
        }
    }

    /// Adds `activity` to `period`'s set. Set semantics: attaching an
    /// already-present activity is an accepted no-op (and emits no event).
    pub fn attach_activity(&mut self, period: PeriodId, activity: ActivityId) -> bool {
        let Some(period_index) = self.period_index(period) else {
            return false;
        };
        if self.activity_index(activity).is_none() {
            return false;
        }
        let already_present = self
            .periods
            .get(period_index)
            .is_some_and(|period| period.activities.contains(&activity));
        if !already_present {
            self.periods.update(period_index, |period| {
                period.activities.insert(activity);
            });
        }
        true
    }

    /// Removes `activity` from `period`'s set. Returns false if the period,
    /// the activity link, or the period itself is absent.
    pub fn detach_activity(&mut self, period: PeriodId, activity: ActivityId) -> bool {
        let Some(period_index) = self.period_index(period) else {
            return false;
        };
        let present = self
            .periods
            .get(period_index)
            .is_some_and(|period| period.activities.contains(&activity));
        if !present {
            return false;
        }
        self.periods.update(period_index, |period| {
            period.activities.remove(&activity);
        });
        true
    }

    /// Adds `person` to `activity`'s member set; set semantics as above.
    pub fn attach_member(&mut self, activity: ActivityId, person: PersonId) -> bool {
        let Some(activity_index) = self.activity_index(activity) else {
            return false;
        };
        if self.person_index(person).is_none() {
            return false;
        }
        let already_present = self
            .activities
            .get(activity_index)
            .is_some_and(|activity| activity.members.contains(&person));
        if !already_present {
            self.activities.update(activity_index, |activity| {
                activity.members.insert(person);
            });
        }
        true
    }

    /// Removes `person` from `activity`'s member set.
    pub fn detach_member(&mut self, activity: ActivityId, person: PersonId) -> bool {
        let Some(activity_index) = self.activity_index(activity) else {
            return false;
        };
        let present = self
            .activities
            .get(activity_index)
            .is_some_and(|activity| activity.members.contains(&person));
        if !present {
            return false;
        }
        self.activities.update(activity_index, |activity| {
            activity.members.remove(&person);
        });
        true
    }

    /// Swaps two positions within `day`'s period sequence. The top-level
    /// period collection keeps its own order; reordering a relationship never
    /// reorders the collection.
    pub fn reorder_periods(&mut self, day: DayId, a: usize, b: usize) -> bool {
        let Some(day_index) = self.day_index(day) else {
            return false;
        };
        let len = self
            .days
            .get(day_index)
            .map(|day| day.periods.len())
            .unwrap_or(0);
        if a >= len || b >= len {
            return false;
        }
        if a != b {
            self.days.update(day_index, |day| day.periods.swap(a, b));
        }
        true
    }

    /// Swaps two days within the cycle ordering.
    pub fn swap_days(&mut self, a: usize, b: usize) -> bool {
        if a >= self.days.len() || b >= self.days.len() {
            return false;
        }
        self.days.swap(a, b);
        true
    }

    /// Edits a day's value fields in place, notifying observers once.
    pub fn update_day(&mut self, id: DayId, edit: impl FnOnce(&mut Day)) -> bool {
        match self.day_index(id) {
            Some(index) => self.days.update(index, edit),
            None => false,
        }
    }

    pub fn update_period(&mut self, id: PeriodId, edit: impl FnOnce(&mut Period)) -> bool {
        match self.period_index(id) {
            Some(index) => self.periods.update(index, edit),
            None => false,
        }
    }

    pub fn update_activity(&mut self, id: ActivityId, edit: impl FnOnce(&mut Activity)) -> bool {
        match self.activity_index(id) {
            Some(index) => self.activities.update(index, edit),
            None => false,
        }
    }

    pub fn update_person(&mut self, id: PersonId, edit: impl FnOnce(&mut Person)) -> bool {
        match self.person_index(id) {
            Some(index) => self.persons.update(index, edit),
            None => false,
        }
    }

    /// Empties all four collections.
    pub fn clear(&mut self) {
        self.days.clear();
        self.periods.clear();
        self.activities.clear();
        self.persons.clear();
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
