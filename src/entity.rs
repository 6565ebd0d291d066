use chrono::{NaiveTime, Timelike};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Entity identity. Every constructed entity gets a process-unique id from a
// shared counter; equality of ids is what "the same entity" means, no matter
// how similar two entities' fields are. Labels (`identifier`) are display
// text and need not be unique.
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

fn next_entity_id() -> u64 {
    NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn fresh() -> Self {
                Self(next_entity_id())
            }
        }
    };
}

entity_id!(
    /// Identity of a [`Person`] within a schedule graph.
    PersonId
);
entity_id!(
    /// Identity of an [`Activity`] within a schedule graph.
    ActivityId
);
entity_id!(
    /// Identity of a [`Period`] within a schedule graph.
    PeriodId
);
entity_id!(
    /// Identity of a [`Day`] within a schedule graph.
    DayId
);

/// A person: first name, last name, role and a display identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    id: PersonId,
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl Person {
    pub fn new(
        identifier: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: PersonId::fresh(),
            identifier: identifier.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new("", "", "", "")
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {} {}",
            self.role, self.identifier, self.first_name, self.last_name
        )
    }
}

/// An activity: a kind ("Math", "Break", ...), a display identifier and the
/// set of persons participating in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    id: ActivityId,
    pub identifier: String,
    pub kind: String,
    pub(crate) members: BTreeSet<PersonId>,
}

impl Activity {
    pub fn new(identifier: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: ActivityId::fresh(),
            identifier: identifier.into(),
            kind: kind.into(),
            members: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    /// The persons participating in this activity.
    pub fn members(&self) -> &BTreeSet<PersonId> {
        &self.members
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.identifier)
    }
}

/// A period: how long it lasts and which activities take place during it.
#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    id: PeriodId,
    pub identifier: String,
    duration_minutes: i64,
    pub(crate) activities: BTreeSet<ActivityId>,
}

impl Period {
    /// Negative durations are normalized to zero, never rejected.
    pub fn new(identifier: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            id: PeriodId::fresh(),
            identifier: identifier.into(),
            duration_minutes: duration_minutes.max(0),
            activities: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> PeriodId {
        self.id
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    /// Negative values are normalized to zero.
    pub fn set_duration_minutes(&mut self, minutes: i64) {
        self.duration_minutes = minutes.max(0);
    }

    /// The activities taking place during this period.
    pub fn activities(&self) -> &BTreeSet<ActivityId> {
        &self.activities
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::new("", 0)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:02}h{:02}m] {}",
            self.duration_minutes / 60,
            self.duration_minutes % 60,
            self.identifier
        )
    }
}

/// A day: when it starts and which periods take place on it, in order.
///
/// The period sequence is an ordered multiset; the same period may appear
/// more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    id: DayId,
    pub identifier: String,
    pub start_time: NaiveTime,
    pub(crate) periods: Vec<PeriodId>,
}

impl Day {
    pub const DEFAULT_START_TIME: NaiveTime = NaiveTime::MIN;

    pub fn new(identifier: impl Into<String>, start_time: NaiveTime) -> Self {
        Self {
            id: DayId::fresh(),
            identifier: identifier.into(),
            start_time,
            periods: Vec::new(),
        }
    }

    pub fn id(&self) -> DayId {
        self.id
    }

    /// The periods taking place on this day, in the order they take place.
    pub fn periods(&self) -> &[PeriodId] {
        &self.periods
    }
}

impl Default for Day {
    fn default() -> Self {
        Self::new("", Self::DEFAULT_START_TIME)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:02}:{:02}] {}",
            self.start_time.hour(),
            self.start_time.minute(),
            self.identifier
        )
    }
}
