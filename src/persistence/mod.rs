pub mod file;
pub mod scdl;

pub use file::{export_agenda_to_csv, load_schedule_from_json, save_schedule_to_json};
pub use scdl::{load_schedule_from_scdl, read_schedule, save_schedule_to_scdl, write_schedule};

use crate::entity::{Activity, ActivityId, Day, Period, PeriodId, Person, PersonId};
use crate::schedule::Schedule;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::collections::HashMap;
use std::fmt;
use std::io;

/// Corrupt-input failures while decoding a persisted schedule.
///
/// A failed decode never exposes a partial graph; the caller's previously
/// loaded schedule (if any) is untouched.
#[derive(Debug)]
pub enum DecodeError {
    /// The declared element count for a section exceeds the lines present.
    MissingLine { section: &'static str },
    /// An entity line has the wrong number of fields.
    FieldArity {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    /// A count, time component, duration, or index failed to parse.
    InvalidNumber {
        section: &'static str,
        value: String,
    },
    /// A cross-reference index points past the end of its target section.
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingLine { section } => {
                write!(f, "{section} section ends before its declared count")
            }
            DecodeError::FieldArity {
                section,
                expected,
                found,
            } => write!(
                f,
                "{section} line has {found} fields, expected {expected}"
            ),
            DecodeError::InvalidNumber { section, value } => {
                write!(f, "invalid number '{value}' in {section} section")
            }
            DecodeError::IndexOutOfRange {
                section,
                index,
                len,
            } => write!(
                f,
                "index {index} out of range for {section} section of length {len}"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Decode(DecodeError),
    Serialization(SerdeJsonError),
    Csv(csv::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Decode(err) => write!(f, "corrupt schedule file: {err}"),
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DecodeError> for PersistenceError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A schedule flattened for persistence: scalar fields per entity, with
/// relationships rendered as zero-based indices into the target section.
///
/// Both on-disk formats go through this type: the native line format renders
/// it record by record, the JSON format serializes it wholesale. Decoding in
/// either format builds the snapshot first and resolves indices into live
/// relationships only once all four sections are populated — later sections
/// (Persons) are referenced by earlier ones (Activities), so resolving any
/// sooner would chase references to entities that do not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub days: Vec<DayRecord>,
    pub periods: Vec<PeriodRecord>,
    pub activities: Vec<ActivityRecord>,
    pub persons: Vec<PersonRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub identifier: String,
    pub start_hour: u32,
    pub start_minute: u32,
    /// Indices into the period section, in the day's order, duplicates
    /// preserved.
    pub periods: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub identifier: String,
    pub duration_minutes: i64,
    pub activities: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub identifier: String,
    pub kind: String,
    pub members: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl ScheduleSnapshot {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let period_index: HashMap<PeriodId, usize> = schedule
            .periods()
            .iter()
            .enumerate()
            .map(|(index, period)| (period.id(), index))
            .collect();
        let activity_index: HashMap<ActivityId, usize> = schedule
            .activities()
            .iter()
            .enumerate()
            .map(|(index, activity)| (activity.id(), index))
            .collect();
        let person_index: HashMap<PersonId, usize> = schedule
            .persons()
            .iter()
            .enumerate()
            .map(|(index, person)| (person.id(), index))
            .collect();

        // The graph invariant keeps every relationship reference resolvable,
        // so the index lookups below always succeed.
        let days = schedule
            .days()
            .iter()
            .map(|day| DayRecord {
                identifier: day.identifier.clone(),
                start_hour: day.start_time.hour(),
                start_minute: day.start_time.minute(),
                periods: day
                    .periods()
                    .iter()
                    .filter_map(|id| period_index.get(id).copied())
                    .collect(),
            })
            .collect();
        let periods = schedule
            .periods()
            .iter()
            .map(|period| PeriodRecord {
                identifier: period.identifier.clone(),
                duration_minutes: period.duration_minutes(),
                activities: period
                    .activities()
                    .iter()
                    .filter_map(|id| activity_index.get(id).copied())
                    .collect(),
            })
            .collect();
        let activities = schedule
            .activities()
            .iter()
            .map(|activity| ActivityRecord {
                identifier: activity.identifier.clone(),
                kind: activity.kind.clone(),
                members: activity
                    .members()
                    .iter()
                    .filter_map(|id| person_index.get(id).copied())
                    .collect(),
            })
            .collect();
        let persons = schedule
            .persons()
            .iter()
            .map(|person| PersonRecord {
                identifier: person.identifier.clone(),
                first_name: person.first_name.clone(),
                last_name: person.last_name.clone(),
                role: person.role.clone(),
            })
            .collect();

        Self {
            days,
            periods,
            activities,
            persons,
        }
    }

    /// Phase-two resolution: materialize every entity, then convert each
    /// deferred index list into live relationships by positional lookup.
    pub fn into_schedule(self) -> Result<Schedule, DecodeError> {
        let persons: Vec<Person> = self
            .persons
            .into_iter()
            .map(|record| {
                Person::new(
                    record.identifier,
                    record.first_name,
                    record.last_name,
                    record.role,
                )
            })
            .collect();
        let person_ids: Vec<PersonId> = persons.iter().map(Person::id).collect();

        let mut activities = Vec::with_capacity(self.activities.len());
        for record in self.activities {
            let mut activity = Activity::new(record.identifier, record.kind);
            for index in record.members {
                let id = *person_ids.get(index).ok_or(DecodeError::IndexOutOfRange {
                    section: "persons",
                    index,
                    len: person_ids.len(),
                })?;
                activity.members.insert(id);
            }
            activities.push(activity);
        }
        let activity_ids: Vec<ActivityId> = activities.iter().map(Activity::id).collect();

        let mut periods = Vec::with_capacity(self.periods.len());
        for record in self.periods {
            let mut period = Period::new(record.identifier, record.duration_minutes);
            for index in record.activities {
                let id = *activity_ids
                    .get(index)
                    .ok_or(DecodeError::IndexOutOfRange {
                        section: "activities",
                        index,
                        len: activity_ids.len(),
                    })?;
                period.activities.insert(id);
            }
            periods.push(period);
        }
        let period_ids: Vec<PeriodId> = periods.iter().map(Period::id).collect();

        let mut days = Vec::with_capacity(self.days.len());
        for record in self.days {
            let start_time = NaiveTime::from_hms_opt(record.start_hour, record.start_minute, 0)
                .ok_or_else(|| DecodeError::InvalidNumber {
                    section: "days",
                    value: format!("{}:{}", record.start_hour, record.start_minute),
                })?;
            let mut day = Day::new(record.identifier, start_time);
            for index in record.periods {
                let id = *period_ids.get(index).ok_or(DecodeError::IndexOutOfRange {
                    section: "periods",
                    index,
                    len: period_ids.len(),
                })?;
                day.periods.push(id);
            }
            days.push(day);
        }

        let mut schedule = Schedule::new();
        for day in days {
            schedule.add_day(day);
        }
        for period in periods {
            schedule.add_period(period);
        }
        for activity in activities {
            schedule.add_activity(activity);
        }
        for person in persons {
            schedule.add_person(person);
        }
        Ok(schedule)
    }
}
