//! JSON snapshot persistence and CSV agenda export.

use super::{PersistenceResult, ScheduleSnapshot};
use crate::entity::PersonId;
use crate::schedule::Schedule;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn save_schedule_to_json<P: AsRef<Path>>(
    path: P,
    schedule: &Schedule,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: ScheduleSnapshot = serde_json::from_reader(reader)?;
    Ok(snapshot.into_schedule()?)
}

#[derive(Serialize)]
struct AgendaCsvRecord<'a> {
    day: &'a str,
    period: &'a str,
    starts_at: String,
    ends_at: String,
    activity: &'a str,
}

/// Writes one row per period occurrence in a person's agenda, in day order.
/// The activity column is empty for free periods.
pub fn export_agenda_to_csv<P: AsRef<Path>>(
    path: P,
    schedule: &Schedule,
    person: PersonId,
) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for entry in schedule.agenda_for(person) {
        writer.serialize(AgendaCsvRecord {
            day: &entry.day.identifier,
            period: &entry.period.identifier,
            starts_at: entry.starts_at.format("%H:%M").to_string(),
            ends_at: entry.ends_at.format("%H:%M").to_string(),
            activity: entry
                .activity
                .map(|activity| activity.identifier.as_str())
                .unwrap_or(""),
        })?;
    }
    writer.flush()?;
    Ok(())
}
