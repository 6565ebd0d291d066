//! Native line-oriented schedule format.
//!
//! Four sections in fixed order (days, periods, activities, persons), each
//! opened by a count line followed by that many entity lines. Fields within
//! a line are joined by `|:|`; index lists within a field are joined by `,`,
//! with an empty field standing for an empty list. Text after the persons
//! section is ignored.

use super::{
    ActivityRecord, DayRecord, DecodeError, PeriodRecord, PersistenceResult, PersonRecord,
    ScheduleSnapshot,
};
use crate::schedule::Schedule;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const FIELD_SEPARATOR: &str = "|:|";
const LIST_SEPARATOR: &str = ",";

pub fn write_schedule<W: Write>(writer: &mut W, schedule: &Schedule) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule);

    writeln!(writer, "{}", snapshot.days.len())?;
    for day in &snapshot.days {
        writeln!(
            writer,
            "{}{sep}{}{sep}{}{sep}{}",
            day.identifier,
            day.start_hour,
            day.start_minute,
            join_indices(&day.periods),
            sep = FIELD_SEPARATOR,
        )?;
    }

    writeln!(writer, "{}", snapshot.periods.len())?;
    for period in &snapshot.periods {
        writeln!(
            writer,
            "{}{sep}{}{sep}{}",
            period.identifier,
            period.duration_minutes,
            join_indices(&period.activities),
            sep = FIELD_SEPARATOR,
        )?;
    }

    writeln!(writer, "{}", snapshot.activities.len())?;
    for activity in &snapshot.activities {
        writeln!(
            writer,
            "{}{sep}{}{sep}{}",
            activity.identifier,
            activity.kind,
            join_indices(&activity.members),
            sep = FIELD_SEPARATOR,
        )?;
    }

    writeln!(writer, "{}", snapshot.persons.len())?;
    for person in &snapshot.persons {
        writeln!(
            writer,
            "{}{sep}{}{sep}{}{sep}{}",
            person.identifier,
            person.first_name,
            person.last_name,
            person.role,
            sep = FIELD_SEPARATOR,
        )?;
    }

    Ok(())
}

pub fn read_schedule<R: BufRead>(reader: R) -> PersistenceResult<Schedule> {
    let mut lines = reader.lines();

    // Counts come from untrusted input; sizing an allocation from them would
    // let a one-line corrupt file request absurd capacity. The per-line loop
    // reports a short section as MissingLine instead.
    let day_count = read_count(&mut lines, "days")?;
    let mut days = Vec::new();
    for _ in 0..day_count {
        let line = next_line(&mut lines, "days")?;
        let fields = split_fields(&line, "days", 4)?;
        days.push(DayRecord {
            identifier: fields[0].to_owned(),
            start_hour: parse_number(fields[1], "days")?,
            start_minute: parse_number(fields[2], "days")?,
            periods: parse_indices(fields[3], "days")?,
        });
    }

    let period_count = read_count(&mut lines, "periods")?;
    let mut periods = Vec::new();
    for _ in 0..period_count {
        let line = next_line(&mut lines, "periods")?;
        let fields = split_fields(&line, "periods", 3)?;
        periods.push(PeriodRecord {
            identifier: fields[0].to_owned(),
            duration_minutes: parse_number(fields[1], "periods")?,
            activities: parse_indices(fields[2], "periods")?,
        });
    }

    let activity_count = read_count(&mut lines, "activities")?;
    let mut activities = Vec::new();
    for _ in 0..activity_count {
        let line = next_line(&mut lines, "activities")?;
        let fields = split_fields(&line, "activities", 3)?;
        activities.push(ActivityRecord {
            identifier: fields[0].to_owned(),
            kind: fields[1].to_owned(),
            members: parse_indices(fields[2], "activities")?,
        });
    }

    let person_count = read_count(&mut lines, "persons")?;
    let mut persons = Vec::new();
    for _ in 0..person_count {
        let line = next_line(&mut lines, "persons")?;
        let fields = split_fields(&line, "persons", 4)?;
        persons.push(PersonRecord {
            identifier: fields[0].to_owned(),
            first_name: fields[1].to_owned(),
            last_name: fields[2].to_owned(),
            role: fields[3].to_owned(),
        });
    }

    let snapshot = ScheduleSnapshot {
        days,
        periods,
        activities,
        persons,
    };
    Ok(snapshot.into_schedule()?)
}

pub fn save_schedule_to_scdl<P: AsRef<Path>>(
    path: P,
    schedule: &Schedule,
) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_schedule(&mut writer, schedule)?;
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_scdl<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    read_schedule(BufReader::new(File::open(path)?))
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn next_line<R: BufRead>(
    lines: &mut std::io::Lines<R>,
    section: &'static str,
) -> PersistenceResult<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(DecodeError::MissingLine { section }.into()),
    }
}

fn read_count<R: BufRead>(
    lines: &mut std::io::Lines<R>,
    section: &'static str,
) -> PersistenceResult<usize> {
    let line = next_line(lines, section)?;
    Ok(parse_number(line.trim(), section)?)
}

fn split_fields<'a>(
    line: &'a str,
    section: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>, DecodeError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(DecodeError::FieldArity {
            section,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    section: &'static str,
) -> Result<T, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        section,
        value: value.to_owned(),
    })
}

fn parse_indices(field: &str, section: &'static str) -> Result<Vec<usize>, DecodeError> {
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field
        .split(LIST_SEPARATOR)
        .map(|part| parse_number(part, section))
        .collect()
}
