use chrono::NaiveTime;
use schedule_manager::{
    Activity, Day, Period, Person, Schedule, ScheduleSnapshot, export_agenda_to_csv,
    load_schedule_from_json, load_schedule_from_scdl, save_schedule_to_json,
    save_schedule_to_scdl,
};
use std::fs;
use tempfile::NamedTempFile;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn sample_schedule() -> Schedule {
    let mut s = Schedule::new();
    let mon = s.add_day(Day::new("Mon", t(8, 0)));
    let p0 = s.add_period(Period::new("P0", 30));
    let p1 = s.add_period(Period::new("P1", 60));
    let math = s.add_activity(Activity::new("Math", "class"));
    let alice = s.add_person(Person::new("alice", "Alice", "Liddell", "student"));
    s.attach_period(mon, p0);
    s.attach_period(mon, p1);
    s.attach_activity(p1, math);
    s.attach_member(math, alice);
    s
}

#[test]
fn scdl_file_round_trip() {
    let original = sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_scdl(file.path(), &original).unwrap();
    let loaded = load_schedule_from_scdl(file.path()).unwrap();

    assert_eq!(
        ScheduleSnapshot::from_schedule(&loaded),
        ScheduleSnapshot::from_schedule(&original)
    );
}

#[test]
fn json_file_round_trip() {
    let original = sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(file.path(), &original).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();

    assert_eq!(
        ScheduleSnapshot::from_schedule(&loaded),
        ScheduleSnapshot::from_schedule(&original)
    );
}

#[test]
fn json_snapshot_is_human_readable() {
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(file.path(), &sample_schedule()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    assert!(text.contains("\"identifier\": \"Mon\""));
    assert!(text.contains("\"duration_minutes\": 60"));
    assert!(text.contains("\"first_name\": \"Alice\""));
}

#[test]
fn corrupt_json_reports_a_serialization_error() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "{ not json").unwrap();
    assert!(load_schedule_from_json(file.path()).is_err());
}

#[test]
fn missing_file_reports_an_io_error() {
    let result = load_schedule_from_scdl("/nonexistent/schedule.scdl");
    assert!(matches!(
        result,
        Err(schedule_manager::PersistenceError::Io(_))
    ));
}

#[test]
fn csv_export_has_one_row_per_slot() {
    let schedule = sample_schedule();
    let alice = schedule.persons().as_slice()[0].id();
    let file = NamedTempFile::new().unwrap();

    export_agenda_to_csv(file.path(), &schedule, alice).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "day,period,starts_at,ends_at,activity");
    assert_eq!(lines[1], "Mon,P0,08:00,08:30,");
    assert_eq!(lines[2], "Mon,P1,08:30,09:30,Math");
}
