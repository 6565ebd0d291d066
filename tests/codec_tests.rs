use chrono::NaiveTime;
use schedule_manager::{
    Activity, Day, DecodeError, Period, PersistenceError, Person, Schedule, ScheduleSnapshot,
    read_schedule, write_schedule,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// One day with a repeated period, one held activity, one enrolled person.
fn sample_schedule() -> Schedule {
    let mut s = Schedule::new();
    let mon = s.add_day(Day::new("Mon", t(8, 0)));
    let p0 = s.add_period(Period::new("P0", 30));
    let p1 = s.add_period(Period::new("P1", 60));
    let math = s.add_activity(Activity::new("Math", "class"));
    let alice = s.add_person(Person::new("alice", "Alice", "Liddell", "student"));
    s.attach_period(mon, p0);
    s.attach_period(mon, p0);
    s.attach_period(mon, p1);
    s.attach_activity(p1, math);
    s.attach_member(math, alice);
    s
}

fn encode(schedule: &Schedule) -> String {
    let mut buffer = Vec::new();
    write_schedule(&mut buffer, schedule).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn writes_the_documented_line_format() {
    let text = encode(&sample_schedule());
    assert_eq!(
        text,
        "1\n\
         Mon|:|8|:|0|:|0,0,1\n\
         2\n\
         P0|:|30|:|\n\
         P1|:|60|:|0\n\
         1\n\
         Math|:|class|:|0\n\
         1\n\
         alice|:|Alice|:|Liddell|:|student\n"
    );
}

#[test]
fn round_trip_preserves_the_graph_including_repeats() {
    let original = sample_schedule();
    let decoded = read_schedule(encode(&original).as_bytes()).unwrap();

    assert_eq!(
        ScheduleSnapshot::from_schedule(&decoded),
        ScheduleSnapshot::from_schedule(&original)
    );
    // The repeated slot survives.
    let day = &decoded.days().as_slice()[0];
    assert_eq!(day.periods().len(), 3);
    assert_eq!(day.periods()[0], day.periods()[1]);
}

#[test]
fn empty_schedule_round_trips() {
    let decoded = read_schedule("0\n0\n0\n0\n".as_bytes()).unwrap();
    assert!(decoded.days().is_empty());
    assert!(decoded.periods().is_empty());
    assert!(decoded.activities().is_empty());
    assert!(decoded.persons().is_empty());
}

#[test]
fn trailing_input_after_the_persons_section_is_ignored() {
    let decoded =
        read_schedule("0\n0\n0\n1\nalice|:|Alice|:|Liddell|:|student\nleftover\n".as_bytes())
            .unwrap();
    assert_eq!(decoded.persons().len(), 1);
}

#[test]
fn truncated_section_is_a_missing_line_error() {
    let result = read_schedule("2\nMon|:|8|:|0|:|\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::MissingLine {
            section: "days"
        }))
    ));
}

#[test]
fn absurd_count_line_is_a_missing_line_error() {
    // A count near usize::MAX must not drive an allocation; the decoder hits
    // the end of input on the first entity line instead.
    let result = read_schedule("18446744073709551615\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::MissingLine {
            section: "days"
        }))
    ));
}

#[test]
fn wrong_field_count_is_an_arity_error() {
    let result = read_schedule("1\nMon|:|8|:|0\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::FieldArity {
            section: "days",
            expected: 4,
            found: 3,
        }))
    ));
}

#[test]
fn unparsable_count_is_an_invalid_number_error() {
    let result = read_schedule("many\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::InvalidNumber {
            section: "days",
            ..
        }))
    ));
}

#[test]
fn unparsable_hour_is_an_invalid_number_error() {
    let result = read_schedule("1\nMon|:|eight|:|0|:|\n0\n0\n0\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::InvalidNumber {
            section: "days",
            ..
        }))
    ));
}

#[test]
fn out_of_clock_start_time_is_rejected() {
    let result = read_schedule("1\nMon|:|25|:|0|:|\n0\n0\n0\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::InvalidNumber {
            section: "days",
            ..
        }))
    ));
}

#[test]
fn dangling_period_index_is_an_out_of_range_error() {
    let result = read_schedule("1\nMon|:|8|:|0|:|5\n1\nP0|:|30|:|\n0\n0\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::IndexOutOfRange {
            section: "periods",
            index: 5,
            len: 1,
        }))
    ));
}

#[test]
fn dangling_member_index_is_an_out_of_range_error() {
    let result = read_schedule("0\n0\n1\nMath|:|class|:|0\n0\n".as_bytes());
    assert!(matches!(
        result,
        Err(PersistenceError::Decode(DecodeError::IndexOutOfRange {
            section: "persons",
            index: 0,
            len: 0,
        }))
    ));
}

#[test]
fn identifiers_keep_embedded_spaces_and_commas() {
    let mut s = Schedule::new();
    s.add_person(Person::new("id 1", "Mary Jane", "van der Berg", "staff, part-time"));
    let decoded = read_schedule(encode(&s).as_bytes()).unwrap();
    let person = &decoded.persons().as_slice()[0];
    assert_eq!(person.first_name, "Mary Jane");
    assert_eq!(person.role, "staff, part-time");
}

#[test]
fn decoded_entities_get_fresh_distinct_ids() {
    let original = sample_schedule();
    let decoded = read_schedule(encode(&original).as_bytes()).unwrap();
    let original_day = original.days().as_slice()[0].id();
    let decoded_day = decoded.days().as_slice()[0].id();
    assert_ne!(original_day, decoded_day);
}
