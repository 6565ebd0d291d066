use chrono::NaiveTime;
use schedule_manager::{Activity, Day, Period, Person, Schedule};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// Mon starts 08:00 and runs P0 (30 min, free) then P1 (60 min, Math).
fn one_day_schedule() -> (Schedule, schedule_manager::PersonId) {
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
    (s, alice)
}

#[test]
fn clock_accumulates_from_the_day_start() {
    let (s, alice) = one_day_schedule();

    let entries: Vec<_> = s.agenda_for(alice).collect();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].day.identifier, "Mon");
    assert_eq!(entries[0].period.identifier, "P0");
    assert_eq!(entries[0].starts_at, t(8, 0));
    assert_eq!(entries[0].ends_at, t(8, 30));
    assert!(entries[0].activity.is_none());

    assert_eq!(entries[1].period.identifier, "P1");
    assert_eq!(entries[1].starts_at, t(8, 30));
    assert_eq!(entries[1].ends_at, t(9, 30));
    assert_eq!(entries[1].activity.unwrap().identifier, "Math");
}

#[test]
fn clock_resets_on_every_day() {
    let mut s = Schedule::new();
    let mon = s.add_day(Day::new("Mon", t(8, 0)));
    let tue = s.add_day(Day::new("Tue", t(10, 15)));
    let p0 = s.add_period(Period::new("P0", 45));
    s.attach_period(mon, p0);
    s.attach_period(tue, p0);
    let nobody = s.add_person(Person::new("n", "No", "Body", "guest"));

    let entries: Vec<_> = s.agenda_for(nobody).collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].starts_at, t(8, 0));
    assert_eq!(entries[1].day.identifier, "Tue");
    assert_eq!(entries[1].starts_at, t(10, 15));
    assert_eq!(entries[1].ends_at, t(11, 0));
}

#[test]
fn repeated_slots_each_advance_the_clock() {
    let mut s = Schedule::new();
    let mon = s.add_day(Day::new("Mon", t(8, 0)));
    let p0 = s.add_period(Period::new("P0", 30));
    s.attach_period(mon, p0);
    s.attach_period(mon, p0);
    let nobody = s.add_person(Person::new("n", "No", "Body", "guest"));

    let entries: Vec<_> = s.agenda_for(nobody).collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].starts_at, t(8, 30));
    assert_eq!(entries[1].ends_at, t(9, 0));
}

#[test]
fn zero_duration_periods_do_not_advance_the_clock() {
    let mut s = Schedule::new();
    let mon = s.add_day(Day::new("Mon", t(8, 0)));
    let gap = s.add_period(Period::new("gap", 0));
    let p0 = s.add_period(Period::new("P0", 30));
    s.attach_period(mon, gap);
    s.attach_period(mon, p0);
    let nobody = s.add_person(Person::new("n", "No", "Body", "guest"));

    let entries: Vec<_> = s.agenda_for(nobody).collect();
    assert_eq!(entries[0].starts_at, entries[0].ends_at);
    assert_eq!(entries[1].starts_at, t(8, 0));
}

#[test]
fn non_participants_see_every_slot_as_free() {
    let (mut s, _) = one_day_schedule();
    let bob = s.add_person(Person::new("bob", "Bob", "Builder", "student"));

    let entries: Vec<_> = s.agenda_for(bob).collect();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.activity.is_none()));
}

#[test]
fn agenda_can_be_generated_repeatedly() {
    let (s, alice) = one_day_schedule();

    let first: Vec<_> = s
        .agenda_for(alice)
        .map(|e| (e.starts_at, e.ends_at, e.activity.map(|a| a.id())))
        .collect();
    let second: Vec<_> = s
        .agenda_for(alice)
        .map(|e| (e.starts_at, e.ends_at, e.activity.map(|a| a.id())))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn empty_schedule_yields_no_entries() {
    let mut s = Schedule::new();
    let ghost = s.add_person(Person::new("g", "Gh", "Ost", "guest"));
    assert_eq!(s.agenda_for(ghost).count(), 0);
}

#[test]
fn extreme_durations_wrap_instead_of_overflowing() {
    let mut s = Schedule::new();
    let mon = s.add_day(Day::new("Mon", t(8, 0)));
    let forever = s.add_period(Period::new("forever", i64::MAX));
    s.attach_period(mon, forever);
    let nobody = s.add_person(Person::new("n", "No", "Body", "guest"));

    let entries: Vec<_> = s.agenda_for(nobody).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].ends_at,
        t(8, 0) + chrono::TimeDelta::minutes(i64::MAX % (24 * 60))
    );
}

#[test]
fn time_arithmetic_wraps_past_midnight() {
    let mut s = Schedule::new();
    let night = s.add_day(Day::new("Night", t(23, 30)));
    let shift = s.add_period(Period::new("shift", 60));
    s.attach_period(night, shift);
    let nobody = s.add_person(Person::new("n", "No", "Body", "guest"));

    let entries: Vec<_> = s.agenda_for(nobody).collect();
    assert_eq!(entries[0].ends_at, t(0, 30));
}
