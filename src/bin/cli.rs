use chrono::NaiveTime;
use schedule_manager::{
    Activity, Day, Period, Person, Schedule, export_agenda_to_csv, load_schedule_from_json,
    load_schedule_from_scdl, save_schedule_to_json, save_schedule_to_scdl,
};
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

fn print_help() {
    println!(
        "Commands:\n  help                                Show this help\n  show                                Show the whole schedule\n  day add <name> <HH:MM>              Add a day starting at HH:MM\n  day rm <i>                          Remove day i (its slots go with it)\n  day start <i> <HH:MM>               Change day i's start time\n  day attach <i> <p>                  Append period p to day i (repeats allowed)\n  day detach <i> <p>                  Remove the first occurrence of period p from day i\n  day reorder <i> <a> <b>             Swap slots a and b within day i\n  day swap <a> <b>                    Swap days a and b in the listing\n  period add <name> <minutes>         Add a period\n  period rm <i>                       Remove period i everywhere\n  period dur <i> <minutes>            Change period i's duration\n  period attach <i> <a>               Put activity a into period i\n  period detach <i> <a>               Take activity a out of period i\n  activity add <name> <kind>          Add an activity\n  activity rm <i>                     Remove activity i everywhere\n  activity attach <i> <p>             Enroll person p in activity i\n  activity detach <i> <p>             Withdraw person p from activity i\n  person add <id> <first> <last> <role>\n                                      Add a person\n  person rm <i>                       Remove person i everywhere\n  agenda <i>                          Print person i's weekly agenda\n  export <path> <i>                   Export person i's agenda as CSV\n  save <scdl|json> <path>             Persist the schedule to disk\n  load <scdl|json> <path>             Load a schedule from disk\n  new                                 Discard everything and start over\n  quit|exit                           Exit"
    );
}

fn print_schedule(schedule: &Schedule) {
    println!("Days:");
    for (i, day) in schedule.days().iter().enumerate() {
        let slots = day
            .periods()
            .iter()
            .filter_map(|id| schedule.period(*id))
            .map(|p| p.identifier.clone())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {i}: {day}  [{slots}]");
    }
    println!("Periods:");
    for (i, period) in schedule.periods().iter().enumerate() {
        let held = period
            .activities()
            .iter()
            .filter_map(|id| schedule.activity(*id))
            .map(|a| a.identifier.clone())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {i}: {period}  [{held}]");
    }
    println!("Activities:");
    for (i, activity) in schedule.activities().iter().enumerate() {
        let members = activity
            .members()
            .iter()
            .filter_map(|id| schedule.person(*id))
            .map(|p| p.identifier.clone())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {i}: {activity}  [{members}]");
    }
    println!("Persons:");
    for (i, person) in schedule.persons().iter().enumerate() {
        println!("  {i}: {person}");
    }
}

fn print_agenda(schedule: &Schedule, index: usize) {
    let Some(person) = schedule.persons().get(index) else {
        println!("No person at index {index}");
        return;
    };
    println!("Agenda for {person}:");
    let id = person.id();
    for entry in schedule.agenda_for(id) {
        let doing = match entry.activity {
            Some(activity) => activity.identifier.as_str(),
            None => "(free)",
        };
        println!(
            "  {} {} {}-{} {}",
            entry.day.identifier,
            entry.period.identifier,
            entry.starts_at.format("%H:%M"),
            entry.ends_at.format("%H:%M"),
            doing
        );
    }
}

/// Flips the flag whenever any of the four entity lists reports a change.
/// Re-run after every `load`/`new`, since a fresh schedule has fresh lists.
fn watch_for_changes(schedule: &Schedule, dirty: &Rc<Cell<bool>>) {
    let flag = Rc::clone(dirty);
    schedule.days().subscribe(move |_| flag.set(true));
    let flag = Rc::clone(dirty);
    schedule.periods().subscribe(move |_| flag.set(true));
    let flag = Rc::clone(dirty);
    schedule.activities().subscribe(move |_| flag.set(true));
    let flag = Rc::clone(dirty);
    schedule.persons().subscribe(move |_| flag.set(true));
}

fn confirm_discard(dirty: &Rc<Cell<bool>>) -> bool {
    if !dirty.get() {
        return true;
    }
    print!("Unsaved changes will be lost. Continue? (y/n) ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

fn parse_index(s: Option<&str>) -> Option<usize> {
    s.and_then(|v| v.parse().ok())
}

fn main() {
    let mut schedule = Schedule::new();
    let dirty = Rc::new(Cell::new(false));
    watch_for_changes(&schedule, &dirty);

    println!("Schedule Manager (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => {
                if confirm_discard(&dirty) {
                    break;
                }
            }
            "show" => print_schedule(&schedule),
            "day" => match parts.next() {
                Some("add") => {
                    let name = parts.next();
                    let time = parts.next().and_then(parse_time);
                    match (name, time) {
                        (Some(name), Some(time)) => {
                            schedule.add_day(Day::new(name, time));
                            println!("Day added.");
                        }
                        _ => println!("Usage: day add <name> <HH:MM>"),
                    }
                }
                Some("rm") => match parse_index(parts.next()) {
                    Some(i) => match schedule.days().get(i).map(Day::id) {
                        Some(id) => {
                            schedule.remove_day(id);
                            println!("Day removed.");
                        }
                        None => println!("No day at index {i}"),
                    },
                    None => println!("Usage: day rm <i>"),
                },
                Some("start") => {
                    let i = parse_index(parts.next());
                    let time = parts.next().and_then(parse_time);
                    match (i, time) {
                        (Some(i), Some(time)) => match schedule.days().get(i).map(Day::id) {
                            Some(id) => {
                                schedule.update_day(id, |day| day.start_time = time);
                                println!("Start time set.");
                            }
                            None => println!("No day at index {i}"),
                        },
                        _ => println!("Usage: day start <i> <HH:MM>"),
                    }
                }
                Some(action @ ("attach" | "detach")) => {
                    let di = parse_index(parts.next());
                    let pi = parse_index(parts.next());
                    match (di, pi) {
                        (Some(di), Some(pi)) => {
                            let day = schedule.days().get(di).map(Day::id);
                            let period = schedule.periods().get(pi).map(Period::id);
                            match (day, period) {
                                (Some(day), Some(period)) => {
                                    let ok = if action == "attach" {
                                        schedule.attach_period(day, period)
                                    } else {
                                        schedule.detach_period(day, period)
                                    };
                                    if ok {
                                        println!("Done.");
                                    } else {
                                        println!("Nothing to {action}.");
                                    }
                                }
                                _ => println!("Index out of range"),
                            }
                        }
                        _ => println!("Usage: day {action} <day_i> <period_i>"),
                    }
                }
                Some("reorder") => {
                    let di = parse_index(parts.next());
                    let a = parse_index(parts.next());
                    let b = parse_index(parts.next());
                    match (di, a, b) {
                        (Some(di), Some(a), Some(b)) => match schedule.days().get(di).map(Day::id) {
                            Some(id) => {
                                if schedule.reorder_periods(id, a, b) {
                                    println!("Slots swapped.");
                                } else {
                                    println!("Slot index out of range");
                                }
                            }
                            None => println!("No day at index {di}"),
                        },
                        _ => println!("Usage: day reorder <day_i> <a> <b>"),
                    }
                }
                Some("swap") => {
                    let a = parse_index(parts.next());
                    let b = parse_index(parts.next());
                    match (a, b) {
                        (Some(a), Some(b)) => {
                            if schedule.swap_days(a, b) {
                                println!("Days swapped.");
                            } else {
                                println!("Index out of range");
                            }
                        }
                        _ => println!("Usage: day swap <a> <b>"),
                    }
                }
                _ => println!("Usage: day add|rm|start|attach|detach|reorder|swap ..."),
            },
            "period" => match parts.next() {
                Some("add") => {
                    let name = parts.next();
                    let minutes = parts.next().and_then(|v| v.parse::<i64>().ok());
                    match (name, minutes) {
                        (Some(name), Some(minutes)) => {
                            schedule.add_period(Period::new(name, minutes));
                            println!("Period added.");
                        }
                        _ => println!("Usage: period add <name> <minutes>"),
                    }
                }
                Some("rm") => match parse_index(parts.next()) {
                    Some(i) => match schedule.periods().get(i).map(Period::id) {
                        Some(id) => {
                            schedule.remove_period(id);
                            println!("Period removed from the schedule and every day.");
                        }
                        None => println!("No period at index {i}"),
                    },
                    None => println!("Usage: period rm <i>"),
                },
                Some("dur") => {
                    let i = parse_index(parts.next());
                    let minutes = parts.next().and_then(|v| v.parse::<i64>().ok());
                    match (i, minutes) {
                        (Some(i), Some(minutes)) => {
                            match schedule.periods().get(i).map(Period::id) {
                                Some(id) => {
                                    schedule
                                        .update_period(id, |p| p.set_duration_minutes(minutes));
                                    println!("Duration set.");
                                }
                                None => println!("No period at index {i}"),
                            }
                        }
                        _ => println!("Usage: period dur <i> <minutes>"),
                    }
                }
                Some(action @ ("attach" | "detach")) => {
                    let pi = parse_index(parts.next());
                    let ai = parse_index(parts.next());
                    match (pi, ai) {
                        (Some(pi), Some(ai)) => {
                            let period = schedule.periods().get(pi).map(Period::id);
                            let activity = schedule.activities().get(ai).map(Activity::id);
                            match (period, activity) {
                                (Some(period), Some(activity)) => {
                                    let ok = if action == "attach" {
                                        schedule.attach_activity(period, activity)
                                    } else {
                                        schedule.detach_activity(period, activity)
                                    };
                                    if ok {
                                        println!("Done.");
                                    } else {
                                        println!("Nothing to {action}.");
                                    }
                                }
                                _ => println!("Index out of range"),
                            }
                        }
                        _ => println!("Usage: period {action} <period_i> <activity_i>"),
                    }
                }
                _ => println!("Usage: period add|rm|dur|attach|detach ..."),
            },
            "activity" => match parts.next() {
                Some("add") => {
                    let name = parts.next();
                    let kind = parts.next();
                    match (name, kind) {
                        (Some(name), Some(kind)) => {
                            schedule.add_activity(Activity::new(name, kind));
                            println!("Activity added.");
                        }
                        _ => println!("Usage: activity add <name> <kind>"),
                    }
                }
                Some("rm") => match parse_index(parts.next()) {
                    Some(i) => match schedule.activities().get(i).map(Activity::id) {
                        Some(id) => {
                            schedule.remove_activity(id);
                            println!("Activity removed from the schedule and every period.");
                        }
                        None => println!("No activity at index {i}"),
                    },
                    None => println!("Usage: activity rm <i>"),
                },
                Some(action @ ("attach" | "detach")) => {
                    let ai = parse_index(parts.next());
                    let pi = parse_index(parts.next());
                    match (ai, pi) {
                        (Some(ai), Some(pi)) => {
                            let activity = schedule.activities().get(ai).map(Activity::id);
                            let person = schedule.persons().get(pi).map(Person::id);
                            match (activity, person) {
                                (Some(activity), Some(person)) => {
                                    let ok = if action == "attach" {
                                        schedule.attach_member(activity, person)
                                    } else {
                                        schedule.detach_member(activity, person)
                                    };
                                    if ok {
                                        println!("Done.");
                                    } else {
                                        println!("Nothing to {action}.");
                                    }
                                }
                                _ => println!("Index out of range"),
                            }
                        }
                        _ => println!("Usage: activity {action} <activity_i> <person_i>"),
                    }
                }
                _ => println!("Usage: activity add|rm|attach|detach ..."),
            },
            "person" => match parts.next() {
                Some("add") => {
                    let identifier = parts.next();
                    let first = parts.next();
                    let last = parts.next();
                    let role = parts.next();
                    match (identifier, first, last, role) {
                        (Some(identifier), Some(first), Some(last), Some(role)) => {
                            schedule.add_person(Person::new(identifier, first, last, role));
                            println!("Person added.");
                        }
                        _ => println!("Usage: person add <id> <first> <last> <role>"),
                    }
                }
                Some("rm") => match parse_index(parts.next()) {
                    Some(i) => match schedule.persons().get(i).map(Person::id) {
                        Some(id) => {
                            schedule.remove_person(id);
                            println!("Person removed from the schedule and every activity.");
                        }
                        None => println!("No person at index {i}"),
                    },
                    None => println!("Usage: person rm <i>"),
                },
                _ => println!("Usage: person add|rm ..."),
            },
            "agenda" => match parse_index(parts.next()) {
                Some(i) => print_agenda(&schedule, i),
                None => println!("Usage: agenda <person_i>"),
            },
            "export" => {
                let path = parts.next();
                let i = parse_index(parts.next());
                match (path, i) {
                    (Some(path), Some(i)) => match schedule.persons().get(i).map(Person::id) {
                        Some(id) => match export_agenda_to_csv(path, &schedule, id) {
                            Ok(_) => println!("Agenda exported to {path}."),
                            Err(e) => println!("Error exporting agenda: {e}"),
                        },
                        None => println!("No person at index {i}"),
                    },
                    _ => println!("Usage: export <path> <person_i>"),
                }
            }
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("scdl"), Some(path)) => match save_schedule_to_scdl(path, &schedule) {
                        Ok(_) => {
                            dirty.set(false);
                            println!("Schedule saved to {path}.");
                        }
                        Err(e) => println!("Error saving schedule: {e}"),
                    },
                    (Some("json"), Some(path)) => match save_schedule_to_json(path, &schedule) {
                        Ok(_) => {
                            dirty.set(false);
                            println!("Schedule saved to {path}.");
                        }
                        Err(e) => println!("Error saving schedule: {e}"),
                    },
                    _ => println!("Usage: save <scdl|json> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                if !matches!(fmt, Some("scdl") | Some("json")) || path.is_none() {
                    println!("Usage: load <scdl|json> <path>");
                    continue;
                }
                if !confirm_discard(&dirty) {
                    continue;
                }
                let path = path.unwrap_or("");
                let loaded = match fmt {
                    Some("scdl") => load_schedule_from_scdl(path),
                    _ => load_schedule_from_json(path),
                };
                match loaded {
                    Ok(loaded) => {
                        schedule = loaded;
                        dirty.set(false);
                        watch_for_changes(&schedule, &dirty);
                        println!("Schedule loaded from {path}.");
                        print_schedule(&schedule);
                    }
                    Err(e) => println!("Error loading schedule: {e}"),
                }
            }
            "new" => {
                if confirm_discard(&dirty) {
                    schedule = Schedule::new();
                    dirty.set(false);
                    watch_for_changes(&schedule, &dirty);
                    println!("Started a fresh schedule.");
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
