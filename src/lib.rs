pub mod agenda;
pub mod entity;
pub mod observable;
pub mod persistence;
pub mod schedule;

pub use agenda::{Agenda, AgendaEntry};
pub use entity::{Activity, ActivityId, Day, DayId, Period, PeriodId, Person, PersonId};
pub use observable::{ListEvent, ObservableList, ObserverId};
pub use persistence::{
    DecodeError, PersistenceError, PersistenceResult, ScheduleSnapshot, export_agenda_to_csv,
    load_schedule_from_json, load_schedule_from_scdl, read_schedule, save_schedule_to_json,
    save_schedule_to_scdl, write_schedule,
};
pub use schedule::Schedule;
