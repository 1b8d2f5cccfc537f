//! Class session domain entities.

pub mod model;
pub mod schedule;

pub use model::{BookingState, ClassSession, ClassUpdate, NewClassSession, ReleasedSlot};
pub use schedule::{ClassSchedule, DayOfWeek, Period};
