//! Planning domain models.
//!
//! Provides the core data types for candidate sessions and the
//! schedules built from them.
//!
//! # Domain Mappings
//!
//! | u-agenda | Conference | Meetup | Festival |
//! |----------|-----------|--------|----------|
//! | Session | Breakout/Workshop | Talk | Set |
//! | Slot | Time block | Track slot | Stage slot |
//! | DaySchedule | Conference day | Event day | Festival day |
//! | Schedule | Personal agenda | Itinerary | Running order |

mod calendar;
mod schedule;
mod session;

pub use calendar::{minute_of_day, TimeWindow};
pub use schedule::{DaySchedule, Schedule, Slot};
pub use session::{parse_clock, Session};
