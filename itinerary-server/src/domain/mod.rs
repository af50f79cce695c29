//! Domain types for the itinerary planner.
//!
//! This module contains the core timetable model types. All types enforce
//! their invariants at construction time, so code that receives these types
//! can trust their validity.

mod time;
mod train;

pub use time::{format_duration, format_minutes, DayMinute, TimeError};
pub use train::{InvalidTrainId, Stop, Train, TrainId};
