//! Intercity railway itinerary planner server.
//!
//! A web service that answers: "which trains, with which changes, get me
//! from this station to that one?" over a static timetable snapshot.

pub mod domain;
pub mod graph;
pub mod planner;
pub mod schedule;
pub mod snapshot;
pub mod web;
