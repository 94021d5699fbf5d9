//! Tempestry - Environmental Simulation for Game Calendars

pub mod calendar;
pub mod climate;
pub mod core;
pub mod engine;
pub mod lighting;
pub mod scene;
pub mod store;
pub mod sync;
pub mod weather;
