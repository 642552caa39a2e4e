// src/lib.rs

pub mod config;
pub mod core;
pub mod error;

pub mod adapters;
pub mod calendar;
pub mod format;
pub mod normalize;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod sports;
pub mod watcher;

pub mod csv;
pub mod file;
pub mod gui;
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;

pub use calendar::{CalendarAction, CanonicalEvent};
pub use orchestrator::{Orchestrator, RunReport};
pub use session::PageSession;
