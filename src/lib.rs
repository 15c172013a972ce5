//! # Auditory Status Bot
//!
//! A Telegram bot for keeping track of classroom equipment and event staffing.
//!
//! ## Features
//! - Report auditory status (green / yellow / red) with optional comments
//! - Broadcast status changes to a group chat or forum topic
//! - Mirror a Google Calendar into the local store on a fixed interval
//! - Assign engineers to upcoming events and collect their confirmation
//! - Persistent storage with SQLite

/// Commands, callbacks, keyboards and per-user input state
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Workflows and background services: status, assignment, calendar sync, health
pub mod services;
/// Utility functions for names, datetime, validation, and formatting
pub mod utils;
