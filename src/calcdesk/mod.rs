// src/calcdesk/mod.rs

pub mod auth;
pub mod basic;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod dates;
pub mod evaluator;
pub mod experience;
pub mod expression;
pub mod format;
pub mod history;
pub mod history_store;
pub mod scientific;
pub mod theme;

// Export the engines so they read as calcdesk::BasicCalculator rather than
// calcdesk::basic::BasicCalculator
pub use basic::BasicCalculator;
pub use scientific::ScientificCalculator;
