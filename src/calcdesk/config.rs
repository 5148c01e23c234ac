//! Configuration for CalcDesk.
//!
//! [`CalcDeskConfig`] collects the few knobs the calculators and stores
//! read at construction time. Build it by hand; nothing is read from files
//! or the environment.
//!
//! # Example
//!
//! ```rust
//! use calcdesk::evaluator::AngleMode;
//! use calcdesk::CalcDeskConfig;
//! use std::path::PathBuf;
//!
//! // Defaults: "calcdesk_history" in the current directory, 50 entries, degrees.
//! let config = CalcDeskConfig::default();
//!
//! // Or override what you need
//! let config = CalcDeskConfig {
//!     history_dir: PathBuf::from("/var/data/calcdesk"),
//!     default_angle_mode: AngleMode::Radians,
//!     ..CalcDeskConfig::default()
//! };
//! ```

use crate::calcdesk::evaluator::AngleMode;
use crate::calcdesk::scientific::DEFAULT_HISTORY_LIMIT;
use std::path::PathBuf;

/// Model asked for themes unless configured otherwise.
pub const DEFAULT_THEME_MODEL: &str = "gpt-4.1-mini";

/// Global configuration for CalcDesk features.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcDeskConfig {
    /// Directory holding the saved-experience file of
    /// [`LocalExperienceStore`](crate::calcdesk::history_store::LocalExperienceStore).
    pub history_dir: PathBuf,
    /// How many evaluations the scientific calculator keeps.
    pub scientific_history_limit: usize,
    /// Angle mode a fresh scientific calculator starts in.
    pub default_angle_mode: AngleMode,
    /// Model name used by the theme generator.
    pub theme_model: String,
}

impl Default for CalcDeskConfig {
    /// ```rust
    /// use calcdesk::CalcDeskConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = CalcDeskConfig::default();
    /// assert_eq!(config.history_dir, PathBuf::from("calcdesk_history"));
    /// assert_eq!(config.scientific_history_limit, 50);
    /// ```
    fn default() -> Self {
        Self {
            history_dir: PathBuf::from("calcdesk_history"),
            scientific_history_limit: DEFAULT_HISTORY_LIMIT,
            default_angle_mode: AngleMode::Degrees,
            theme_model: DEFAULT_THEME_MODEL.to_string(),
        }
    }
}
