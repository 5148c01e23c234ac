//! Editable list of work periods behind the experience page.

use std::error::Error;
use std::fmt;

use crate::calcdesk::dates::{sum_work_periods, DateError, ExperienceTotal};
use crate::calcdesk::history_store::SavedExperience;

/// One employment interval as typed, `YYYY-MM-DD` or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPeriod {
    pub id: u64,
    pub from: String,
    pub to: String,
}

impl WorkPeriod {
    fn blank(id: u64) -> Self {
        Self {
            id,
            from: String::new(),
            to: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceError {
    Date(DateError),
    /// Saving needs a label for the record.
    BlankName,
    /// Saving needs a calculated total.
    NotCalculated,
    UnknownPeriod(u64),
}

impl fmt::Display for ExperienceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceError::Date(e) => write!(f, "{}", e),
            ExperienceError::BlankName => write!(f, "Please enter a name for this experience."),
            ExperienceError::NotCalculated => {
                write!(f, "Calculate your total experience before saving.")
            }
            ExperienceError::UnknownPeriod(id) => write!(f, "No work period with id {}", id),
        }
    }
}

impl Error for ExperienceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExperienceError::Date(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DateError> for ExperienceError {
    fn from(e: DateError) -> Self {
        ExperienceError::Date(e)
    }
}

/// Work periods plus the most recent total. Editing any period discards the
/// total, so a saved record always matches the periods on screen.
#[derive(Debug, Clone)]
pub struct ExperienceTracker {
    periods: Vec<WorkPeriod>,
    next_id: u64,
    total: Option<ExperienceTotal>,
}

impl ExperienceTracker {
    /// Starts with one blank period.
    pub fn new() -> Self {
        Self {
            periods: vec![WorkPeriod::blank(1)],
            next_id: 2,
            total: None,
        }
    }

    pub fn periods(&self) -> &[WorkPeriod] {
        &self.periods
    }

    pub fn total(&self) -> Option<&ExperienceTotal> {
        self.total.as_ref()
    }

    /// Append a blank period and return its id.
    pub fn add_period(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.periods.push(WorkPeriod::blank(id));
        id
    }

    /// Remove a period. The last remaining period is never removed; returns
    /// whether anything changed.
    pub fn remove_period(&mut self, id: u64) -> bool {
        if self.periods.len() <= 1 {
            return false;
        }
        let before = self.periods.len();
        self.periods.retain(|period| period.id != id);
        self.periods.len() != before
    }

    pub fn set_from(&mut self, id: u64, value: &str) -> Result<(), ExperienceError> {
        self.period_mut(id)?.from = value.to_string();
        self.total = None;
        Ok(())
    }

    pub fn set_to(&mut self, id: u64, value: &str) -> Result<(), ExperienceError> {
        self.period_mut(id)?.to = value.to_string();
        self.total = None;
        Ok(())
    }

    fn period_mut(&mut self, id: u64) -> Result<&mut WorkPeriod, ExperienceError> {
        self.periods
            .iter_mut()
            .find(|period| period.id == id)
            .ok_or(ExperienceError::UnknownPeriod(id))
    }

    /// Sum all periods. On failure the previous total is cleared too.
    pub fn calculate(&mut self) -> Result<ExperienceTotal, ExperienceError> {
        self.total = None;
        let pairs: Vec<(&str, &str)> = self
            .periods
            .iter()
            .map(|period| (period.from.as_str(), period.to.as_str()))
            .collect();
        let total = sum_work_periods(&pairs)?;
        log::debug!(
            "ExperienceTracker::calculate: {} periods, {} days",
            pairs.len(),
            total.total_days
        );
        self.total = Some(total);
        Ok(total)
    }

    /// Turn the current total into a record ready for an
    /// [`ExperienceStore`](crate::calcdesk::history_store::ExperienceStore).
    pub fn record(&self, owner_id: &str, name: &str) -> Result<SavedExperience, ExperienceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExperienceError::BlankName);
        }
        let total = self.total.ok_or(ExperienceError::NotCalculated)?;
        Ok(SavedExperience::new(owner_id, name, total.span))
    }
}

impl Default for ExperienceTracker {
    fn default() -> Self {
        Self::new()
    }
}
