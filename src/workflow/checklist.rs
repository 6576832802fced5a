//! Checklist items and result validation.
//!
//! Each monitored parameter carries optional numeric bounds. A result is
//! MS (meets standard) when it parses inside `[min, max]` inclusive and TMS
//! otherwise. Parameters without both bounds are visual checks and report
//! N/A once filled.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Ms,
    Tms,
    #[serde(rename = "n_a")]
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChecklistError {
    #[error("fill all required fields: {}", .0.join(", "))]
    MissingResults(Vec<String>),
    #[error("checklist item not found: {0}")]
    UnknownItem(Uuid),
}

impl crate::error::ErrorCode for ChecklistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingResults(_) => "E_CHECKLIST_INCOMPLETE",
            Self::UnknownItem(_) => "E_CHECKLIST_UNKNOWN_ITEM",
        }
    }
}

/// One monitored parameter on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub name: String,
    /// Measurement unit shown next to the bounds, e.g. `°C` or `bar`.
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default = "pending")]
    pub status: ItemStatus,
}

fn pending() -> ItemStatus {
    ItemStatus::Pending
}

impl ChecklistItem {
    #[must_use]
    pub fn new(name: impl Into<String>, unit: Option<&str>, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            unit: unit.map(str::to_owned),
            min,
            max,
            result: String::new(),
            remark: String::new(),
            status: ItemStatus::Pending,
        }
    }

    /// Replace result and remark, recomputing the status.
    pub fn record(&mut self, result: &str, remark: &str) {
        self.result = result.trim().to_owned();
        self.remark = remark.trim().to_owned();
        self.status = compute_status(&self.result, self.min, self.max);
    }
}

/// Classify a raw result against optional inclusive bounds.
#[must_use]
pub fn compute_status(result: &str, min: Option<f64>, max: Option<f64>) -> ItemStatus {
    let result = result.trim();
    if result.is_empty() {
        return ItemStatus::Pending;
    }
    let (Some(min), Some(max)) = (min, max) else {
        return ItemStatus::NotApplicable;
    };
    match result.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= min && value <= max => ItemStatus::Ms,
        _ => ItemStatus::Tms,
    }
}

/// Save gate: every item must carry a non-empty result.
///
/// # Errors
///
/// Returns `MissingResults` naming every unfilled item, in checklist order.
pub fn validate_for_save(items: &[ChecklistItem]) -> Result<(), ChecklistError> {
    let missing: Vec<String> = items
        .iter()
        .filter(|item| item.result.trim().is_empty())
        .map(|item| item.name.clone())
        .collect();
    if missing.is_empty() { Ok(()) } else { Err(ChecklistError::MissingResults(missing)) }
}

#[cfg(test)]
#[path = "checklist_test.rs"]
mod tests;
