//! Inspection schedules — Genba areas holding machines.
//!
//! Schedules come from a JSON file (`SCHEDULE_PATH`) or the built-in seed.
//! Loaded schedules start fresh: every approval pending, no comments, no
//! submissions, whatever the file says.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::approval::ApprovalRecord;
use super::checklist::{ChecklistItem, ItemStatus};
use super::machine::Machine;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("failed to read schedule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schedule file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenbaArea {
    pub id: Uuid,
    pub name: String,
    pub machines: Vec<Machine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub title: String,
    /// Free-form period label, e.g. `2026-W42`.
    pub period: String,
    pub areas: Vec<GenbaArea>,
}

impl Schedule {
    #[must_use]
    pub fn machine(&self, machine_id: Uuid) -> Option<&Machine> {
        self.areas
            .iter()
            .flat_map(|area| area.machines.iter())
            .find(|m| m.id == machine_id)
    }

    pub fn machine_mut(&mut self, machine_id: Uuid) -> Option<&mut Machine> {
        self.areas
            .iter_mut()
            .flat_map(|area| area.machines.iter_mut())
            .find(|m| m.id == machine_id)
    }

    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.areas.iter().flat_map(|area| area.machines.iter())
    }

    fn reset_session_state(&mut self) {
        for area in &mut self.areas {
            for machine in &mut area.machines {
                machine.approvals = ApprovalRecord::default();
                machine.comments.clear();
                machine.submissions = 0;
                for item in &mut machine.items {
                    item.result.clear();
                    item.remark.clear();
                    item.status = ItemStatus::Pending;
                }
            }
        }
    }
}

/// Load schedules from a JSON array file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_schedules(path: &Path) -> Result<Vec<Schedule>, ScheduleError> {
    let raw = std::fs::read_to_string(path)?;
    parse_schedules(&raw)
}

/// Parse schedules from JSON text, resetting per-session state.
///
/// # Errors
///
/// Returns a parse error for malformed JSON.
pub fn parse_schedules(raw: &str) -> Result<Vec<Schedule>, ScheduleError> {
    let mut schedules: Vec<Schedule> = serde_json::from_str(raw)?;
    for schedule in &mut schedules {
        schedule.reset_session_state();
    }
    Ok(schedules)
}

/// Built-in demo schedule used when no file is configured.
#[must_use]
pub fn seed_schedule() -> Schedule {
    let press_shop = GenbaArea {
        id: Uuid::new_v4(),
        name: "Press Shop".into(),
        machines: vec![
            Machine::new(
                "Hydraulic Press HP-01",
                vec![
                    ChecklistItem::new("Hydraulic oil temperature", Some("°C"), Some(20.0), Some(40.0)),
                    ChecklistItem::new("System pressure", Some("bar"), Some(140.0), Some(160.0)),
                    ChecklistItem::new("Oil level sight glass", None, None, None),
                ],
            ),
            Machine::new(
                "Air Compressor AC-02",
                vec![
                    ChecklistItem::new("Discharge pressure", Some("bar"), Some(6.0), Some(8.0)),
                    ChecklistItem::new("Drain valve condition", None, None, None),
                ],
            ),
        ],
    };
    let assembly = GenbaArea {
        id: Uuid::new_v4(),
        name: "Assembly Line 1".into(),
        machines: vec![Machine::new(
            "Conveyor CV-11",
            vec![
                ChecklistItem::new("Motor current", Some("A"), Some(4.0), Some(7.5)),
                ChecklistItem::new("Belt tracking", None, None, None),
            ],
        )],
    };

    Schedule {
        id: Uuid::new_v4(),
        title: "Weekly Monitoring Maintenance".into(),
        period: "weekly".into(),
        areas: vec![press_shop, assembly],
    }
}
