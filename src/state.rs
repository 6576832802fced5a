//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Workflow state (schedules, approval flow, audit trail) lives in memory
//! for the process lifetime; work orders go through the repository port,
//! which may be backed by Postgres.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::audit::AuditTrail;
use crate::config::AppConfig;
use crate::workflow::flow::ApprovalFlow;
use crate::workflow::schedule::Schedule;
use crate::workorder::WorkOrderRepository;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub schedules: Arc<RwLock<HashMap<Uuid, Schedule>>>,
    pub flow: Arc<RwLock<ApprovalFlow>>,
    pub audit: Arc<RwLock<AuditTrail>>,
    pub work_orders: Arc<dyn WorkOrderRepository>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, schedules: Vec<Schedule>, work_orders: Arc<dyn WorkOrderRepository>) -> Self {
        Self {
            config: Arc::new(config),
            schedules: Arc::new(RwLock::new(schedules.into_iter().map(|s| (s.id, s)).collect())),
            flow: Arc::new(RwLock::new(ApprovalFlow::default())),
            audit: Arc::new(RwLock::new(AuditTrail::new())),
            work_orders,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
