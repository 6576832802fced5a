//! Monitoring-maintenance approval workflow.
//!
//! ARCHITECTURE
//! ============
//! Pure, synchronous domain logic with no I/O. Services wrap these types in
//! shared state and record audit entries; routes translate HTTP.
//!
//! - `role`: the four reviewer roles and the acting reviewer
//! - `flow`: the ordered, admin-editable reviewer list
//! - `approval`: per-machine status map and the action gate
//! - `checklist`: MS/TMS classification and the save gate
//! - `comment`: flat comment log and reply-tree builder
//! - `machine`: the reviewable unit tying the above together
//! - `schedule`: areas and machines, seed and file loader

pub mod approval;
pub mod checklist;
pub mod comment;
pub mod flow;
pub mod machine;
pub mod role;
pub mod schedule;
