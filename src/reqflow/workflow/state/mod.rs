// SPDX-License-Identifier: MIT

//! State management for graph workflows
//!
//! This module provides:
//! - `StateSchema` - the declared fields and their merge policies
//! - `WorkflowState` - the typed record threaded through a run
//! - `StateUpdate` - partial updates merged by policy
//! - `AppendLog` / `Accumulate` - append-merge sequences with explicit reset

mod accumulate;
mod schema;
mod store;

pub use accumulate::{Accumulate, AppendLog};
pub use schema::{MergePolicy, StateFieldDef, StateSchema};
pub use store::{StateUpdate, WorkflowState};
