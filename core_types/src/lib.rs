//! # Core Types
//!
//! This crate defines the value types shared by the scheduler, the host
//! driver and the tests.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Explicit over implicit**: Identities and priorities are distinct types.
//! - **Type safety first**: A priority cannot be passed where a task id is expected.
//! - **Plain data**: Everything here is `Copy` or cheaply cloned and serializable.
//!
//! ## Key Types
//!
//! - [`TaskId`]: Stable identity of a logical task
//! - [`Priority`]: Numeric rank, higher value is more urgent
//! - [`TaskSpec`]: One input task as handed to the scheduler

pub mod ids;
pub mod task;

pub use ids::{Priority, TaskId};
pub use task::TaskSpec;
