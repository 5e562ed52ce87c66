//! 业务服务模块

pub mod filter;
pub mod stack;

pub use stack::{BatchOutcome, StackError, StackService, StartOutcome};
