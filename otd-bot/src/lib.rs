//! otd-bot library interface
//!
//! Exposes the adapters and workflows so integration tests can drive them
//! with in-memory service implementations.

pub mod cli;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod services;
pub mod workflow;

pub use crate::error::{BotError, BotResult};
