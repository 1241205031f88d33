//! # On This Day Common Library
//!
//! Shared code for the On This Day bot including:
//! - Catalog model and JSON persistence (load, backup, save)
//! - Title date extraction
//! - "On this day" matching and list formatting
//! - Configuration loading and validation
//! - Today resolution in a configured timezone
//! - Placeholder template rendering

pub mod catalog;
pub mod config;
pub mod date_parser;
pub mod error;
pub mod matcher;
pub mod templates;
pub mod time;

pub use catalog::{Catalog, ChannelInfo, VideoRecord};
pub use error::{Error, Result};
pub use time::TodayKey;
