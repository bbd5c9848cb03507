//! Core types for the quorum authorization engine
//!
//! This crate provides fundamental data structures used throughout the
//! workspace, including the owner identity type, error handling, and
//! deployment configuration.

pub mod address;
pub mod config;
pub mod error;

pub use address::AccAddress;
pub use config::{Config, ConfigError, DeployConfig};
pub use error::{EngineError, IsModuleError};
