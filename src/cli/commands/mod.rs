//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod consume;
pub mod init;
pub mod produce;
pub mod run;
pub mod validate;
