//! CLI library components for boardkeep.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;
