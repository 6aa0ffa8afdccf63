//! Command handlers: bridge CLI args -> core engine -> output formatting.

pub mod classify;
pub mod config_cmd;
pub mod man;
pub mod replay;
