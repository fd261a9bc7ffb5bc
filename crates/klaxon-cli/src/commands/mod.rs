//! Subcommand handlers

pub mod contact;
pub mod dispatch;
pub mod registry;
pub mod seed;
