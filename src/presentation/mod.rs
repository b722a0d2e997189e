//! Command-line interface and terminal output

pub mod cli;
pub mod ui;
