//! Unit and pipeline coverage for the CLI.

mod config;
