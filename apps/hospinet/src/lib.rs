//! # hospinet
//!
//! Command-line front end for `hospinet-core`: argument parsing, TOML
//! configuration and file I/O. All pipeline logic lives in the core crate.

pub mod cli;
pub mod config;
