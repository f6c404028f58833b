//! Executor Layer Tests
//!
//! End-to-end tests for the recordkeeper executor:
//! - Bridge lines for the save, load and connection commands
//! - Save scenarios and the history properties
//! - Failure ordering between the history insert and the primary replace
//! - Typed Editor API

mod common;

mod bridge_lines;
mod editor_api;
mod failure_ordering;
mod save_scenarios;
