//! CLI utilities for easy-snmp.
//!
//! Argument parsing and result output for the `easysnmp` binary.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
