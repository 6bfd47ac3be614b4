// (c) Copyright 2023 Helsing GmbH. All rights reserved.

#![doc = include_str!("../README.md")]

/// Case classification and conversion
pub mod case;
/// Configuration file format and discovery
pub mod config;
/// Error types
pub mod errors;
/// Issue records and output sinks
pub mod report;
/// File discovery and checking
pub mod scanner;
/// Field name rules and the parsers feeding them
pub mod validation;
