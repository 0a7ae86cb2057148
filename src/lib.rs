//! Issue Insights
//!
//! Aggregation of issue-tracker event histories into label counts,
//! reopen cycles, time-to-assign/close durations, monthly label trends
//! and priority scores.
//!
//! This crate provides the core implementation for the
//! `issue-insights` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! issue-insights labels --input issues.json --summary
//! issue-insights --help
//! ```
//!
//! Library users load issues through an [`parser::IssueSource`] and hand
//! the collection to the functions in [`aggregator`].

pub mod aggregator;
pub mod commands;
pub mod model;
pub mod output;
pub mod parser;
pub mod utils;
