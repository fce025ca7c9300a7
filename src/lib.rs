//! benchmark-reporter - performance test result comparison and reporting
//!
//! This library normalizes performance test results (JSON or NUnit XML,
//! schema versions 1 and 2) into one canonical model, aggregates every
//! metric's samples, classifies metrics against an optional baseline run and
//! renders the outcome as console summary, JSON, CSV and HTML.

pub mod assemble;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod html_output;
pub mod json_output;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod regression;
pub mod summary;
