//! Integration test suite for scriptgen.
//!
//! These tests drive the library the way the `scriptgen` binary does:
//! definition files on disk are loaded, turned into a generator and
//! rendered, and failures are checked as a whole.
//!
//! # Test Categories
//!
//! - `generation`: End-to-end script generation from definition files
//! - `graph`: Graph structure and its JSON summary
//! - `failures`: Aggregated validation, cycle and island reporting

mod fixtures;

mod failures;
mod generation;
mod graph;
