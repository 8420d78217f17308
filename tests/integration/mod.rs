//! Integration tests for end-to-end functionality
//!
//! Tests for:
//! - Year, event, session and driver selection
//! - Stale lap responses
//! - Chart panel states

pub mod dashboard_tests;
