//! LapView - Formula 1 lap time comparison
//!
//! This library turns per-driver lap data from the F1 stats backend into a
//! display-ready lap chart: aligned by lap number, outlier-aware, with a
//! fitted time axis, a best-lap marker and head-to-head gaps.
//!
//! ## Module Structure
//!
//! - [`analysis`] - The lap chart pipeline (parsing, alignment, outliers, scale, best lap)
//! - [`api`] - Backend payload types and the HTTP client
//! - [`format`] - Lap time formatting, tooltips, legend and chart text
//! - [`results`] - Session classification and lap tables
//! - [`settings`] - User settings persistence
//! - [`state`] - Dashboard selection cascade, lap cache and chart panel
//! - [`viewport`] - Viewport width signal with scoped subscriptions

pub mod analysis;
pub mod api;
pub mod format;
pub mod results;
pub mod settings;
pub mod state;
pub mod viewport;
