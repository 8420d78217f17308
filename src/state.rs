//! Dashboard state: the selection cascade, the lap cache and the chart view.
//!
//! Choosing a year, event or session resets everything below it. Up to
//! [`MAX_SELECTED_DRIVERS`] drivers can be compared; selecting a third one
//! evicts the oldest. Lap fetches are issued as [`LapRequest`]s and merged
//! with [`Dashboard::complete_lap_request`], which drops responses for
//! drivers that are no longer selected so stale data cannot bring a removed
//! driver's line back.

use std::collections::HashMap;
use strum::Display;

use crate::analysis::{build_chart, build_series, ChartDataset, ChartOptions, DriverInfo, DriverSeries};
use crate::api::{ApiError, Driver, DriverLaps, Event, F1DataSource, F1Session, SessionResult, TeamColors};
use crate::viewport::{ViewportSignal, ViewportTracker};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of drivers compared at once
pub const MAX_SELECTED_DRIVERS: usize = 2;

// ============================================================================
// Core Types
// ============================================================================

/// Something the dashboard fetches, each with its own loading/error state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Resource {
    Years,
    Events,
    Sessions,
    Drivers,
    Laps,
    SessionResult,
    TeamColors,
}

impl Resource {
    /// Message shown when fetching this resource fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Resource::Years => "Failed to load years",
            Resource::Events => "Failed to load events",
            Resource::Sessions => "Failed to load sessions",
            Resource::Drivers => "Failed to load drivers",
            Resource::Laps => "Failed to load lap data",
            Resource::SessionResult => "Failed to load session result data",
            Resource::TeamColors => "Failed to load team colors",
        }
    }

    /// Message shown when the fetch succeeds with nothing in it
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Resource::Events => Some("No events available for this year"),
            Resource::Sessions => Some("No sessions available for this event"),
            Resource::Drivers => Some("No drivers available for this session"),
            Resource::Laps => Some("No lap data available for this driver"),
            Resource::SessionResult => Some("No session result available for this session"),
            Resource::Years | Resource::TeamColors => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ResourceStatus {
    loading: bool,
    error: Option<String>,
}

/// A lap fetch issued for one driver.
///
/// The generation identifies the selection that issued it; only the latest
/// request for a still-selected driver is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRequest {
    pub session_key: u32,
    pub driver_number: u32,
    pub generation: u64,
}

/// Outcome of clicking a driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverToggle {
    /// Lap fetch to perform for a newly selected driver
    pub request: Option<LapRequest>,
    /// Driver removed from the selection, by number
    pub removed: Option<u32>,
}

/// What the chart panel should show
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Loading,
    Error(String),
    NoSelection,
    NoData,
    Ready(Box<ChartDataset>),
}

impl ChartView {
    /// Text for the non-chart states
    pub fn message(&self) -> Option<String> {
        match self {
            ChartView::Loading => Some("Loading lap data...".to_string()),
            ChartView::Error(message) => Some(message.clone()),
            ChartView::NoSelection => Some(format!(
                "Select up to {} drivers to compare their lap times.",
                MAX_SELECTED_DRIVERS
            )),
            ChartView::NoData => Some("No lap data available for selected drivers.".to_string()),
            ChartView::Ready(_) => None,
        }
    }

    pub fn dataset(&self) -> Option<&ChartDataset> {
        match self {
            ChartView::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// Browsing state of the dashboard
#[derive(Debug, Default)]
pub struct Dashboard {
    pub years: Vec<i32>,
    pub events: Vec<Event>,
    pub sessions: Vec<F1Session>,
    pub drivers: Vec<Driver>,
    pub session_result: Option<SessionResult>,
    pub team_colors: Option<TeamColors>,

    pub selected_year: Option<i32>,
    pub selected_event: Option<Event>,
    pub selected_session: Option<F1Session>,
    /// Oldest first
    pub selected_drivers: Vec<Driver>,

    /// Fetched laps by driver number
    lap_cache: HashMap<u32, DriverLaps>,
    /// Generation of the outstanding lap request per driver number
    pending_laps: HashMap<u32, u64>,
    next_generation: u64,
    status: HashMap<Resource, ResourceStatus>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    pub fn is_loading(&self, resource: Resource) -> bool {
        if resource == Resource::Laps {
            return !self.pending_laps.is_empty();
        }
        self.status.get(&resource).is_some_and(|s| s.loading)
    }

    pub fn error(&self, resource: Resource) -> Option<&str> {
        self.status.get(&resource)?.error.as_deref()
    }

    fn begin(&mut self, resource: Resource) {
        let status = self.status.entry(resource).or_default();
        status.loading = true;
        status.error = None;
    }

    /// Record the outcome of a fetch; returns the value on success
    fn finish<T>(
        &mut self,
        resource: Resource,
        result: Result<T, ApiError>,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Option<T> {
        let status = self.status.entry(resource).or_default();
        status.loading = false;
        match result {
            Ok(value) => {
                if is_empty(&value) {
                    status.error = resource.empty_message().map(str::to_string);
                }
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Fetching {} failed: {}", resource, e);
                status.error = Some(resource.failure_message().to_string());
                None
            }
        }
    }

    fn fetch<T>(
        &mut self,
        resource: Resource,
        fetch: impl FnOnce() -> Result<T, ApiError>,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Option<T> {
        self.begin(resource);
        let result = fetch();
        self.finish(resource, result, is_empty)
    }

    // ------------------------------------------------------------------
    // Selection cascade
    // ------------------------------------------------------------------

    /// Load the season list and team colors
    pub fn load_initial(&mut self, source: &dyn F1DataSource) {
        if let Some(years) = self.fetch(Resource::Years, || source.years(), |_| false) {
            self.years = years;
        }
        if let Some(colors) = self.fetch(Resource::TeamColors, || source.team_colors(), |_| false) {
            self.team_colors = Some(colors);
        }
    }

    /// Choose a season; clears the event, session and driver selection
    pub fn select_year(&mut self, source: &dyn F1DataSource, year: i32) {
        self.selected_year = Some(year);
        self.selected_event = None;
        self.events.clear();
        self.reset_sessions();

        if let Some(events) = self.fetch(Resource::Events, || source.events(year), Vec::is_empty) {
            self.events = events;
        }
    }

    /// Choose an event; clears the session and driver selection
    pub fn select_event(&mut self, source: &dyn F1DataSource, event: Event) {
        let meeting_key = event.meeting_key;
        self.selected_event = Some(event);
        self.reset_sessions();

        if let Some(sessions) = self.fetch(Resource::Sessions, || source.sessions(meeting_key), Vec::is_empty) {
            self.sessions = sessions;
        }
    }

    /// Choose a session; clears the driver selection and loads its drivers
    /// and result
    pub fn select_session(&mut self, source: &dyn F1DataSource, session: F1Session) {
        let session_key = session.session_key;
        self.selected_session = Some(session);
        self.reset_drivers();

        if let Some(drivers) = self.fetch(Resource::Drivers, || source.drivers(session_key), Vec::is_empty) {
            self.drivers = drivers;
        }
        self.session_result = self.fetch(
            Resource::SessionResult,
            || source.session_result(session_key),
            |r| r.result.is_empty(),
        );
    }

    fn reset_sessions(&mut self) {
        self.selected_session = None;
        self.sessions.clear();
        self.session_result = None;
        self.reset_drivers();
    }

    fn reset_drivers(&mut self) {
        self.selected_drivers.clear();
        self.drivers.clear();
        self.lap_cache.clear();
        self.pending_laps.clear();
    }

    // ------------------------------------------------------------------
    // Driver selection and laps
    // ------------------------------------------------------------------

    pub fn is_selected(&self, driver_number: u32) -> bool {
        self.selected_drivers
            .iter()
            .any(|d| d.driver_number == driver_number)
    }

    /// Click on a driver: deselect if selected, otherwise select, evicting
    /// the oldest selection when the comparison is full.
    pub fn toggle_driver(&mut self, driver: Driver) -> DriverToggle {
        let number = driver.driver_number;

        if self.is_selected(number) {
            self.selected_drivers.retain(|d| d.driver_number != number);
            self.forget_driver(number);
            return DriverToggle {
                request: None,
                removed: Some(number),
            };
        }

        let mut removed = None;
        if self.selected_drivers.len() >= MAX_SELECTED_DRIVERS {
            let oldest = self.selected_drivers.remove(0);
            self.forget_driver(oldest.driver_number);
            removed = Some(oldest.driver_number);
        }
        self.selected_drivers.push(driver);

        let session_key = self.selected_session.as_ref().map(|s| s.session_key);
        let request = session_key.map(|session_key| {
            let generation = self.next_generation;
            self.next_generation += 1;
            self.pending_laps.insert(number, generation);
            self.status.entry(Resource::Laps).or_default().error = None;
            LapRequest {
                session_key,
                driver_number: number,
                generation,
            }
        });

        DriverToggle { request, removed }
    }

    fn forget_driver(&mut self, driver_number: u32) {
        self.lap_cache.remove(&driver_number);
        self.pending_laps.remove(&driver_number);
    }

    /// Merge a lap response. Returns `false` when the response is stale (the
    /// driver was deselected, the session changed, or a newer request for
    /// the driver is outstanding) and was discarded.
    pub fn complete_lap_request(&mut self, request: LapRequest, result: Result<DriverLaps, ApiError>) -> bool {
        let current_session = self.selected_session.as_ref().map(|s| s.session_key);
        let is_current = self.is_selected(request.driver_number)
            && current_session == Some(request.session_key)
            && self.pending_laps.get(&request.driver_number) == Some(&request.generation);

        if !is_current {
            tracing::debug!(
                "Discarding stale laps for driver {} (generation {})",
                request.driver_number,
                request.generation
            );
            return false;
        }

        self.pending_laps.remove(&request.driver_number);
        let laps = self.finish(Resource::Laps, result, |l| l.laps.is_empty());
        if let Some(laps) = laps {
            tracing::info!("Loaded {} laps for driver {}", laps.laps.len(), request.driver_number);
            self.lap_cache.insert(request.driver_number, laps);
        }
        true
    }

    /// Perform a lap request synchronously against `source`
    pub fn fetch_laps(&mut self, source: &dyn F1DataSource, request: LapRequest) -> bool {
        let result = source.driver_laps(request.session_key, request.driver_number);
        self.complete_lap_request(request, result)
    }

    /// Cached laps of a driver
    pub fn laps_for(&self, driver_number: u32) -> Option<&DriverLaps> {
        self.lap_cache.get(&driver_number)
    }

    // ------------------------------------------------------------------
    // Chart
    // ------------------------------------------------------------------

    /// Series of the selected drivers that have laps, in selection order
    pub fn chart_series(&self) -> Vec<DriverSeries> {
        self.selected_drivers
            .iter()
            .filter_map(|driver| {
                let laps = self.lap_cache.get(&driver.driver_number)?;
                Some(build_series(&DriverInfo::from(driver), &laps.laps))
            })
            .collect()
    }

    /// Compute what the chart panel shows
    pub fn chart_view(&self, options: ChartOptions) -> ChartView {
        if self.is_loading(Resource::Laps) {
            return ChartView::Loading;
        }
        if self.selected_drivers.is_empty() {
            return ChartView::NoSelection;
        }
        if let Some(error) = self.error(Resource::Laps) {
            return ChartView::Error(error.to_string());
        }

        let series = self.chart_series();
        if series.is_empty() {
            return ChartView::NoData;
        }

        let dataset = build_chart(&series, options);
        if !dataset.has_data() {
            return ChartView::NoData;
        }
        ChartView::Ready(Box::new(dataset))
    }
}

// ============================================================================
// Chart panel
// ============================================================================

/// The lap chart panel while it is mounted: follows the viewport width and
/// owns the outlier toggle. Dropping it deregisters from the viewport.
pub struct LapChartPanel {
    viewport: ViewportTracker,
    exclude_outliers: bool,
}

impl LapChartPanel {
    pub fn mount(signal: &ViewportSignal, exclude_outliers: bool) -> Self {
        Self {
            viewport: ViewportTracker::mount(signal),
            exclude_outliers,
        }
    }

    pub fn exclude_outliers(&self) -> bool {
        self.exclude_outliers
    }

    pub fn toggle_outliers(&mut self) {
        self.exclude_outliers = !self.exclude_outliers;
    }

    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            exclude_outliers: self.exclude_outliers,
            viewport_width: self.viewport.width(),
        }
    }

    pub fn view(&self, dashboard: &Dashboard) -> ChartView {
        dashboard.chart_view(self.options())
    }
}
