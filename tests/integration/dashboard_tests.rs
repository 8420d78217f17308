//! Integration tests for the dashboard selection cascade
//!
//! Tests cover:
//! - Year → event → session → driver loading
//! - Resets further down the cascade
//! - Driver comparison limit and eviction
//! - Stale and superseded lap responses
//! - Failure and empty-result messages

use crate::common::{event, hamilton, leclerc, session, verstappen, FakeSource};
use lapview::api::F1DataSource;
use lapview::state::{ChartView, Dashboard, Resource, MAX_SELECTED_DRIVERS};

/// Dashboard with the Bahrain race selected
fn race_dashboard(source: &FakeSource) -> Dashboard {
    let mut dashboard = Dashboard::new();
    dashboard.load_initial(source);
    dashboard.select_year(source, 2024);
    dashboard.select_event(source, event(1229, 2024));
    dashboard.select_session(source, session(9158, 1229, "Race"));
    dashboard
}

// ============================================
// Cascade Tests
// ============================================

#[test]
fn test_cascade_loads_each_level() {
    let source = FakeSource::bahrain();
    let dashboard = race_dashboard(&source);

    assert_eq!(dashboard.years, vec![2023, 2024]);
    assert_eq!(dashboard.events.len(), 1);
    assert_eq!(dashboard.sessions.len(), 2);
    assert_eq!(dashboard.drivers.len(), 3);
    assert!(dashboard.team_colors.is_some());
    assert_eq!(
        dashboard.session_result.as_ref().map(|r| r.event_name.as_str()),
        Some("Bahrain Grand Prix")
    );
    for resource in [Resource::Years, Resource::Events, Resource::Sessions, Resource::Drivers] {
        assert!(!dashboard.is_loading(resource));
        assert_eq!(dashboard.error(resource), None);
    }
}

#[test]
fn test_selecting_year_resets_everything_below() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);
    let toggle = dashboard.toggle_driver(verstappen());
    dashboard.fetch_laps(&source, toggle.request.unwrap());

    dashboard.select_year(&source, 2024);

    assert_eq!(dashboard.selected_event, None);
    assert_eq!(dashboard.selected_session, None);
    assert!(dashboard.sessions.is_empty());
    assert!(dashboard.drivers.is_empty());
    assert!(dashboard.selected_drivers.is_empty());
    assert!(dashboard.session_result.is_none());
    assert!(dashboard.laps_for(1).is_none());
}

#[test]
fn test_selecting_session_clears_driver_selection() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);
    let _ = dashboard.toggle_driver(hamilton());

    dashboard.select_session(&source, session(9157, 1229, "Qualifying"));

    assert!(dashboard.selected_drivers.is_empty());
    assert!(dashboard.drivers.is_empty());
    assert_eq!(
        dashboard.error(Resource::Drivers),
        Some("No drivers available for this session")
    );
    assert!(!dashboard.is_loading(Resource::Laps));
}

// ============================================
// Driver Selection Tests
// ============================================

#[test]
fn test_third_driver_evicts_oldest() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);

    for driver in [verstappen(), hamilton()] {
        let toggle = dashboard.toggle_driver(driver);
        assert_eq!(toggle.removed, None);
        dashboard.fetch_laps(&source, toggle.request.unwrap());
    }
    let toggle = dashboard.toggle_driver(leclerc());

    assert_eq!(toggle.removed, Some(1));
    assert_eq!(dashboard.selected_drivers.len(), MAX_SELECTED_DRIVERS);
    assert!(!dashboard.is_selected(1));
    assert!(dashboard.is_selected(44));
    assert!(dashboard.is_selected(16));
    assert!(dashboard.laps_for(1).is_none());
    assert!(dashboard.laps_for(44).is_some());
}

#[test]
fn test_clicking_selected_driver_deselects() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);
    let toggle = dashboard.toggle_driver(hamilton());
    dashboard.fetch_laps(&source, toggle.request.unwrap());

    let toggle = dashboard.toggle_driver(hamilton());

    assert_eq!(toggle.request, None);
    assert_eq!(toggle.removed, Some(44));
    assert!(dashboard.selected_drivers.is_empty());
    assert!(dashboard.laps_for(44).is_none());
}

#[test]
fn test_no_lap_request_without_session() {
    let mut dashboard = Dashboard::new();
    let toggle = dashboard.toggle_driver(verstappen());
    assert_eq!(toggle.request, None);
    assert!(dashboard.is_selected(1));
}

#[test]
fn test_lap_request_targets_selected_session() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);

    let request = dashboard.toggle_driver(leclerc()).request.unwrap();
    assert_eq!(request.session_key, 9158);
    assert_eq!(request.driver_number, 16);

    assert!(dashboard.fetch_laps(&source, request));
    assert_eq!(*source.lap_calls.borrow(), vec![(9158, 16)]);
    assert_eq!(dashboard.laps_for(16).map(|l| l.laps.len()), Some(2));
}

// ============================================
// Stale Response Tests
// ============================================

#[test]
fn test_response_for_deselected_driver_is_discarded() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);

    let request = dashboard.toggle_driver(verstappen()).request.unwrap();
    let _ = dashboard.toggle_driver(verstappen());
    let late = source.driver_laps(request.session_key, request.driver_number);

    assert!(!dashboard.complete_lap_request(request, late));
    assert!(dashboard.laps_for(1).is_none());
    assert_eq!(dashboard.chart_view(Default::default()), ChartView::NoSelection);
}

#[test]
fn test_superseded_response_is_discarded() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);

    let first = dashboard.toggle_driver(verstappen()).request.unwrap();
    let _ = dashboard.toggle_driver(verstappen());
    let second = dashboard.toggle_driver(verstappen()).request.unwrap();
    assert_ne!(first.generation, second.generation);

    let stale = source.driver_laps(first.session_key, first.driver_number);
    assert!(!dashboard.complete_lap_request(first, stale));
    assert!(dashboard.is_loading(Resource::Laps));

    let fresh = source.driver_laps(second.session_key, second.driver_number);
    assert!(dashboard.complete_lap_request(second, fresh));
    assert!(!dashboard.is_loading(Resource::Laps));
    assert!(dashboard.laps_for(1).is_some());
}

#[test]
fn test_response_from_previous_session_is_discarded() {
    let source = FakeSource::bahrain();
    let mut dashboard = race_dashboard(&source);

    let request = dashboard.toggle_driver(verstappen()).request.unwrap();
    dashboard.select_session(&source, session(9158, 1229, "Race"));
    let _ = dashboard.toggle_driver(verstappen());

    let late = source.driver_laps(request.session_key, request.driver_number);
    assert!(!dashboard.complete_lap_request(request, late));
    assert!(dashboard.laps_for(1).is_none());
}

// ============================================
// Error Tests
// ============================================

#[test]
fn test_failed_years_reports_message() {
    let source = FakeSource::bahrain().fail("years");
    let mut dashboard = Dashboard::new();
    dashboard.load_initial(&source);

    assert!(dashboard.years.is_empty());
    assert_eq!(dashboard.error(Resource::Years), Some("Failed to load years"));
    assert!(dashboard.team_colors.is_some());
}

#[test]
fn test_empty_events_reports_message() {
    let source = FakeSource::bahrain();
    let mut dashboard = Dashboard::new();
    dashboard.select_year(&source, 2023);

    assert!(dashboard.events.is_empty());
    assert_eq!(
        dashboard.error(Resource::Events),
        Some("No events available for this year")
    );
}

#[test]
fn test_failed_laps_show_error_view() {
    let source = FakeSource::bahrain().fail("laps");
    let mut dashboard = race_dashboard(&source);

    let request = dashboard.toggle_driver(verstappen()).request.unwrap();
    assert!(dashboard.fetch_laps(&source, request));

    assert_eq!(
        dashboard.chart_view(Default::default()),
        ChartView::Error("Failed to load lap data".to_string())
    );
}

#[test]
fn test_failed_result_keeps_drivers() {
    let source = FakeSource::bahrain().fail("result");
    let dashboard = race_dashboard(&source);

    assert_eq!(dashboard.drivers.len(), 3);
    assert!(dashboard.session_result.is_none());
    assert_eq!(
        dashboard.error(Resource::SessionResult),
        Some("Failed to load session result data")
    );
}
