//! End-to-end session scenarios against a scripted directory.

mod common;

use std::sync::Arc;

use loolocator_client::{MapUnavailable, DEFAULT_RESULT_LIMIT};
use loolocator_core::{SearchParameters, SearchRadius, WashroomId};
use loolocator_engine::{
    GeoLocationProvider, LocationError, RecordingSurface, ResultStatus, Session, StaticPosition,
    SurfaceOp, QUERY_FAILED_MESSAGE,
};

use common::{origin, washroom, DeniedSource, ScriptedDirectory, TIMES_SQUARE};

type ScriptedSession<P> = Session<Arc<ScriptedDirectory>, P, RecordingSurface>;

fn session() -> (Arc<ScriptedDirectory>, ScriptedSession<StaticPosition>) {
    let directory = Arc::new(ScriptedDirectory::default());
    let session = Session::new(
        Arc::clone(&directory),
        GeoLocationProvider::new(StaticPosition(TIMES_SQUARE)),
        DEFAULT_RESULT_LIMIT,
    );
    (directory, session)
}

#[tokio::test]
async fn selection_is_cleared_when_refresh_drops_the_record() {
    let (directory, mut session) = session();
    session.attach_map(RecordingSurface::new());
    directory.push_now(Ok(vec![
        washroom("w1", 120.0),
        washroom("w2", 450.0),
        washroom("w3", 980.0),
    ]));

    assert_eq!(session.locate().await, Ok(origin()));
    assert_eq!(session.results().current().records.len(), 3);

    let w1 = WashroomId::new("w1");
    let w2 = WashroomId::new("w2");
    let w3 = WashroomId::new("w3");
    assert!(session.select(Some(&w2)));

    let map = session.map().unwrap();
    let second = washroom("w2", 450.0);
    let handle_w2 = map.marker_for(&w2).unwrap();
    let handle_w1 = map.marker_for(&w1).unwrap();
    let handle_w3 = map.marker_for(&w3).unwrap();
    let ops = map.surface().ops();
    assert_eq!(
        &ops[ops.len() - 2..],
        [
            SurfaceOp::Center(second.location),
            SurfaceOp::OpenDetail {
                handle: handle_w2,
                id: w2.clone(),
            },
        ]
    );

    session.map_mut().unwrap().surface_mut().take_ops();
    directory.push_now(Ok(vec![washroom("w1", 130.0), washroom("w3", 990.0)]));
    assert_eq!(session.change_filters(2000, false).await, Ok(true));

    assert!(session.results().snapshot().selection().is_none());
    let map = session.map().unwrap();
    assert!(map.open_detail().is_none());
    assert_eq!(
        map.surface().ops(),
        [SurfaceOp::CloseDetail, SurfaceOp::Destroy(handle_w2)]
    );
    assert_eq!(map.marker_for(&w1), Some(handle_w1));
    assert_eq!(map.marker_for(&w3), Some(handle_w3));
}

#[tokio::test]
async fn denied_location_issues_no_query() {
    let directory = Arc::new(ScriptedDirectory::default());
    let mut session: ScriptedSession<DeniedSource> = Session::new(
        Arc::clone(&directory),
        GeoLocationProvider::new(DeniedSource),
        DEFAULT_RESULT_LIMIT,
    );

    assert_eq!(session.locate().await, Err(LocationError::PermissionDenied));
    assert_eq!(
        session.notice(),
        Some("Location access denied. Please enable location services.")
    );
    assert_eq!(session.results().current().status, ResultStatus::Idle);
    assert_eq!(session.results().generation().get(), 0);
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn batched_filter_changes_issue_one_refresh() {
    let (directory, mut session) = session();
    session.start_at(origin()).await;
    let before = session.results().generation().get();

    session.set_filters(5000, false).unwrap();
    session.set_filters(5000, true).unwrap();
    assert!(session.pump().await);
    assert!(!session.pump().await);

    assert_eq!(session.results().generation().get(), before + 1);
    let calls = directory.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1.radius, SearchRadius::Meters5000);
    assert!(calls[1].1.accessibility_only);
}

#[tokio::test]
async fn invalid_radius_is_reported_without_querying() {
    let (directory, mut session) = session();
    session.start_at(origin()).await;

    assert!(session.change_filters(750, false).await.is_err());
    assert!(session.notice().is_some());
    assert_eq!(session.filters().current(), SearchParameters::default());
    assert_eq!(directory.calls().len(), 1);
}

#[tokio::test]
async fn filters_set_before_origin_apply_to_first_search() {
    let (directory, mut session) = session();
    session.set_filters(500, true).unwrap();
    assert!(!session.pump().await);
    assert!(directory.calls().is_empty());

    session.start_at(origin()).await;
    assert!(!session.pump().await);
    let calls = directory.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, SearchParameters::new(500, true).unwrap());
}

#[tokio::test]
async fn results_work_without_a_map() {
    let (directory, mut session) = session();
    session.map_unavailable(MapUnavailable {
        reason: "map key not configured (HTTP 404)".to_string(),
    });
    directory.push_now(Ok(vec![washroom("w1", 120.0)]));

    session.locate().await.unwrap();
    assert!(session.map().is_none());
    assert!(session.map_error().is_some());
    assert_eq!(session.results().current().status, ResultStatus::Success);
    assert!(session.select(Some(&WashroomId::new("w1"))));
}

#[tokio::test]
async fn retry_after_failure_reuses_origin_and_filters() {
    let (directory, mut session) = session();
    directory.push_now(Err(common::server_error()));
    session.start_at(origin()).await;
    assert_eq!(session.results().current().status, ResultStatus::Error);
    assert_eq!(session.notice(), Some(QUERY_FAILED_MESSAGE));

    directory.push_now(Ok(vec![washroom("w1", 120.0)]));
    assert!(session.retry().await);
    assert_eq!(session.results().current().status, ResultStatus::Success);
    assert!(session.notice().is_none());
    assert_eq!(directory.calls()[1].0, origin());
}

#[tokio::test]
async fn user_marker_is_placed_at_origin() {
    let (_directory, mut session) = session();
    session.attach_map(RecordingSurface::new());
    session.start_at(origin()).await;

    let map = session.map().unwrap();
    assert!(map.user_marker().is_some());
    assert!(map
        .surface()
        .ops()
        .contains(&SurfaceOp::Center(origin())));
}

#[tokio::test]
async fn retry_absorbs_pending_filter_change() {
    let (directory, mut session) = session();
    session.start_at(origin()).await;

    session.set_filters(5000, false).unwrap();
    assert!(session.retry().await);
    assert!(!session.pump().await);

    let calls = directory.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1.radius, SearchRadius::Meters5000);
    assert_eq!(session.results().generation().get(), 2);
}

#[tokio::test]
async fn marker_click_selects_the_washroom() {
    let (directory, mut session) = session();
    session.attach_map(RecordingSurface::new());
    directory.push_now(Ok(vec![washroom("w1", 120.0), washroom("w2", 450.0)]));
    session.locate().await.unwrap();

    let w2 = WashroomId::new("w2");
    let handle = session.map().unwrap().marker_for(&w2).unwrap();
    session.map_mut().unwrap().surface_mut().take_ops();

    assert!(session.select_marker(handle));
    assert_eq!(session.results().snapshot().selection(), Some(&w2));
    let map = session.map().unwrap();
    assert_eq!(map.open_detail(), Some(&w2));
    assert_eq!(
        map.surface().ops(),
        [
            SurfaceOp::Center(washroom("w2", 450.0).location),
            SurfaceOp::OpenDetail { handle, id: w2.clone() },
        ]
    );

    let user = map.user_marker().unwrap();
    assert!(!session.select_marker(user));
    assert_eq!(session.results().snapshot().selection(), Some(&w2));
}
