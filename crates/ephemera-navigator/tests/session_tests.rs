//! Navigator session driven by scripted sources.

use ephemera_context::{ContextError, ContextSource};
use ephemera_forge::AssetLookup;
use ephemera_navigator::{
    action_for_key, FixedClock, NavAction, NavigationState, NavigatorSession, Status, ViewMode,
};
use ephemera_test_utils::{
    completed_asset, daily_context, date, ScriptedContextSource, StaticForge,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const TODAY: &str = "2026-10-16";

fn start(
    source: &Arc<ScriptedContextSource>,
    assets: Option<Arc<dyn AssetLookup>>,
) -> NavigatorSession {
    let source: Arc<dyn ContextSource> = source.clone();
    NavigatorSession::start(source, Arc::new(FixedClock::new(date(TODAY))), assets)
}

async fn settled(rx: &mut watch::Receiver<NavigationState>) -> NavigationState {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| !s.is_loading()))
        .await
        .expect("session did not settle")
        .expect("session closed")
        .clone()
}

#[tokio::test]
async fn test_initial_fetch_is_undated_and_succeeds() {
    let source = Arc::new(ScriptedContextSource::new());
    source.respond_ok(None, date(TODAY));

    let session = start(&source, None);
    let mut rx = session.subscribe();
    let state = settled(&mut rx).await;

    assert_eq!(state.status, Status::Success);
    assert!(state.is_today);
    assert_eq!(state.context.unwrap().date.to_string(), TODAY);
    assert_eq!(source.requests(), vec![None]);
}

#[tokio::test]
async fn test_prev_into_not_found_is_void() {
    let source = Arc::new(ScriptedContextSource::new());
    source
        .respond_ok(None, date(TODAY))
        .respond(Some(date("2026-10-15")), Err(ContextError::not_found("void")));

    let session = start(&source, None);
    let mut rx = session.subscribe();
    settled(&mut rx).await;

    assert!(session.prev());
    {
        let loading = rx.borrow_and_update();
        assert_eq!(loading.status, Status::Loading);
        assert_eq!(loading.selected_date, date("2026-10-15"));
    }

    let state = settled(&mut rx).await;
    assert_eq!(state.status, Status::Void);
    assert!(state.context.is_none());
    assert!(state.last_error.as_ref().unwrap().is_not_found());
    assert_eq!(source.requests(), vec![None, Some(date("2026-10-15"))]);
}

#[tokio::test]
async fn test_late_response_for_superseded_date_is_discarded() {
    let d1 = date("2026-05-01");
    let d2 = date("2026-05-02");
    let source = Arc::new(ScriptedContextSource::new());
    source.respond_ok(None, date(TODAY));
    let held_d1 = source.hold(Some(d1));
    let held_d2 = source.hold(Some(d2));

    let session = start(&source, None);
    let mut rx = session.subscribe();
    settled(&mut rx).await;

    session.go_to(d1);
    session.go_to(d2);

    held_d2.release(Ok(daily_context(d2)));
    let state = settled(&mut rx).await;
    assert_eq!(state.context.as_ref().unwrap().date, d2);

    held_d1.release(Ok(daily_context(d1)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = session.snapshot();
    assert_eq!(state.selected_date, d2);
    assert_eq!(state.context.unwrap().date, d2);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_existing_asset_fills_model_url() {
    let source = Arc::new(ScriptedContextSource::new());
    source.respond_ok(None, date(TODAY));
    let forge = StaticForge::new().with_assets(
        &format!("ctx-{TODAY}"),
        vec![completed_asset("t1", "https://mirror.test/today.glb")],
    );

    let session = start(&source, Some(Arc::new(forge)));
    let mut rx = session.subscribe();
    let state = settled(&mut rx).await;

    assert_eq!(state.context.unwrap().model_url, "https://mirror.test/today.glb");
}

#[tokio::test]
async fn test_asset_lookup_failure_is_not_a_fetch_failure() {
    let source = Arc::new(ScriptedContextSource::new());
    source.respond_ok(None, date(TODAY));

    let session = start(&source, Some(Arc::new(StaticForge::new())));
    let mut rx = session.subscribe();
    let state = settled(&mut rx).await;

    assert_eq!(state.status, Status::Success);
    assert_eq!(state.context.unwrap().model_url, "");
}

#[tokio::test]
async fn test_invalid_link_voids_without_request() {
    let source = Arc::new(ScriptedContextSource::new());
    source.respond_ok(None, date(TODAY));

    let session = start(&source, None);
    let mut rx = session.subscribe();
    settled(&mut rx).await;

    assert!(!session.go_to_link("2026-13-01"));
    let state = session.snapshot();
    assert_eq!(state.status, Status::Void);
    assert!(matches!(
        state.last_error.as_deref(),
        Some(ContextError::InvalidDate(_))
    ));
    assert_eq!(source.requests(), vec![None]);
}

#[tokio::test]
async fn test_keys_drive_the_session() {
    let source = Arc::new(ScriptedContextSource::new());
    source
        .respond_ok(None, date(TODAY))
        .respond_ok(None, date(TODAY));

    let session = start(&source, None);
    let mut rx = session.subscribe();
    settled(&mut rx).await;

    // at today: right arrow does nothing
    assert!(!session.dispatch(action_for_key("ArrowRight").unwrap()));

    assert!(session.dispatch(action_for_key("Enter").unwrap()));
    assert_eq!(session.snapshot().view, ViewMode::Detail);
    assert!(session.dispatch(action_for_key("Escape").unwrap()));
    assert_eq!(session.snapshot().view, ViewMode::Totem);

    // unscripted past date: NotFound
    assert!(session.dispatch(NavAction::Prev));
    assert_eq!(settled(&mut rx).await.status, Status::Void);
    assert!(!session.dispatch(NavAction::OpenDetail));

    assert!(session.dispatch(action_for_key("t").unwrap()));
    let state = settled(&mut rx).await;
    assert_eq!(state.status, Status::Success);
    assert!(state.is_today);
}

#[tokio::test]
async fn test_shutdown_discards_in_flight_result() {
    let source = Arc::new(ScriptedContextSource::new());
    let held = source.hold(None);

    let session = start(&source, None);
    let rx = session.subscribe();
    tokio::task::yield_now().await;

    session.shutdown();
    held.release(Ok(daily_context(date(TODAY))));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(session.snapshot().status, Status::Loading);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_refresh_today_after_midnight_reenables_next() {
    let source = Arc::new(ScriptedContextSource::new());
    source
        .respond_ok(None, date(TODAY))
        .respond_ok(None, date("2026-10-17"));
    let clock = Arc::new(FixedClock::new(date(TODAY)));
    let session = NavigatorSession::start(source.clone(), clock.clone(), None);
    let mut rx = session.subscribe();
    settled(&mut rx).await;

    assert!(!session.next());
    assert!(!session.refresh_today());

    clock.set(date("2026-10-17"));
    assert!(session.refresh_today());
    assert!(!session.snapshot().is_today);

    assert!(session.next());
    let state = settled(&mut rx).await;
    assert_eq!(state.selected_date, date("2026-10-17"));
    assert!(state.is_today);
    assert_eq!(source.requests(), vec![None, None]);
}

#[tokio::test]
async fn test_navigation_after_shutdown_is_refused() {
    let source = Arc::new(ScriptedContextSource::new());
    source.respond_ok(None, date(TODAY));

    let session = start(&source, None);
    let mut rx = session.subscribe();
    assert_eq!(settled(&mut rx).await.status, Status::Success);

    session.shutdown();
    assert!(!session.prev());
    assert!(!session.go_to(date("2026-01-05")));
    assert!(!session.go_to_link("2026-01-05"));
    assert!(!session.dispatch(NavAction::Today));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = session.snapshot();
    assert_eq!(state.status, Status::Success);
    assert_eq!(state.selected_date, date(TODAY));
    assert!(!rx.has_changed().unwrap());
    assert_eq!(source.requests(), vec![None]);
}

#[tokio::test]
async fn test_dropping_session_closes_updates() {
    let source = Arc::new(ScriptedContextSource::new());
    let _held = source.hold(None);

    let session = start(&source, None);
    let mut rx = session.subscribe();
    drop(session);

    let closed = tokio::time::timeout(Duration::from_secs(2), rx.changed()).await;
    assert!(matches!(closed, Ok(Err(_))));
}
