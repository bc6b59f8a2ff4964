use parking_portal::{
    NavigationError, Navigator,
    credentials::{MemoryStorage, SlotCredentials},
    guard::{GuardPaths, NavigationGuard},
    models::{UserRecord, ViewId},
    routes::{RouteAccess, RouteDef, RouteTable, portal_route_table},
};
use std::sync::Arc;

fn navigator_with(storage: Arc<MemoryStorage>) -> Navigator {
    let table = Arc::new(portal_route_table(false).unwrap());
    let guard = NavigationGuard::new(
        Arc::new(SlotCredentials::new(storage)),
        GuardPaths::new("/login", "/userdashboard"),
    );
    Navigator::new(table, guard, 5)
}

#[test]
fn anonymous_admin_navigation_lands_on_login() {
    let mut navigator = navigator_with(Arc::new(MemoryStorage::new()));

    let location = navigator.navigate("/admindashboard").unwrap();

    assert_eq!(location.path, "/login");
    assert_eq!(location.view, ViewId::Login);
    assert_eq!(location.redirected_from.as_deref(), Some("/admindashboard"));
}

#[test]
fn regular_user_admin_navigation_lands_on_user_dashboard() {
    let storage = Arc::new(MemoryStorage::new());
    storage.store_session("abc", &UserRecord::default());
    let mut navigator = navigator_with(storage);

    let location = navigator.navigate("/admindashboard/add-parking-lot").unwrap();

    assert_eq!(location.name, "UserDashboard");
    assert_eq!(
        location.redirected_from.as_deref(),
        Some("/admindashboard/add-parking-lot")
    );
}

#[test]
fn admin_reaches_admin_views_directly() {
    let storage = Arc::new(MemoryStorage::new());
    storage.store_session("abc", &UserRecord::admin());
    let mut navigator = navigator_with(storage);

    let location = navigator.navigate("/admindashboard").unwrap();

    assert_eq!(location.view, ViewId::AdminDashboard);
    assert!(location.redirected_from.is_none());
}

#[test]
fn login_then_logout_changes_outcome_between_navigations() {
    let storage = Arc::new(MemoryStorage::new());
    let mut navigator = navigator_with(Arc::clone(&storage));

    assert_eq!(navigator.navigate("/profile").unwrap().path, "/login");

    storage.store_session("abc", &UserRecord::default());
    assert_eq!(navigator.navigate("/profile").unwrap().path, "/profile");

    storage.clear_session();
    assert_eq!(navigator.navigate("/profile").unwrap().path, "/login");
}

#[test]
fn history_records_each_completed_navigation() {
    let mut navigator = navigator_with(Arc::new(MemoryStorage::new()));

    navigator.navigate("/").unwrap();
    navigator.navigate("/register").unwrap();
    navigator.navigate("/userdashboard").unwrap();

    let paths: Vec<&str> = navigator
        .history()
        .iter()
        .map(|entry| entry.location.path.as_str())
        .collect();
    assert_eq!(paths, ["/", "/register", "/login"]);
    assert_eq!(navigator.current().unwrap().name, "login");
}

#[test]
fn unknown_path_fails_and_keeps_current_location() {
    let mut navigator = navigator_with(Arc::new(MemoryStorage::new()));
    navigator.navigate("/").unwrap();

    let err = navigator.navigate("/lots/unknown").unwrap_err();

    assert_eq!(err, NavigationError::NotFound("/lots/unknown".into()));
    assert_eq!(navigator.current().unwrap().path, "/");
    assert_eq!(navigator.history().len(), 1);
}

#[test]
fn unresolvable_redirect_target_is_not_found() {
    let table = Arc::new(portal_route_table(false).unwrap());
    let storage = MemoryStorage::new();
    storage.store_session("abc", &UserRecord::default());
    let guard = NavigationGuard::new(
        Arc::new(SlotCredentials::new(storage)),
        GuardPaths::new("/login", "/user"),
    );
    let mut navigator = Navigator::new(table, guard, 5);

    assert_eq!(
        navigator.navigate("/admindashboard").unwrap_err(),
        NavigationError::NotFound("/user".into())
    );
}

#[test]
fn guarded_login_route_is_reported_as_redirect_loop() {
    let table = Arc::new(
        RouteTable::new(
            vec![
                RouteDef::new("/login", "login", ViewId::Login)
                    .with_access(RouteAccess::AUTHENTICATED),
                RouteDef::new("/profile", "Profile", ViewId::Profile)
                    .with_access(RouteAccess::AUTHENTICATED),
            ],
            false,
        )
        .unwrap(),
    );
    let guard = NavigationGuard::new(
        Arc::new(SlotCredentials::new(MemoryStorage::new())),
        GuardPaths::new("/login", "/userdashboard"),
    );
    let mut navigator = Navigator::new(table, guard, 3);

    assert_eq!(
        navigator.navigate("/profile").unwrap_err(),
        NavigationError::RedirectLoop {
            path: "/profile".into(),
            limit: 3,
        }
    );
    assert!(navigator.current().is_none());
}

#[test]
fn params_flow_into_location() {
    let table = Arc::new(
        RouteTable::new(
            vec![RouteDef::new("/lots/:lot_id", "Lot", ViewId::AdminDashboard)],
            false,
        )
        .unwrap(),
    );
    let guard = NavigationGuard::new(
        Arc::new(SlotCredentials::new(MemoryStorage::new())),
        GuardPaths::new("/login", "/userdashboard"),
    );
    let mut navigator = Navigator::new(table, guard, 5);

    let location = navigator.navigate("/lots/12").unwrap();
    assert_eq!(location.params.get("lot_id").map(String::as_str), Some("12"));
}

#[test]
fn sessions_get_distinct_ids() {
    let a = navigator_with(Arc::new(MemoryStorage::new()));
    let b = navigator_with(Arc::new(MemoryStorage::new()));
    assert_ne!(a.session_id(), b.session_id());
}
