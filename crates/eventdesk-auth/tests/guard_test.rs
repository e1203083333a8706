//! Integration tests for role checks on identities resolved from real tokens.

mod helpers;

use eventdesk_auth::RoleSet;
use eventdesk_auth::rbac::{authorize, authorize_owner_or_admin, authorize_owner_or_role};
use eventdesk_core::error::ErrorKind;
use eventdesk_entity::user::UserRole;

use helpers::TestApp;

#[tokio::test]
async fn test_role_presets_against_issued_tokens() {
    let app = TestApp::new();
    let admin = app.signup_as("admin@x.com", "Abcd1234", UserRole::Admin).await;
    let vendor = app.signup_as("vendor@x.com", "Abcd1234", UserRole::Vendor).await;

    let admin_id = app
        .manager
        .authenticate(Some(&admin.tokens.access_token))
        .unwrap();
    let vendor_id = app
        .manager
        .authenticate(Some(&vendor.tokens.access_token))
        .unwrap();

    assert!(authorize(Some(&admin_id), &RoleSet::PLANNER_OR_ADMIN).is_ok());
    assert!(authorize(Some(&vendor_id), &RoleSet::VENDOR_OR_PLANNER).is_ok());

    let err = authorize(Some(&vendor_id), &RoleSet::ADMIN).unwrap_err();
    assert_eq!(err.kind.status_code(), 403);
    let err = authorize(None, &RoleSet::ADMIN).unwrap_err();
    assert_eq!(err.kind.status_code(), 401);
}

#[tokio::test]
async fn test_owner_checks() {
    let app = TestApp::new();
    let planner = app.signup("p@x.com", "Abcd1234").await;
    let vendor = app.signup_as("v@x.com", "Abcd1234", UserRole::Vendor).await;

    let planner_id = app
        .manager
        .authenticate(Some(&planner.tokens.access_token))
        .unwrap();

    assert!(authorize_owner_or_admin(Some(&planner_id), planner.user.id).is_ok());

    let err = authorize_owner_or_admin(Some(&planner_id), vendor.user.id).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    assert!(authorize_owner_or_role(Some(&planner_id), vendor.user.id, &RoleSet::PLANNER).is_ok());
}
