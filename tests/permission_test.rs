//! Integration tests for permission checks, invitations and edits.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{OWNER, TestApp};

const MANAGER: &str = "m@firma.de";
const EMPLOYEE: &str = "e@firma.de";

/// Owner, entities E1/E2, a manager of E1 and an employee in E1.
async fn seeded() -> TestApp {
    let app = TestApp::with_owner().await;
    assert_eq!(app.create_entity("E1", &[]).await.status, StatusCode::CREATED);
    assert_eq!(app.create_entity("E2", &[]).await.status, StatusCode::CREATED);

    let res = app
        .invite(OWNER, MANAGER, "manager", &[], &["E1"], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app
        .invite(
            MANAGER,
            EMPLOYEE,
            "employee",
            &["E1"],
            &[],
            json!({ "kosten": { "view": true, "edit": false } }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    app
}

async fn allowed(app: &TestApp, actor: &str, query: &str) -> bool {
    let res = app
        .request("GET", &format!("/api/permissions/check?{query}"), None, Some(actor))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    res.data()["allowed"].as_bool().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let res = app.request("GET", "/api/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.data()["status"], "ok");
}

#[tokio::test]
async fn test_actor_required() {
    let app = TestApp::with_owner().await;

    let res = app.request("GET", "/api/users", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .request("GET", "/api/users", None, Some("fremd@firma.de"))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "AUTHENTICATION");
}

#[tokio::test]
async fn test_owner_can_everything() {
    let app = TestApp::with_owner().await;
    for query in [
        "module=bankkonten&action=edit",
        "module=zahlungen&action=view&entity=E9",
        "module=unbekannt&action=edit",
    ] {
        assert!(allowed(&app, OWNER, query).await);
    }

    let res = app
        .request("GET", "/api/permissions/check?module=kosten&action=view", None, Some(OWNER))
        .await;
    assert_eq!(res.data()["source"], "unrestricted");
}

#[tokio::test]
async fn test_employee_global_flags() {
    let app = seeded().await;
    assert!(allowed(&app, EMPLOYEE, "module=kosten&action=view").await);
    assert!(!allowed(&app, EMPLOYEE, "module=kosten&action=edit").await);
    assert!(!allowed(&app, EMPLOYEE, "module=zahlungen&action=view").await);
    assert!(!allowed(&app, EMPLOYEE, "module=kosten&action=delete").await);
}

#[tokio::test]
async fn test_entity_override_wins_over_global_deny() {
    let app = seeded().await;
    assert!(!allowed(&app, EMPLOYEE, "module=zahlungen&action=view&entity=E1").await);

    let res = app
        .request(
            "PUT",
            &format!("/api/entities/E1/permissions/{EMPLOYEE}"),
            Some(json!({ "permissions": { "zahlungen": { "view": true, "edit": false } } })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert!(allowed(&app, EMPLOYEE, "module=zahlungen&action=view&entity=E1").await);
    assert!(!allowed(&app, EMPLOYEE, "module=zahlungen&action=view&entity=E2").await);
    assert!(!allowed(&app, EMPLOYEE, "module=zahlungen&action=view").await);

    let res = app
        .request(
            "GET",
            "/api/permissions/check?module=zahlungen&action=view&entity=E1",
            None,
            Some(EMPLOYEE),
        )
        .await;
    assert_eq!(res.data()["source"], "entity_override");

    // A manager cannot set overrides in an entity it does not manage.
    let res = app
        .request(
            "PUT",
            &format!("/api/entities/E2/permissions/{EMPLOYEE}"),
            Some(json!({ "permissions": { "zahlungen": { "view": true } } })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "DELETE",
            &format!("/api/entities/E1/permissions/{EMPLOYEE}"),
            None,
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(!allowed(&app, EMPLOYEE, "module=zahlungen&action=view&entity=E1").await);
}

#[tokio::test]
async fn test_manager_invite_scope() {
    let app = seeded().await;

    let res = app
        .invite(MANAGER, "a@firma.de", "manager", &["E2"], &[], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error_code(), "SCOPE_VIOLATION");

    let res = app
        .invite(MANAGER, "b@firma.de", "employee", &["E1"], &["E1"], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error_code(), "INVARIANT_VIOLATION");

    let res = app
        .invite(MANAGER, "c@firma.de", "geschaeftsfuehrer", &[], &[], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error_code(), "INVALID_ROLE_ASSIGNMENT");

    let res = app
        .invite(EMPLOYEE, "d@firma.de", "employee", &["E1"], &[], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error_code(), "PERMISSION_DENIED");

    // Nothing was persisted for the rejected invitations.
    let res = app.request("GET", "/api/users", None, Some(OWNER)).await;
    assert_eq!(res.data().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_invite_validation_and_conflict() {
    let app = seeded().await;

    let res = app
        .invite(OWNER, "kein-email", "employee", &[], &[], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .invite(OWNER, EMPLOYEE, "employee", &["E1"], &[], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_grant_check() {
    let app = seeded().await;

    let res = app
        .request(
            "POST",
            "/api/permissions/grant-check",
            Some(json!({ "role": "employee", "accessibleEntityIds": ["E1"] })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["valid"], true);

    let res = app
        .request(
            "POST",
            "/api/permissions/grant-check",
            Some(json!({ "role": "manager", "accessibleEntityIds": ["E2"] })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.data()["valid"], false);
    assert!(res.data()["reason"].is_string());
}

#[tokio::test]
async fn test_edit_permissions_scope() {
    let app = seeded().await;
    let outsider = "o@firma.de";
    let res = app
        .invite(OWNER, outsider, "employee", &["E1", "E2"], &[], json!({}))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    // Access exceeds the manager's scope.
    let res = app
        .request(
            "PUT",
            &format!("/api/users/{outsider}/permissions"),
            Some(json!({ "role": "employee", "accessibleEntityIds": ["E1"] })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // Nobody edits themself.
    let res = app
        .request(
            "PUT",
            &format!("/api/users/{MANAGER}/permissions"),
            Some(json!({ "role": "manager", "managedEntityIds": ["E1", "E2"] })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "PUT",
            &format!("/api/users/{EMPLOYEE}/permissions"),
            Some(json!({
                "role": "employee",
                "accessibleEntityIds": ["E1"],
                "modulePermissions": { "kosten": { "view": true, "edit": true } }
            })),
            Some(MANAGER),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(allowed(&app, EMPLOYEE, "module=kosten&action=edit").await);
}

#[tokio::test]
async fn test_visible_users_and_my_permissions() {
    let app = seeded().await;
    app.invite(OWNER, "x@firma.de", "employee", &["E2"], &[], json!({}))
        .await;

    let res = app.request("GET", "/api/users", None, Some(MANAGER)).await;
    let emails: Vec<&str> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&MANAGER));
    assert!(emails.contains(&EMPLOYEE));
    assert!(!emails.contains(&"x@firma.de"));
    assert!(!emails.contains(&OWNER));

    let res = app.request("GET", "/api/users", None, Some(EMPLOYEE)).await;
    assert_eq!(res.data().as_array().unwrap().len(), 1);

    let res = app
        .request("GET", "/api/me/permissions", None, Some(EMPLOYEE))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["badge"]["label"], "Mitarbeiter");
    assert_eq!(res.data()["canInviteUsers"], false);
    assert_eq!(res.data()["modules"].as_array().unwrap().len(), 10);
    assert_eq!(res.data()["entities"][0]["entityId"], "E1");
}
