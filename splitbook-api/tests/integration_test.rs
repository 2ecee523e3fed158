/// Integration tests for the splitbook API
///
/// These tests verify the full system works end-to-end:
/// - Registration and login round trips
/// - Bearer-token gating of mutating endpoints
/// - Password rotation
/// - Project/membership/expense lifecycle with cascades
/// - Error status mapping (401/404/409/422)
///
/// Skipped unless DATABASE_URL points at a PostgreSQL instance.
mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{body_json, json_request, TestContext};
use serde_json::json;
use splitbook_shared::auth::jwt;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let Some(ctx) = TestContext::new().await else { return };

    let response = ctx.send(json_request("GET", "/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

/// Register, then login with the right and wrong credentials
#[tokio::test]
async fn test_register_and_login_roundtrip() {
    let Some(ctx) = TestContext::new().await else { return };

    let (_, email, password) = ctx.register_user("Roundtrip").await;

    // Correct credentials yield a bearer token
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "bearer");

    // Wrong password and unknown email return the same 401
    let wrong_password = ctx
        .send(json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "nope" })),
        ))
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_email = ctx
        .send(json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({
                "email": format!("nobody-{}@example.com", Uuid::new_v4()),
                "password": password,
            })),
        ))
        .await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let Some(ctx) = TestContext::new().await else { return };

    let bad_email = ctx
        .send(json_request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "name": "X", "email": "not-an-email", "password": "pw" })),
        ))
        .await;
    assert_eq!(bad_email.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Duplicate email conflicts
    let (_, email, _) = ctx.register_user("Dup").await;
    let duplicate = ctx
        .send(json_request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "name": "Other", "email": email, "password": "pw" })),
        ))
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

/// The registration response never exposes the stored hash
#[tokio::test]
async fn test_register_response_omits_password_hash() {
    let Some(ctx) = TestContext::new().await else { return };

    let email = format!("hashcheck-{}@example.com", Uuid::new_v4());
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "name": "Hash", "email": email, "password": "pw" })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["email"], email);
}

#[tokio::test]
async fn test_mutating_routes_require_token() {
    let Some(ctx) = TestContext::new().await else { return };

    let (user_id, _, _) = ctx.register_user("Gated").await;
    let project = json!({
        "project_name": "Gated",
        "admin_id": user_id,
        "start_date": "2024-01-01",
    });

    let no_token = ctx
        .send(json_request("POST", "/v1/projects", None, Some(project.clone())))
        .await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let garbage = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some("not.a.token"),
            Some(project.clone()),
        ))
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    // Tokens signed with another secret are rejected
    let claims = jwt::Claims::new("intruder@example.com".to_string(), Duration::minutes(30));
    let forged = jwt::create_token(&claims, "wrong-secret-that-is-also-32-bytes-long").unwrap();
    let response = ctx
        .send(json_request("POST", "/v1/projects", Some(&forged), Some(project)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Expired tokens stop working even with a valid signature
#[tokio::test]
async fn test_expired_token_rejected() {
    let Some(ctx) = TestContext::new().await else { return };

    let (user_id, email, _) = ctx.register_user("Expired").await;

    let claims = jwt::Claims::new(email, Duration::minutes(-5));
    let expired = jwt::create_token(&claims, &ctx.config.jwt.secret).unwrap();

    let response = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some(&expired),
            Some(json!({
                "project_name": "TooLate",
                "admin_id": user_id,
                "start_date": "2024-01-01",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Password rotation: old credential stops working, new one takes over
#[tokio::test]
async fn test_update_password_flow() {
    let Some(ctx) = TestContext::new().await else { return };

    let (_, email, password) = ctx.register_user("Rotator").await;
    let token = ctx.login(&email, &password).await;

    // Wrong current password is rejected
    let wrong = ctx
        .send(json_request(
            "PUT",
            "/v1/auth/password",
            Some(&token),
            Some(json!({ "current_password": "nope", "new_password": "fresh" })),
        ))
        .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ok = ctx
        .send(json_request(
            "PUT",
            "/v1/auth/password",
            Some(&token),
            Some(json!({ "current_password": password, "new_password": "fresh" })),
        ))
        .await;
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    // Old password no longer logs in, new one does
    let old_login = ctx
        .send(json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ))
        .await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    ctx.login(&email, "fresh").await;
}

/// Full lifecycle: project, membership, expense, then cascade on delete
#[tokio::test]
async fn test_project_lifecycle() {
    let Some(ctx) = TestContext::new().await else { return };

    let (alice_id, email, password) = ctx.register_user("Alice").await;
    let token = ctx.login(&email, &password).await;

    // Create the project
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some(&token),
            Some(json!({
                "project_name": "Trip",
                "admin_id": alice_id,
                "admin_name": "Alice",
                "start_date": "2024-06-01",
                "end_date": "2024-06-14",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    let project_id = project["id"].as_str().unwrap().to_string();
    assert_eq!(project["project_name"], "Trip");

    // Add Alice as owner; the membership snapshots both names
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/members",
            Some(&token),
            Some(json!({
                "project_id": project_id,
                "member_id": alice_id,
                "member_role": "owner",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let membership = body_json(response).await;
    assert_eq!(membership["project_name"], "Trip");
    assert_eq!(membership["member_name"], "Alice");

    // Adding her again conflicts
    let duplicate = ctx
        .send(json_request(
            "POST",
            "/v1/members",
            Some(&token),
            Some(json!({
                "project_id": project_id,
                "member_id": alice_id,
                "member_role": "viewer",
            })),
        ))
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // Record an expense
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/expenses",
            Some(&token),
            Some(json!({
                "project_id": project_id,
                "member_id": alice_id,
                "expense_name": "Taxi",
                "amount": 1500,
                "expense_type": "travel",
                "expense_status": "pending",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let expense = body_json(response).await;
    assert_eq!(expense["amount"], 1500);
    assert_eq!(expense["member_name"], "Alice");

    // The expense shows up in the project listing
    let response = ctx
        .send(json_request(
            "GET",
            &format!("/v1/expenses?project_id={project_id}"),
            None,
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let expenses = body_json(response).await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);

    // Deleting the project reports exactly what it removed
    let response = ctx
        .send(json_request(
            "DELETE",
            &format!("/v1/projects/{project_id}"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cascade = body_json(response).await;
    assert_eq!(cascade["expenses_removed"], 1);
    assert_eq!(cascade["memberships_removed"], 1);

    // Nothing left behind
    let response = ctx
        .send(json_request(
            "GET",
            &format!("/v1/expenses?project_id={project_id}"),
            None,
            None,
        ))
        .await;
    let expenses = body_json(response).await;
    assert!(expenses.as_array().unwrap().is_empty());

    let response = ctx
        .send(json_request(
            "GET",
            &format!("/v1/projects/{project_id}/members"),
            None,
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Removing a member removes only that member's expenses in the project
#[tokio::test]
async fn test_remove_member_scoped_cascade() {
    let Some(ctx) = TestContext::new().await else { return };

    let (alice_id, email, password) = ctx.register_user("Alice").await;
    let (bob_id, _, _) = ctx.register_user("Bob").await;
    let token = ctx.login(&email, &password).await;

    let response = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some(&token),
            Some(json!({
                "project_name": "Shared",
                "admin_id": alice_id,
                "start_date": "2024-01-01",
            })),
        ))
        .await;
    let project_id = body_json(response).await["id"].as_str().unwrap().to_string();

    for member_id in [&alice_id, &bob_id] {
        let response = ctx
            .send(json_request(
                "POST",
                "/v1/members",
                Some(&token),
                Some(json!({
                    "project_id": project_id,
                    "member_id": member_id,
                    "member_role": "member",
                })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    for (member_id, amount) in [(&alice_id, 100), (&alice_id, 200), (&bob_id, 300)] {
        let response = ctx
            .send(json_request(
                "POST",
                "/v1/expenses",
                Some(&token),
                Some(json!({
                    "project_id": project_id,
                    "member_id": member_id,
                    "expense_name": "Meal",
                    "amount": amount,
                    "expense_type": "food",
                    "expense_status": "approved",
                })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = ctx
        .send(json_request(
            "DELETE",
            &format!("/v1/members/{project_id}/{alice_id}"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let removed = body_json(response).await;
    assert_eq!(removed["expenses_removed"], 2);

    // Bob's expense survives
    let response = ctx
        .send(json_request(
            "GET",
            &format!("/v1/expenses?project_id={project_id}"),
            None,
            None,
        ))
        .await;
    let expenses = body_json(response).await;
    let expenses = expenses.as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["member_id"], bob_id.to_string());

    // Removing a pair that no longer exists is a 404
    let missing = ctx
        .send(json_request(
            "DELETE",
            &format!("/v1/members/{project_id}/{alice_id}"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_errors() {
    let Some(ctx) = TestContext::new().await else { return };

    let (user_id, email, password) = ctx.register_user("Validator").await;
    let token = ctx.login(&email, &password).await;

    // Empty project name
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some(&token),
            Some(json!({
                "project_name": "",
                "admin_id": user_id,
                "start_date": "2024-01-01",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");

    // Non-positive amount
    let response = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some(&token),
            Some(json!({
                "project_name": "Valid",
                "admin_id": user_id,
                "start_date": "2024-01-01",
            })),
        ))
        .await;
    let project_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx
        .send(json_request(
            "POST",
            "/v1/expenses",
            Some(&token),
            Some(json!({
                "project_id": project_id,
                "member_id": user_id,
                "expense_name": "Free lunch",
                "amount": 0,
                "expense_type": "food",
                "expense_status": "pending",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_user_lookup_by_email() {
    let Some(ctx) = TestContext::new().await else { return };

    let (user_id, email, _) = ctx.register_user("Lookup").await;

    let response = ctx
        .send(json_request("GET", &format!("/v1/users/email/{email}"), None, None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], user_id.to_string());

    let missing = ctx
        .send(json_request(
            "GET",
            &format!("/v1/users/email/missing-{}@example.com", Uuid::new_v4()),
            None,
            None,
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

/// Projects a user belongs to via membership, not ones they merely admin
#[tokio::test]
async fn test_projects_for_user() {
    let Some(ctx) = TestContext::new().await else { return };

    let (user_id, email, password) = ctx.register_user("Belonger").await;
    let token = ctx.login(&email, &password).await;

    let response = ctx
        .send(json_request(
            "POST",
            "/v1/projects",
            Some(&token),
            Some(json!({
                "project_name": "Joined",
                "admin_id": user_id,
                "start_date": "2024-01-01",
            })),
        ))
        .await;
    let project_id = body_json(response).await["id"].as_str().unwrap().to_string();

    // No membership yet: empty list, not an error
    let response = ctx
        .send(json_request(
            "GET",
            &format!("/v1/users/{user_id}/projects"),
            None,
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let response = ctx
        .send(json_request(
            "POST",
            "/v1/members",
            Some(&token),
            Some(json!({
                "project_id": project_id,
                "member_id": user_id,
                "member_role": "owner",
            })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send(json_request(
            "GET",
            &format!("/v1/users/{user_id}/projects"),
            None,
            None,
        ))
        .await;
    let projects = body_json(response).await;
    let projects = projects.as_array().unwrap().clone();
    assert!(projects.iter().any(|p| p["id"] == project_id.as_str()));
}
