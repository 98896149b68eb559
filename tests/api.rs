mod common;

use axum::http::StatusCode;
use serde_json::json;

use bitskill::config::AppConfig;
use common::{application_payload, gig_payload, TestClient};

#[tokio::test]
async fn health_reports_status_and_uptime() {
    let client = TestClient::spawn().await;
    let (status, body) = client.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_routes_return_json_404() {
    let client = TestClient::spawn().await;
    let (status, body) = client.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/api/nope");
}

#[tokio::test]
async fn register_login_me_flow() {
    let client = TestClient::spawn().await;
    let token = client.register("alice@example.com", "Alice Doe", "employer").await;

    let (status, body) = client.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["fullName"], "Alice Doe");
    assert_eq!(body["user"]["role"], "employer");

    let relogin = client.login("alice@example.com").await;
    let (status, _) = client.get("/api/auth/me", Some(&relogin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_401_and_garbage_token_is_403() {
    let client = TestClient::spawn().await;

    let (status, body) = client.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access token required");

    let (status, body) = client.get("/api/auth/me", Some("not-a-real-token")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let client = TestClient::spawn().await;
    client.register("bob@example.com", "Bob One", "student").await;

    let (status, body) = client
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "bob@example.com",
                "fullName": "Bob Two",
                "password": "Passw0rd!",
                "role": "student",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists with this email");
}

#[tokio::test]
async fn register_validation_reports_every_field() {
    let client = TestClient::spawn().await;
    let (status, body) = client
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "fullName": "A",
                "password": "weak",
                "role": "student",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 3);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let client = TestClient::spawn().await;
    client.register("carol@example.com", "Carol Day", "freelancer").await;

    let (status, body) = client
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "carol@example.com", "password": "Wrong-pass-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn gig_detail_bumps_view_count_atomically() {
    let client = TestClient::spawn().await;
    let category = client.seed_category("Web Development").await;
    let token = client.register("owner@example.com", "Gig Owner", "employer").await;

    let (status, body) = client
        .post("/api/gigs", Some(&token), gig_payload(category))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let gig_id = body["gigId"].as_i64().expect("gig id");

    let (_, first) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(first["gig"]["viewsCount"], 1);
    assert_eq!(first["gig"]["title"], "Build a landing page");
    assert_eq!(first["gig"]["categoryName"], "Web Development");
    assert_eq!(first["gig"]["postedByName"], "Gig Owner");

    let (_, second) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(second["gig"]["viewsCount"], 2);
}

#[tokio::test]
async fn gig_creation_rejects_unknown_category() {
    let client = TestClient::spawn().await;
    let token = client.register("owner@example.com", "Gig Owner", "employer").await;

    let (status, body) = client.post("/api/gigs", Some(&token), gig_payload(999)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid category");
}

#[tokio::test]
async fn only_the_owner_can_update_or_delete_a_gig() {
    let client = TestClient::spawn().await;
    let category = client.seed_category("Web Development").await;
    let owner = client.register("owner@example.com", "Gig Owner", "employer").await;
    let outsider = client.register("other@example.com", "Other User", "freelancer").await;

    let (_, body) = client.post("/api/gigs", Some(&owner), gig_payload(category)).await;
    let gig_id = body["gigId"].as_i64().unwrap();

    let (status, body) = client
        .put(&format!("/api/gigs/{gig_id}"), Some(&outsider), gig_payload(category))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("your own gigs"));

    let (status, _) = client.delete(&format!("/api/gigs/{gig_id}"), Some(&outsider)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client
        .put(&format!("/api/gigs/{gig_id}"), Some(&owner), gig_payload(category))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = client.delete(&format!("/api/gigs/{gig_id}"), Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_paginates_filters_and_survives_bad_sort_columns() {
    let client = TestClient::spawn().await;
    let web = client.seed_category("Web Development").await;
    let design = client.seed_category("Graphic Design").await;
    let token = client.register("owner@example.com", "Gig Owner", "employer").await;

    for (i, category) in [web, web, design].iter().enumerate() {
        let mut payload = gig_payload(*category);
        payload["title"] = json!(format!("Marketplace gig number {i}"));
        let (status, _) = client.post("/api/gigs", Some(&token), payload).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = client.get("/api/gigs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["gigs"].as_array().unwrap().len(), 3);

    let (_, body) = client.get("/api/gigs?limit=2", None).await;
    assert_eq!(body["gigs"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["pages"], 2);

    let (_, body) = client.get(&format!("/api/gigs?category={design}"), None).await;
    assert_eq!(body["pagination"]["total"], 1);

    let (_, body) = client.get("/api/gigs?search=number+2", None).await;
    assert_eq!(body["pagination"]["total"], 1);

    // Unknown sort columns fall back to creation time instead of erroring.
    let (status, body) = client
        .get("/api/gigs?sortBy=views_count;drop&sortOrder=upside-down", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn application_business_rules() {
    let client = TestClient::spawn().await;
    let category = client.seed_category("Web Development").await;
    let owner = client.register("owner@example.com", "Gig Owner", "employer").await;
    let applicant = client.register("dev@example.com", "Dev Applicant", "freelancer").await;

    let (_, body) = client.post("/api/gigs", Some(&owner), gig_payload(category)).await;
    let gig_id = body["gigId"].as_i64().unwrap();

    // Owner cannot apply to their own gig.
    let (status, body) = client
        .post("/api/applications", Some(&owner), application_payload(gig_id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You cannot apply to your own gig");

    // First application goes through.
    let (status, _) = client
        .post("/api/applications", Some(&applicant), application_payload(gig_id))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Applying twice conflicts.
    let (status, body) = client
        .post("/api/applications", Some(&applicant), application_payload(gig_id))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already applied to this gig");

    // Unknown gig is a 404.
    let (status, _) = client
        .post("/api/applications", Some(&applicant), application_payload(9999))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A closed gig stops accepting applications.
    let (_, body) = client.post("/api/gigs", Some(&owner), gig_payload(category)).await;
    let closed_gig = body["gigId"].as_i64().unwrap();
    let mut update = gig_payload(category);
    update["status"] = json!("closed");
    let (status, _) = client
        .put(&format!("/api/gigs/{closed_gig}"), Some(&owner), update)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = client
        .post("/api/applications", Some(&applicant), application_payload(closed_gig))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This gig is no longer accepting applications");
}

#[tokio::test]
async fn withdrawal_decrements_the_counter_exactly_once() {
    let client = TestClient::spawn().await;
    let category = client.seed_category("Web Development").await;
    let owner = client.register("owner@example.com", "Gig Owner", "employer").await;
    let applicant = client.register("dev@example.com", "Dev Applicant", "freelancer").await;

    let (_, body) = client.post("/api/gigs", Some(&owner), gig_payload(category)).await;
    let gig_id = body["gigId"].as_i64().unwrap();

    let (_, body) = client
        .post("/api/applications", Some(&applicant), application_payload(gig_id))
        .await;
    let application_id = body["applicationId"].as_i64().unwrap();

    let (_, body) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(body["gig"]["applicationsCount"], 1);

    // Only the applicant may withdraw.
    let (status, _) = client
        .delete(&format!("/api/applications/{application_id}"), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client
        .delete(&format!("/api/applications/{application_id}"), Some(&applicant))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(body["gig"]["applicationsCount"], 0);

    // The row is gone, so a second withdrawal cannot drive the counter
    // negative.
    let (status, _) = client
        .delete(&format!("/api/applications/{application_id}"), Some(&applicant))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(body["gig"]["applicationsCount"], 0);
}

#[tokio::test]
async fn full_marketplace_flow() {
    let client = TestClient::spawn().await;
    let category = client.seed_category("Web Development").await;

    // Register A, login A, create gig G as A.
    client.register("a@example.com", "User A", "employer").await;
    let token_a = client.login("a@example.com").await;
    let (_, body) = client.post("/api/gigs", Some(&token_a), gig_payload(category)).await;
    let gig_id = body["gigId"].as_i64().unwrap();

    // Register B, login B, apply to G as B.
    client.register("b@example.com", "User B", "freelancer").await;
    let token_b = client.login("b@example.com").await;
    let (status, body) = client
        .post("/api/applications", Some(&token_b), application_payload(gig_id))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let application_id = body["applicationId"].as_i64().unwrap();

    // G shows one application.
    let (_, body) = client.get(&format!("/api/gigs/{gig_id}"), None).await;
    assert_eq!(body["gig"]["applicationsCount"], 1);

    // B cannot accept; A can.
    let (status, _) = client
        .patch(
            &format!("/api/applications/{application_id}/status"),
            Some(&token_b),
            json!({ "status": "accepted" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client
        .patch(
            &format!("/api/applications/{application_id}/status"),
            Some(&token_a),
            json!({ "status": "accepted" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The owner sees the applicant; the applicant sees the verdict.
    let (status, body) = client
        .get(&format!("/api/applications/gig/{gig_id}"), Some(&token_a))
        .await;
    assert_eq!(status, StatusCode::OK);
    let applications = body["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["applicantName"], "User B");
    assert_eq!(applications[0]["status"], "accepted");

    let (status, body) = client
        .get("/api/applications/my-applications", Some(&token_b))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applications"][0]["gigTitle"], "Build a landing page");
    assert_eq!(body["applications"][0]["gigOwnerName"], "User A");

    // And B may not read A's applicant list.
    let (status, _) = client
        .get(&format!("/api/applications/gig/{gig_id}"), Some(&token_b))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn application_validation_bounds() {
    let client = TestClient::spawn().await;
    let category = client.seed_category("Web Development").await;
    let owner = client.register("owner@example.com", "Gig Owner", "employer").await;
    let applicant = client.register("dev@example.com", "Dev Applicant", "freelancer").await;

    let (_, body) = client.post("/api/gigs", Some(&owner), gig_payload(category)).await;
    let gig_id = body["gigId"].as_i64().unwrap();

    let mut payload = application_payload(gig_id);
    payload["coverLetter"] = json!("too short");
    payload["proposedTimeline"] = json!("now");
    let (status, body) = client.post("/api/applications", Some(&applicant), payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn profile_update_is_visible_publicly() {
    let client = TestClient::spawn().await;
    let token = client.register("dee@example.com", "Dee Signer", "freelancer").await;

    let (status, _) = client
        .put(
            "/api/users/profile",
            Some(&token),
            json!({
                "fullName": "Dee Signer",
                "bio": "Brand designer with a soft spot for grids.",
                "skills": ["figma", "branding"],
                "location": "Rotterdam",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = client.get("/api/auth/me", Some(&token)).await;
    let user_id = body["user"]["id"].as_i64().unwrap();

    let (status, body) = client.get(&format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["bio"], "Brand designer with a soft spot for grids.");
    assert_eq!(body["user"]["skills"], json!(["figma", "branding"]));

    let (status, _) = client.get("/api/users/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_listing_hides_inactive_rows() {
    let client = TestClient::spawn().await;
    let active = client.seed_category("Web Development").await;
    let retired = client.seed_category("Retired Category").await;
    sqlx::query("UPDATE categories SET is_active = 0 WHERE id = ?")
        .bind(retired)
        .execute(&client.state.db)
        .await
        .unwrap();

    let (status, body) = client.get("/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Web Development");

    let (status, _) = client.get(&format!("/api/categories/{active}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = client.get(&format!("/api/categories/{retired}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn auth_endpoints_rate_limit_per_ip() {
    let mut config = AppConfig::for_tests();
    config.rate_limit.auth_max_requests = 2;
    let client = TestClient::with_config(config).await;

    let login = json!({ "email": "ghost@example.com", "password": "Passw0rd!" });
    for _ in 0..2 {
        let (status, _) = client
            .send("POST", "/api/auth/login", None, Some(login.clone()), Some("10.1.2.3"))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = client
        .send("POST", "/api/auth/login", None, Some(login.clone()), Some("10.1.2.3"))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Too many requests"));

    // A different address still gets through.
    let (status, _) = client
        .send("POST", "/api/auth/login", None, Some(login), Some("10.9.9.9"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
