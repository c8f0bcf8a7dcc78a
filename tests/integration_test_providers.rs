mod common;
use common::{AuthHeaders, TestApp};
use axum::http::StatusCode;
use serde_json::{json, Value};

async fn create_active(app: &TestApp, admin: &AuthHeaders, payload: Value) -> String {
    let (status, body) = app.call("POST", "/api/v1/admin/providers", Some(payload), Some(admin)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = app.call("POST", &format!("/api/v1/admin/providers/{}/active", id), Some(json!({ "active": true })), Some(admin)).await;
    assert_eq!(status, StatusCode::OK);
    id
}

fn names(body: &Value) -> Vec<String> {
    body.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn test_new_listing_is_hidden_until_activated() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let (status, body) = app.call("POST", "/api/v1/admin/providers", Some(json!({
        "name": "  Panadería Sol ",
        "category": "alimento",
        "zone": "Bucerías",
        "tags": ["Pan", "pan", " Café "]
    })), Some(&admin)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Panadería Sol");
    assert_eq!(body["category"], "Alimento");
    assert_eq!(body["zone"], "Bucerías");
    assert_eq!(body["tags"], json!(["pan", "café"]));
    assert_eq!(body["is_active"], false);
    let id = body["id"].as_str().unwrap().to_string();

    let (_, public) = app.call("GET", "/api/v1/providers", None, None).await;
    assert!(public.as_array().unwrap().is_empty());

    let (status, body) = app.call("POST", &format!("/api/v1/admin/providers/{}/active", id), Some(json!({ "active": true })), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], true);

    let (_, public) = app.call("GET", "/api/v1/providers", None, None).await;
    assert_eq!(names(&public), vec!["Panadería Sol"]);
}

#[tokio::test]
async fn test_provider_input_validation() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    for payload in [
        json!({ "name": "   " }),
        json!({ "name": "Taller", "category": "Carpintería" }),
        json!({ "name": "Taller", "zone": "Tepic" }),
    ] {
        let (status, _) = app.call("POST", "/api/v1/admin/providers", Some(payload), Some(&admin)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app.call("GET", "/api/v1/providers?zone=Tepic", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_provider_routes_require_admin() {
    let app = TestApp::new().await;
    let member = app.member("member@example.com").await;

    let (status, _) = app.call("GET", "/api/v1/admin/providers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call("GET", "/api/v1/admin/providers", None, Some(&member)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.call("POST", "/api/v1/admin/providers", Some(json!({ "name": "X" })), Some(&member)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM providers")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_member_listings() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let ana = app.member("ana@example.com").await;
    let luis = app.member("luis@example.com").await;

    let (status, body) = app.call("POST", "/api/v1/me/providers", Some(json!({ "name": "Clases de Yoga", "category": "Bienestar" })), Some(&ana)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_active"], false);
    let yoga_id = body["id"].as_str().unwrap().to_string();

    app.call("POST", "/api/v1/me/providers", Some(json!({ "name": "Plomería Luis" })), Some(&luis)).await;

    let (status, body) = app.call("GET", "/api/v1/me/providers", None, Some(&ana)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Clases de Yoga"]);

    // admins are not approved members
    let (status, _) = app.call("POST", "/api/v1/me/providers", Some(json!({ "name": "X" })), Some(&admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.call("GET", "/api/v1/admin/providers", None, Some(&admin)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // members cannot activate their own listing
    let (status, _) = app.call("POST", &format!("/api/v1/admin/providers/{}/active", yoga_id), Some(json!({ "active": true })), Some(&ana)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_keeps_activation_and_owner() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let id = create_active(&app, &admin, json!({ "name": "Veterinaria", "category": "Mascotas" })).await;

    let (status, body) = app.call("PUT", &format!("/api/v1/admin/providers/{}", id), Some(json!({
        "name": "Veterinaria Bahía",
        "category": "Mascotas",
        "zone": "Nuevo Vallarta",
        "phone": "322 111 2233",
        "tags": ["perros", "gatos"]
    })), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Veterinaria Bahía");
    assert_eq!(body["zone"], "Nuevo Vallarta");
    assert_eq!(body["is_active"], true);

    let (status, _) = app.call("PUT", "/api/v1/admin/providers/missing", Some(json!({ "name": "X" })), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call("POST", "/api/v1/admin/providers/missing/active", Some(json!({ "active": false })), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_directory_filters() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    create_active(&app, &admin, json!({
        "name": "Panadería Sol", "description": "Pan artesanal", "category": "Alimento",
        "zone": "Bucerías", "tags": ["pan", "vegano"]
    })).await;
    create_active(&app, &admin, json!({
        "name": "Café Luna", "description": "Café y pan dulce", "category": "Alimento",
        "zone": "Punta Mita", "tags": ["cafe", "pan"]
    })).await;
    create_active(&app, &admin, json!({
        "name": "Taller Mecánico", "category": "Autos y transporte", "zone": "Bucerías"
    })).await;

    let (_, body) = app.call("GET", "/api/v1/providers?q=PAN", None, None).await;
    let mut found = names(&body);
    found.sort();
    assert_eq!(found, vec!["Café Luna", "Panadería Sol"]);

    let (_, body) = app.call("GET", "/api/v1/providers?category=alimento&zone=Bucer%C3%ADas", None, None).await;
    assert_eq!(names(&body), vec!["Panadería Sol"]);

    let (_, body) = app.call("GET", "/api/v1/providers?tags=pan", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.call("GET", "/api/v1/providers?tags=pan,VEGANO", None, None).await;
    assert_eq!(names(&body), vec!["Panadería Sol"]);

    let (_, body) = app.call("GET", "/api/v1/providers?tags=pan,sushi", None, None).await;
    assert!(body.as_array().unwrap().is_empty());

    // newest update first
    let (_, body) = app.call("GET", "/api/v1/providers", None, None).await;
    assert_eq!(names(&body)[0], "Taller Mecánico");
}

#[tokio::test]
async fn test_search_folds_accented_capitals() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let (status, body) = app.call("POST", "/api/v1/admin/providers", Some(json!({
        "name": "Óptica Bahía", "description": "EXÁMENES de la vista", "zone": "BUCERÍAS"
    })), Some(&admin)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    assert_eq!(body["zone"], "Bucerías");
    let id = body["id"].as_str().unwrap().to_string();
    app.call("POST", &format!("/api/v1/admin/providers/{}/active", id), Some(json!({ "active": true })), Some(&admin)).await;
    create_active(&app, &admin, json!({ "name": "Farmacia Centro" })).await;

    for q in ["%C3%B3ptica", "BAH%C3%8DA", "ex%C3%A1menes"] {
        let (status, body) = app.call("GET", &format!("/api/v1/providers?q={}", q), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Óptica Bahía"], "query {}", q);
    }

    let (_, body) = app.call("GET", "/api/v1/providers?zone=BUCER%C3%8DAS", None, None).await;
    assert_eq!(names(&body), vec!["Óptica Bahía"]);

    // wildcard characters are matched literally
    for q in ["_", "%25"] {
        let (_, body) = app.call("GET", &format!("/api/v1/providers?q={}", q), None, None).await;
        assert!(body.as_array().unwrap().is_empty(), "query {}", q);
    }
}

#[tokio::test]
async fn test_catalog_lists_closed_values() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/api/v1/catalog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 16);
    assert_eq!(body["zones"].as_array().unwrap().len(), 5);
    assert!(body["zones"].as_array().unwrap().contains(&json!("Bucerías")));
}
