//! End-to-end API scenarios: menu, bookings, gallery cascade, sections
//!
//! Run: cargo test -p site-server --test admin_api

mod common;

use axum::body::Body;
use common::ADMIN_TOKEN;
use http::{Request, header};
use serde_json::json;

use site_server::db::repository::GalleryRepository;

#[tokio::test]
async fn menu_item_availability_scenario() {
    let (_tmp, state) = common::test_state().await;
    let app = common::test_app(&state);
    let cookie = common::sign_in(&app, ADMIN_TOKEN).await;

    // Public writes are refused
    let response = common::send(
        &app,
        common::json_request("POST", "/api/menu-items", None, Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), 401);

    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/menu-items",
            Some(&cookie),
            Some(json!({
                "name": "Retro IPA",
                "description": "Hazy, hoppy, ours",
                "price": "6.50",
                "category": "drinks",
                "is_available": true
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let created = common::body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["price"], "6.50");

    // Appears in the public drinks listing
    let drinks = common::body_json(
        common::send(
            &app,
            common::json_request("GET", "/api/menu-items?category=drinks", None, None),
        )
        .await,
    )
    .await;
    let names: Vec<&str> = drinks
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Retro IPA"));

    // ... and not in food
    let food = common::body_json(
        common::send(
            &app,
            common::json_request("GET", "/api/menu-items?category=food", None, None),
        )
        .await,
    )
    .await;
    assert!(food.as_array().unwrap().is_empty());

    // Marking it unavailable keeps it listed, flagged
    let response = common::send(
        &app,
        common::json_request(
            "PUT",
            &format!("/api/menu-items/{id}"),
            Some(&cookie),
            Some(json!({"is_available": false})),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);

    let drinks = common::body_json(
        common::send(
            &app,
            common::json_request("GET", "/api/menu-items?category=drinks", None, None),
        )
        .await,
    )
    .await;
    let item = drinks
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == "Retro IPA")
        .expect("unavailable items stay listed");
    assert_eq!(item["is_available"], false);

    // Negative price is refused before the write
    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/menu-items",
            Some(&cookie),
            Some(json!({
                "name": "Free Beer",
                "description": "suspicious",
                "price": "-1.00",
                "category": "drinks"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn booking_flow_moves_between_status_views() {
    let (_tmp, state) = common::test_state().await;
    let app = common::test_app(&state);
    let cookie = common::sign_in(&app, ADMIN_TOKEN).await;

    // Public form, no session required
    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/bookings",
            None,
            Some(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+34 600 000 000",
                "date": "2024-06-01",
                "time": "19:00",
                "party_size": 4
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let booking = common::body_json(response).await;
    assert_eq!(booking["status"], "pending");
    let id = booking["id"].as_str().unwrap().to_string();

    // Party size and email are validated before the write
    for bad in [
        json!({"name": "X", "email": "jane@example.com", "phone": "1", "date": "2024-06-01", "time": "19:00", "party_size": 12}),
        json!({"name": "X", "email": "not-an-email", "phone": "1", "date": "2024-06-01", "time": "19:00", "party_size": 2}),
        json!({"name": "X", "email": "jane@example.com", "phone": "1", "date": "june first", "time": "19:00", "party_size": 2}),
        json!({"name": "X", "email": "jane@example.com", "phone": "1", "date": "2024-06-01", "time": "7pm", "party_size": 2}),
    ] {
        let response = common::send(
            &app,
            common::json_request("POST", "/api/bookings", None, Some(bad)),
        )
        .await;
        assert_eq!(response.status(), 400);
    }

    // A booking against an unknown event is refused
    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/bookings",
            None,
            Some(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "1",
                "date": "2024-06-01",
                "time": "19:00",
                "party_size": 2,
                "event": "ghost-event"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), 400);

    // Admin sees it under the pending filter
    let page = common::body_json(
        common::send(
            &app,
            common::json_request("GET", "/api/bookings?status=pending", Some(&cookie), None),
        )
        .await,
    )
    .await;
    assert!(
        page["items"]
            .as_array()
            .unwrap()
            .iter()
            .any(|b| b["name"] == "Jane Doe")
    );

    // Confirming moves it between filtered views
    let response = common::send(
        &app,
        common::json_request(
            "PUT",
            &format!("/api/bookings/{id}/status"),
            Some(&cookie),
            Some(json!({"status": "confirmed"})),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);

    let pending = common::body_json(
        common::send(
            &app,
            common::json_request("GET", "/api/bookings?status=pending", Some(&cookie), None),
        )
        .await,
    )
    .await;
    assert!(pending["items"].as_array().unwrap().is_empty());

    let confirmed = common::body_json(
        common::send(
            &app,
            common::json_request(
                "GET",
                "/api/bookings?status=confirmed",
                Some(&cookie),
                None,
            ),
        )
        .await,
    )
    .await;
    assert!(
        confirmed["items"]
            .as_array()
            .unwrap()
            .iter()
            .any(|b| b["id"] == id.as_str())
    );

    // Status changes on a missing booking are 404
    let response = common::send(
        &app,
        common::json_request(
            "PUT",
            "/api/bookings/ghost/status",
            Some(&cookie),
            Some(json!({"status": "declined"})),
        ),
    )
    .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn gallery_category_cascade_delete() {
    let (_tmp, state) = common::test_state().await;
    let app = common::test_app(&state);
    let cookie = common::sign_in(&app, ADMIN_TOKEN).await;

    // Create the category
    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/gallery/categories",
            Some(&cookie),
            Some(json!({"name": "Beer Garden"})),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let category = common::body_json(response).await;
    assert_eq!(category["slug"], "beer-garden");
    let category_key = category["id"]
        .as_str()
        .unwrap()
        .strip_prefix("gallery_category:")
        .unwrap()
        .to_string();

    // Duplicate names are refused
    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/gallery/categories",
            Some(&cookie),
            Some(json!({"name": "Beer Garden"})),
        ),
    )
    .await;
    assert_eq!(response.status(), 409);

    // Store two files and register them as images
    let folder = format!("gallery/{category_key}");
    let png = common::tiny_png();
    for name in ["terrace.png", "bar.png"] {
        let stored = state.media.upload(&folder, name, &png).await.unwrap();
        let response = common::send(
            &app,
            common::json_request(
                "POST",
                "/api/gallery/images",
                Some(&cookie),
                Some(json!({
                    "url": stored.url,
                    "file_name": stored.file_name,
                    "category": category_key
                })),
            ),
        )
        .await;
        assert_eq!(response.status(), 200);
    }
    assert_eq!(state.media.list(&folder).await.unwrap().len(), 2);

    // An image against a dead category is refused
    let response = common::send(
        &app,
        common::json_request(
            "POST",
            "/api/gallery/images",
            Some(&cookie),
            Some(json!({
                "url": "http://localhost:3000/media/gallery/x/y.jpg",
                "file_name": "y.jpg",
                "category": "no-such-category"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), 400);

    // Cascade: files, image documents, then the category
    let response = common::send(
        &app,
        common::json_request(
            "DELETE",
            &format!("/api/gallery/categories/{category_key}"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);

    assert!(state.media.list(&folder).await.unwrap().is_empty());

    let repo = GalleryRepository::new(state.store.clone());
    assert!(repo.category_by_id(&category_key).await.unwrap().is_none());
    assert!(repo.images(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn sections_upsert_by_well_known_key() {
    let (_tmp, state) = common::test_state().await;
    let app = common::test_app(&state);
    let cookie = common::sign_in(&app, ADMIN_TOKEN).await;

    // Unknown section: 404 on the public read
    let response = common::send(
        &app,
        common::json_request("GET", "/api/sections/hero", None, None),
    )
    .await;
    assert_eq!(response.status(), 404);

    // First save creates the singleton under its well-known key
    let response = common::send(
        &app,
        common::json_request(
            "PUT",
            "/api/sections/hero",
            Some(&cookie),
            Some(json!({
                "heading": "The Taproom",
                "subheading": "Est. 1987",
                "extras": {"opens": "12:00"}
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let first = common::body_json(response).await;
    assert_eq!(first["id"], "section:hero");
    let created_at = first["created_at"].as_i64().unwrap();

    // Second save merges; created_at survives, updated_at moves
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let response = common::send(
        &app,
        common::json_request(
            "PUT",
            "/api/sections/hero",
            Some(&cookie),
            Some(json!({"heading": "The Taproom, Reborn"})),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let second = common::body_json(response).await;
    assert_eq!(second["created_at"].as_i64().unwrap(), created_at);
    assert!(second["updated_at"].as_i64().unwrap() > created_at);

    // Public read sees the latest copy
    let section = common::body_json(
        common::send(
            &app,
            common::json_request("GET", "/api/sections/hero", None, None),
        )
        .await,
    )
    .await;
    assert_eq!(section["heading"], "The Taproom, Reborn");
    assert_eq!(section["subheading"], "Est. 1987");
}

#[tokio::test]
async fn upload_stores_and_serves_media() {
    let (_tmp, state) = common::test_state().await;
    let app = common::test_app(&state);
    let cookie = common::sign_in(&app, ADMIN_TOKEN).await;

    let boundary = "X-SITE-SERVER-TEST-BOUNDARY";
    let png = common::tiny_png();
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"folder\"\r\n\r\nmenu\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"Pale Ale.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::COOKIE, &cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), 200);
    let stored = common::body_json(response).await;

    // <unix-millis>_<sanitized-name>.jpg inside the requested folder
    let file_name = stored["file_name"].as_str().unwrap();
    let (millis, rest) = file_name.split_once('_').unwrap();
    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(rest, "Pale-Ale.jpg");
    assert_eq!(
        stored["path"].as_str().unwrap(),
        &format!("menu/{file_name}")
    );

    // The stored file is served back under /media/
    let response = common::send(
        &app,
        common::json_request(
            "GET",
            &format!("/media/menu/{file_name}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );

    // Traversal is refused
    let response = common::send(
        &app,
        common::json_request("GET", "/media/menu/../secrets", None, None),
    )
    .await;
    assert_ne!(response.status(), 200);
}
