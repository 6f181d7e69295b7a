// Integration tests for PropMate

use actix_web::{http::StatusCode, test, web, App};
use propmate::core::Matcher;
use propmate::models::{Property, RankingResponse, Reminder, ReminderStatus, TenantId};
use propmate::routes::{self, handle_json_payload_error, AppState, RankLimits};
use propmate::services::{CacheKey, Collection, PitchGenerator, RankingCache, TenantStore};
use serde_json::{json, Value};
use std::sync::Arc;

const TENANT: &str = "agent@propmate.in";

fn create_state() -> AppState {
    AppState {
        store: Arc::new(TenantStore::in_memory(100, 60)),
        rankings: Arc::new(RankingCache::new(100, 300)),
        pitch: Arc::new(PitchGenerator::local()),
        matcher: Matcher::default(),
        limits: RankLimits::default(),
    }
}

fn property_json(id: &str, price: u64, area: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Flat {}", id),
        "transactionType": "Rent",
        "price": price,
        "bhk": "2BHK",
        "furnishing": "Semi",
        "location": { "address": "Main Road", "area": area, "city": "Mumbai" }
    })
}

fn client_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Ravi Kumar",
        "phone": "9876543210",
        "maritalStatus": "Married",
        "requirement": "Rent",
        "preferredAreas": ["Bandra"],
        "preferredCity": "Pune",
        "bhkPreference": ["2BHK"],
        "furnishingPreference": ["Any"],
        "budgetMin": 40000,
        "budgetMax": 60000
    })
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_endpoint() {
    let state = create_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storeBackend"], "memory");
    assert!(body["cachedRankings"].is_u64());
}

#[actix_web::test]
async fn test_rank_for_client_end_to_end() {
    let state = create_state();
    let app = app!(state);
    let base = format!("/api/v1/tenants/{}", TENANT);

    let req = test::TestRequest::post()
        .uri(&format!("{}/clients", base))
        .set_json(client_json("c1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    for property in [
        property_json("over", 75000, "Bandra West"),
        property_json("perfect", 50000, "Bandra West"),
        property_json("elsewhere", 50000, "Andheri"),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("{}/properties", base))
            .set_json(property)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!("{}/matches/c1", base))
        .to_request();
    let ranking: RankingResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ranking.client_id, "c1");
    assert_eq!(ranking.total_candidates, 3);
    let order: Vec<(&str, u32)> = ranking
        .matches
        .iter()
        .map(|m| (m.property.id.as_str(), m.result.score))
        .collect();
    assert_eq!(order, vec![("perfect", 100), ("elsewhere", 85), ("over", 70)]);

    let over = &ranking.matches[2].result;
    assert!(over.reasons.iter().any(|r| r.contains("15000")));

    // Records were stored under the sanitized tenant key
    let stored: Vec<Property> = state
        .store
        .load(&TenantId::new(TENANT), Collection::Properties)
        .await
        .unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].tenant_id, "agent_propmate_in");
}

#[actix_web::test]
async fn test_ranking_memo_invalidated_on_write() {
    let state = create_state();
    let app = app!(state);
    let base = format!("/api/v1/tenants/{}", TENANT);

    for (uri, body) in [
        (format!("{}/clients", base), client_json("c1")),
        (format!("{}/properties", base), property_json("p1", 50000, "Bandra")),
    ] {
        let req = test::TestRequest::post().uri(&uri).set_json(body).to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri(&format!("{}/matches/c1?limit=10", base)).to_request();
    let ranking: RankingResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ranking.matches[0].result.score, 100);
    let key = CacheKey::ranking(&TenantId::new(TENANT), "c1", Some(10));
    assert!(state.rankings.get(&key).await.is_some());

    // Price the listing out of budget
    let req = test::TestRequest::put()
        .uri(&format!("{}/properties/p1", base))
        .set_json(property_json("p1", 90000, "Bandra"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(state.rankings.get(&key).await.is_none());

    let req = test::TestRequest::get().uri(&format!("{}/matches/c1?limit=10", base)).to_request();
    let ranking: RankingResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ranking.matches[0].result.score, 70);
}

#[actix_web::test]
async fn test_missing_records_return_404() {
    let state = create_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/tenants/nobody/matches/ghost")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/api/v1/tenants/nobody/properties/ghost")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_client_rejected() {
    let state = create_state();
    let app = app!(state);

    let mut client = client_json("c1");
    client["budgetMin"] = json!(90000);

    let req = test::TestRequest::post()
        .uri("/api/v1/tenants/t1/clients")
        .set_json(client)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/tenants/t1/clients")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_duplicate_id_rejected() {
    let state = create_state();
    let app = app!(state);

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tenants/t1/properties")
            .set_json(property_json("p1", 50000, "Bandra"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn test_score_pair() {
    let state = create_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .set_json(json!({
            "property": property_json("p1", 50000, "Koramangala"),
            "client": client_json("c1")
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["score"], 85);
    assert_eq!(body["breakdown"]["area"], 10);
    assert_eq!(body["propertyId"], "p1");
}

#[actix_web::test]
async fn test_pitch_uses_local_template() {
    let state = create_state();
    let app = app!(state);
    let base = "/api/v1/tenants/t1";

    for (uri, body) in [
        (format!("{}/clients", base), client_json("c1")),
        (format!("{}/properties", base), property_json("p1", 50000, "Bandra")),
    ] {
        let req = test::TestRequest::post().uri(&uri).set_json(body).to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::post()
        .uri(&format!("{}/matches/c1/pitch/p1", base))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let pitch = body["pitch"].as_str().unwrap();
    assert!(pitch.contains("Ravi Kumar"));
    assert!(pitch.contains("Bandra"));
}

#[actix_web::test]
async fn test_dashboard_and_search() {
    let state = create_state();
    let app = app!(state);
    let base = "/api/v1/tenants/t1";

    for (uri, body) in [
        (format!("{}/clients", base), client_json("c1")),
        (format!("{}/properties", base), property_json("p1", 50000, "Bandra")),
        (format!("{}/properties", base), property_json("p2", 90000, "Powai")),
    ] {
        let req = test::TestRequest::post().uri(&uri).set_json(body).to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri(&format!("{}/dashboard", base)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalProperties"], 2);
    assert_eq!(body["totalClients"], 1);

    let req = test::TestRequest::get().uri(&format!("{}/search?q=powai", base)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["properties"].as_array().unwrap().len(), 1);
    assert_eq!(body["properties"][0]["id"], "p2");

    let req = test::TestRequest::post()
        .uri(&format!("{}/search", base))
        .set_json(json!({ "maxPrice": 60000, "clientName": "ravi" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["properties"].as_array().unwrap().len(), 1);
    assert_eq!(body["clients"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_reminder_lifecycle() {
    let state = create_state();
    let app = app!(state);
    let base = "/api/v1/tenants/t1/reminders";

    let req = test::TestRequest::post()
        .uri(base)
        .set_json(json!({
            "id": "r1",
            "title": "Visit with Ravi",
            "time": "2026-11-02T10:00:00Z",
            "type": "Site Visit",
            "clientId": "c1",
            "propertyId": "p1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("{}/r1/reschedule", base))
        .set_json(json!({ "time": "2026-11-03T10:00:00Z" }))
        .to_request();
    let reminder: Reminder = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reminder.status, ReminderStatus::Rescheduled);
    assert_eq!(reminder.reschedule_count, 1);

    let req = test::TestRequest::post()
        .uri(&format!("{}/r1/complete", base))
        .set_json(json!({ "clientPresent": false, "ownerPresent": true }))
        .to_request();
    let reminder: Reminder = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reminder.status, ReminderStatus::Completed);
    assert!(reminder.is_completed);
    assert_eq!(reminder.client_present, Some(false));

    let req = test::TestRequest::get().uri("/api/v1/tenants/t1/reports").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["reminders"]["clientNoShows"], 1);
    assert_eq!(body["showRate"], 0);
}
