// HTTP integration tests for the recommendation API
use actix_web::{http::StatusCode, test, web, App};
use book_recommender::{
    routes::api_routes,
    services::{CatalogLoader, IndexSettings},
    CatalogIndex, RecommendationService,
};
use serde_json::{json, Value};

const CATALOG: &str = "\
title,authors,average_rating,language_code,num_pages,ratings_count
The Hobbit,J.R.R. Tolkien,4.27,eng,366,2530894
The Silmarillion,J.R.R. Tolkien,3.90,eng,386,187366
Dune,Frank Herbert,4.25,eng,604,800000
Dune Messiah,Frank Herbert,3.88,eng,331,150000
Emma,Jane Austen,4.00,eng,474,
Persuasion,Jane Austen,4.14,eng,249,
";

fn service() -> web::Data<RecommendationService> {
    let (catalog, _) = CatalogLoader::load_reader(CATALOG.as_bytes(), "fixture").unwrap();
    let settings = IndexSettings::default();
    let index = CatalogIndex::build(catalog, "fixture", settings).unwrap();
    web::Data::new(RecommendationService::new(index, settings).with_default_recommendations(2))
}

macro_rules! app {
    () => {
        test::init_service(App::new().app_data(service()).service(api_routes())).await
    };
}

#[actix_web::test]
async fn recommend_returns_ranked_books() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({ "book_title": "The Hobbit", "num_recommendations": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["resolved_title"], json!("The Hobbit"));
    assert_eq!(body["match"]["kind"], json!("exact"));

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["rank"], json!(1));
    assert_eq!(recs[0]["title"], json!("The Silmarillion"));
    assert_eq!(recs[0]["author"], json!("J.R.R. Tolkien"));
    assert!(recs.iter().all(|r| r["title"] != json!("The Hobbit")));
}

#[actix_web::test]
async fn recommend_uses_default_count_and_reports_fuzzy_matches() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({ "book_title": "Dune Mesiah" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["query"], json!("Dune Mesiah"));
    assert_eq!(body["resolved_title"], json!("Dune Messiah"));
    assert_eq!(body["match"]["kind"], json!("fuzzy"));
    assert!(body["match"]["score"].as_f64().unwrap() >= 70.0);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
    assert_eq!(body["recommendations"][0]["title"], json!("Dune"));
}

#[actix_web::test]
async fn query_is_echoed_as_sent() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({ "book_title": "Dune Messiah ", "num_recommendations": 1 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["query"], json!("Dune Messiah "));
    assert_eq!(body["resolved_title"], json!("Dune Messiah"));
    assert_eq!(body["match"]["kind"], json!("fuzzy"));
    assert_eq!(body["match"]["score"], json!(96.0));
}

#[actix_web::test]
async fn dropped_words_resolve_fuzzily() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({ "book_title": "Hobbit", "num_recommendations": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["resolved_title"], json!("The Hobbit"));
    assert_eq!(body["match"]["score"], json!(75.0));
    assert_eq!(body["recommendations"][0]["title"], json!("The Silmarillion"));
}

#[actix_web::test]
async fn missing_title_is_a_bad_request() {
    let app = app!();
    for payload in [json!({}), json!({ "book_title": "   " }), json!({ "book_title": "Dune", "num_recommendations": 0 })] {
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn unknown_title_is_not_found() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/recommend")
        .set_json(json!({ "book_title": "Zzzzz", "num_recommendations": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Zzzzz"));
}

#[actix_web::test]
async fn stats_reports_catalog_aggregates() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_books"], json!(6));
    assert_eq!(body["unique_authors"], json!(3));
    assert_eq!(body["languages"], json!(1));
    assert_eq!(body["average_rating"], json!(4.07));
    assert_eq!(body["average_pages"], json!(402.0));
}

#[actix_web::test]
async fn health_and_prewarm_respond() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], json!("ok"));
    assert_eq!(health["books"], json!(6));

    let req = test::TestRequest::get().uri("/api/prewarm").to_request();
    let prewarm: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(prewarm["status"], json!("ok"));
    let runs = prewarm["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0]["title"], json!("The Hobbit"));
    assert_eq!(runs[0]["recommendations"]["recommendations"].as_array().unwrap().len(), 3);
}
