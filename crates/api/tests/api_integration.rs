//! API integration tests.
//!
//! Each test builds the router over a mock database seeded with the exact
//! result sets its request will consume, then drives it with `oneshot`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use ovation_api::{middleware::AppState, router as api_router};
use ovation_core::{
    EntryService, ParticipantResolver, RankingService, RoundService, VoteService,
};
use ovation_db::entities::entry::{self, ContentStatus, EntryKind};
use ovation_db::entities::round::{self, IdList};
use ovation_db::entities::vote;
use ovation_db::repositories::{
    CategoryRepository, EntryRepository, RoundRepository, VoteRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;

const EDITOR_TOKEN: &str = "test-editor-token";

/// Create test app state over the given mock connection.
fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let round_repo = RoundRepository::new(Arc::clone(&db));
    let entry_repo = EntryRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));

    let ranking = RankingService::new(round_repo.clone(), entry_repo.clone(), vote_repo.clone());
    let resolver = ParticipantResolver::new(entry_repo.clone(), round_repo.clone());
    let vote_service = VoteService::new(
        round_repo.clone(),
        entry_repo.clone(),
        vote_repo,
        ranking.clone(),
    );
    let round_service = RoundService::new(round_repo, resolver, ranking);
    let entry_service = EntryService::new(entry_repo, category_repo);

    AppState {
        vote_service,
        round_service,
        entry_service,
        editor_token: EDITOR_TOKEN.to_string(),
    }
}

fn create_router(db: DatabaseConnection) -> Router {
    api_router().with_state(create_state(db))
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_test_entry(id: i64, reference: &str) -> entry::Model {
    entry::Model {
        id,
        title: format!("Entry {id}"),
        kind: EntryKind::Business,
        status: ContentStatus::Published,
        in_voting: true,
        reference: Some(reference.to_string()),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn create_test_round(participant_ids: Vec<i64>) -> round::Model {
    round::Model {
        id: 1,
        title: "Best Diner".to_string(),
        status: ContentStatus::Published,
        reference: Some("round_1_cccccccc".to_string()),
        stage: round::RoundStage::Custom,
        starts_at: None,
        ends_at: None,
        duration_days: 0,
        category_ids: IdList::default(),
        source_round_id: None,
        manual_entry_ids: IdList::default(),
        participant_ids: IdList::from(participant_ids),
        nominee_limit: None,
        place_limit: None,
        result_entry_ids: None,
        result_rankings: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn vote_row(participant_reference: &str, votes: i64, last_vote_at: chrono::DateTime<Utc>) -> vote::Model {
    vote::Model {
        round_reference: "round_1_cccccccc".to_string(),
        participant_reference: participant_reference.to_string(),
        votes,
        last_vote_at: last_vote_at.into(),
    }
}

#[tokio::test]
async fn test_submit_vote_returns_receipt() {
    let voted_at = Utc::now();
    let ledger_row = vote_row("business_5_aaaaaaaa", 3, voted_at);

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_round(vec![5])]])
            .append_query_results([[create_test_entry(5, "business_5_aaaaaaaa")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[ledger_row.clone()]])
            .append_query_results([[create_test_entry(5, "business_5_aaaaaaaa")]])
            .append_query_results([[ledger_row]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/votes")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"round_reference":"round_1_cccccccc","participant_reference":"business_5_aaaaaaaa"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["round_reference"], "round_1_cccccccc");
    assert_eq!(json["participant_reference"], "business_5_aaaaaaaa");
    assert_eq!(json["total"], 3);
    assert_eq!(json["votes"], 3);
    assert_eq!(json["rank"], 1);
}

#[tokio::test]
async fn test_submit_vote_unknown_round_is_404() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<round::Model>::new()])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/votes")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"round_reference":"round_999_zzzzzzzz","participant_reference":"business_5_aaaaaaaa"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "ROUND_NOT_FOUND");
}

#[tokio::test]
async fn test_submit_vote_outside_round_is_400() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_round(vec![7])]])
            .append_query_results([[create_test_entry(5, "business_5_aaaaaaaa")]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/votes")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"round_reference":"round_1_cccccccc","participant_reference":"business_5_aaaaaaaa"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "PARTICIPANT_NOT_IN_ROUND");
}

#[tokio::test]
async fn test_submit_vote_blank_reference_is_rejected() {
    let app = create_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/votes")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"round_reference":"","participant_reference":"business_5_aaaaaaaa"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

/// Seed standings where entry 5 leads on votes but entry 7 voted most recently.
fn standings_db() -> DatabaseConnection {
    let now = Utc::now();
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[create_test_round(vec![5, 7])]])
        .append_query_results([[
            create_test_entry(5, "business_5_aaaaaaaa"),
            create_test_entry(7, "business_7_bbbbbbbb"),
        ]])
        .append_query_results([[
            vote_row("business_5_aaaaaaaa", 5, now - Duration::hours(2)),
            vote_row("business_7_bbbbbbbb", 3, now - Duration::hours(1)),
        ]])
        .into_connection()
}

#[tokio::test]
async fn test_round_totals_defaults_to_recent_order() {
    let app = create_router(standings_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rounds/round_1_cccccccc/totals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["round_reference"], "round_1_cccccccc");
    assert_eq!(json["results"][0]["entry_id"], 7);
    assert_eq!(json["results"][1]["entry_id"], 5);
    assert_eq!(json["results"][1]["rank"], 1);
}

#[tokio::test]
async fn test_round_totals_sorts_by_highest() {
    let app = create_router(standings_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rounds/round_1_cccccccc/totals?sort=highest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["results"][0]["entry_id"], 5);
    assert_eq!(json["results"][0]["votes"], 5);
    assert_eq!(json["results"][1]["entry_id"], 7);
}

#[tokio::test]
async fn test_round_totals_unknown_sort_falls_back_to_highest() {
    let app = create_router(standings_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rounds/round_1_cccccccc/totals?sort=banana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["results"][0]["entry_id"], 5);
}

#[tokio::test]
async fn test_round_totals_unknown_round_is_404() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<round::Model>::new()])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rounds/round_999_zzzzzzzz/totals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "ROUND_NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_route_is_structured_404() {
    let app = create_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no-such-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_requires_editor_token() {
    let app = create_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_admin_rejects_wrong_token() {
    let app = create_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds")
                .header("Authorization", "Bearer not-the-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_overview_reports_schedule_status() {
    let now = Utc::now();
    let mut active = create_test_round(vec![5, 7]);
    active.starts_at = Some((now - Duration::days(1)).into());
    active.ends_at = Some((now + Duration::days(1)).into());

    let mut unscheduled = create_test_round(vec![]);
    unscheduled.id = 2;
    unscheduled.title = "Best Brunch".to_string();

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[active, unscheduled]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["schedule_status"], "active");
    assert_eq!(json[0]["participant_count"], 2);
    assert_eq!(json[1]["schedule_status"], "unscheduled");
}

#[tokio::test]
async fn test_admin_get_round() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_round(vec![5])]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds/1")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["participant_ids"], serde_json::json!([5]));
}

#[tokio::test]
async fn test_admin_create_round_assigns_reference() {
    let inserted = round::Model {
        reference: None,
        participant_ids: IdList::default(),
        ..create_test_round(vec![])
    };
    let saved = create_test_round(vec![5, 7]);

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inserted]])
            .append_query_results([[saved]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"title":"Best Diner","stage":"custom","manual_entry_ids":[5,7]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["reference"], "round_1_cccccccc");
    assert_eq!(json["participant_ids"], serde_json::json!([5, 7]));
}

#[tokio::test]
async fn test_admin_round_blank_title_is_rejected() {
    let app = create_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"title":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_end_round_before_start_reports_notice() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_round(vec![5])]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds/1/end")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["outcome"], "not_started");
    assert_eq!(json["notice"], "Round has not started yet.");
}

#[tokio::test]
async fn test_admin_end_round_freezes_results() {
    let mut running = create_test_round(vec![5]);
    running.starts_at = Some((Utc::now() - Duration::days(3) + Duration::hours(1)).into());

    let mut ended = create_test_round(vec![5]);
    ended.duration_days = 3;
    ended.ends_at = Some(Utc::now().into());

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[running]])
            .append_query_results([[create_test_entry(5, "business_5_aaaaaaaa")]])
            .append_query_results([[vote_row("business_5_aaaaaaaa", 4, Utc::now())]])
            .append_query_results([[ended]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds/1/end")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["outcome"], "ended");
    assert_eq!(json["duration_days"], 3);
    assert_eq!(json["notice"], "Voting round ended.");
}

#[tokio::test]
async fn test_admin_bulk_end_counts_failures() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_round(vec![5])]])
            .append_query_results([Vec::<round::Model>::new()])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds/bulk")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"action":"end_now","round_ids":[1,2]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["succeeded"], 0);
    assert_eq!(json["failed"], 2);
}

#[tokio::test]
async fn test_admin_bulk_archive_succeeds() {
    let mut archived = create_test_round(vec![5]);
    archived.status = ContentStatus::Draft;

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_round(vec![5])]])
            .append_query_results([[archived]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds/bulk")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"action":"archive","round_ids":[1]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["succeeded"], 1);
    assert_eq!(json["failed"], 0);
}

#[tokio::test]
async fn test_admin_refresh_recomputes_participants() {
    // Custom round whose manual list resolves to [5]; refresh overwrites
    // the cached list and returns display details.
    let mut stale = create_test_round(vec![]);
    stale.manual_entry_ids = IdList::from(vec![5]);

    let mut refreshed = create_test_round(vec![5]);
    refreshed.manual_entry_ids = IdList::from(vec![5]);

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stale]])
            .append_query_results([[refreshed]])
            .append_query_results([[create_test_entry(5, "business_5_aaaaaaaa")]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/rounds/1/refresh")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["round_id"], 1);
    assert_eq!(json["participants"], serde_json::json!([5]));
    assert_eq!(json["details"][0]["title"], "Entry 5");
    assert_eq!(json["details"][0]["kind"], "business");
}

#[tokio::test]
async fn test_admin_create_entry_mints_reference() {
    let inserted = entry::Model {
        reference: None,
        ..create_test_entry(5, "business_5_aaaaaaaa")
    };
    let saved = create_test_entry(5, "business_5_aaaaaaaa");

    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inserted]])
            .append_query_results([[saved]])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/entries")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"title":"Joe's Diner","kind":"business"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["reference"], "business_5_aaaaaaaa");
    assert_eq!(json["kind"], "business");
}

#[tokio::test]
async fn test_admin_entry_unknown_category_is_rejected() {
    let app = create_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<ovation_db::entities::category::Model>::new()])
            .into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/entries")
                .method("POST")
                .header("Authorization", format!("Bearer {EDITOR_TOKEN}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"title":"Joe's Diner","kind":"business","category_ids":[99]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}
