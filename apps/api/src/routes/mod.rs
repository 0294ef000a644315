pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ad hoc scoring of caller-supplied records
        .route("/api/v1/match", post(handlers::handle_match))
        .route(
            "/api/v1/match/breakdown",
            post(handlers::handle_match_breakdown),
        )
        .route("/api/v1/match/score", post(handlers::handle_match_score))
        .route("/api/v1/match/rank", post(handlers::handle_rank))
        // Stored records
        .route(
            "/api/v1/candidates/:id/recommended-jobs",
            get(handlers::handle_recommended_jobs),
        )
        .route(
            "/api/v1/candidates/:id/jobs/:job_id/match",
            get(handlers::handle_stored_match),
        )
        .route(
            "/api/v1/jobs/:id/recommended-candidates",
            get(handlers::handle_recommended_candidates),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::matching::profile::{RawCandidateProfile, RawJobPosting};
    use crate::matching::store::memory::InMemoryProfileStore;

    const CANDIDATE_ID: Uuid = Uuid::from_u128(1);
    const JOB_ID: Uuid = Uuid::from_u128(2);

    fn candidate_json() -> Value {
        json!({
            "specialization": "אבטחת מידע",
            "experience": [{"title": "SOC", "years": 2}],
            "education": ["B.Sc"],
            "availability": "מיידית"
        })
    }

    fn job_json() -> Value {
        json!({
            "title": "מומחה/ית אבטחת מידע",
            "start_date": "flexible"
        })
    }

    fn app() -> Router {
        let mut candidate: RawCandidateProfile = serde_json::from_value(candidate_json()).unwrap();
        candidate.id = Some(CANDIDATE_ID);
        let mut job: RawJobPosting = serde_json::from_value(job_json()).unwrap();
        job.id = Some(JOB_ID);

        let store = InMemoryProfileStore {
            candidates: vec![candidate],
            jobs: vec![job],
        };
        build_router(AppState {
            store: Arc::new(store),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["visibility_threshold"], 60);
    }

    #[tokio::test]
    async fn test_match_returns_breakdown() {
        let (status, body) = send(post_json(
            "/api/v1/match",
            json!({"candidate": candidate_json(), "job": job_json()}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_score"], 51);
        assert_eq!(body["breakdown"]["specialization"]["status"], "match");
        assert_eq!(body["breakdown"]["availability"]["status"], "match");
    }

    #[tokio::test]
    async fn test_match_without_candidate_is_rejected() {
        let (status, body) = send(post_json("/api/v1/match", json!({"job": job_json()}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_MATCH_INPUT");
    }

    #[tokio::test]
    async fn test_breakdown_only() {
        let (status, body) = send(post_json(
            "/api/v1/match/breakdown",
            json!({
                "candidate": {"availability": "one_month"},
                "job": {"start_date": "1_2_months"}
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["availability"]["status"], "mismatch");
        assert_eq!(body["location"]["status"], "match");
        assert!(body.get("total_score").is_none());
    }

    #[tokio::test]
    async fn test_breakdown_without_job_is_rejected() {
        let (status, _) = send(post_json(
            "/api/v1/match/breakdown",
            json!({"candidate": candidate_json()}),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_score_reports_visibility() {
        let (status, body) = send(post_json(
            "/api/v1/match/score",
            json!({"candidate": candidate_json(), "job": job_json()}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_score"], 51);
        assert_eq!(body["visible"], false);
    }

    #[tokio::test]
    async fn test_rank_hides_jobs_below_threshold() {
        let (status, body) = send(post_json(
            "/api/v1/match/rank",
            json!({"candidate": candidate_json(), "jobs": [job_json(), {"title": "Chef"}]}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["evaluated"], 2);
        assert_eq!(body["hidden"], 2);
        assert_eq!(body["jobs"], json!([]));
    }

    #[tokio::test]
    async fn test_recommended_jobs_for_stored_candidate() {
        let (status, body) =
            send(get_request(&format!("/api/v1/candidates/{CANDIDATE_ID}/recommended-jobs"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["evaluated"], 1);
    }

    #[tokio::test]
    async fn test_stored_match_includes_cache_key() {
        let (status, body) = send(get_request(&format!(
            "/api/v1/candidates/{CANDIDATE_ID}/jobs/{JOB_ID}/match"
        )))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_score"], 51);
        assert_eq!(
            body["cache_key"],
            format!("match:{CANDIDATE_ID}@0:{JOB_ID}@0")
        );
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_not_found() {
        let (status, body) = send(get_request(&format!(
            "/api/v1/candidates/{}/recommended-jobs",
            Uuid::from_u128(99)
        )))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_recommended_candidates_for_stored_job() {
        let (status, body) =
            send(get_request(&format!("/api/v1/jobs/{JOB_ID}/recommended-candidates"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["evaluated"], 1);
        assert_eq!(body["hidden"], 1);
    }
}
