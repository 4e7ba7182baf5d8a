use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/questions", get(handlers::get_questions))
        .route("/api/assessment/submit", post(handlers::submit_assessment))
        .route("/api/assessment/history", get(handlers::assessment_history))
        .route("/api/assessment/latest", get(handlers::latest_assessment))
        .route("/api/streaks", get(handlers::get_streak))
        .route("/api/streaks/increment", post(handlers::increment_streak))
        .route("/api/streaks/reset", post(handlers::reset_streak))
        .route(
            "/api/mood-logs",
            post(handlers::create_mood_log).get(handlers::mood_history),
        )
        .route("/api/mood-logs/stats", get(handlers::mood_stats))
        .with_state(state)
}
