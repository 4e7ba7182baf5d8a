use crate::errors::AppError;
use crate::models::{
    AssessmentRecord, MoodLog, MoodLogRequest, MoodSummary, QuestionsResponse, StreakResponse,
    StreakStatusResponse, SubmitAssessmentRequest, UserQuery, UserRequest,
};
use crate::mood::{self, mood_summary_at};
use crate::questionnaire::LikertLabel;
use crate::scoring;
use crate::state::AppState;
use crate::storage::persist_data;
use crate::streak;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};

pub async fn get_questions(State(state): State<AppState>) -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        scale: LikertLabel::ALL.iter().map(|label| label.as_str()).collect(),
        questions: state.instrument.questions().to_vec(),
    })
}

pub async fn submit_assessment(
    State(state): State<AppState>,
    Json(payload): Json<SubmitAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentRecord>), AppError> {
    let answers = scoring::encode_answers(&state.instrument, &payload.answers)?;
    let score = scoring::evaluate(&state.instrument, &answers)?;
    let record = AssessmentRecord {
        total: score.total,
        level: score.level,
        answers,
        created_at: Utc::now(),
    };

    let mut data = state.data.lock().await;
    data.user_mut(&payload.user).assessments.push(record.clone());
    persist_data(&state.data_path, &data).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn assessment_history(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<AssessmentRecord>>, AppError> {
    let data = state.data.lock().await;
    let mut records = data
        .user(&query.user)
        .map(|record| record.assessments.clone())
        .unwrap_or_default();
    records.reverse();
    Ok(Json(records))
}

pub async fn latest_assessment(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<AssessmentRecord>, AppError> {
    let data = state.data.lock().await;
    let latest = data
        .user(&query.user)
        .and_then(|record| record.assessments.last().cloned())
        .ok_or_else(|| AppError::not_found("no assessments found"))?;
    Ok(Json(latest))
}

pub async fn increment_streak(
    State(state): State<AppState>,
    Json(payload): Json<UserRequest>,
) -> Result<Json<StreakResponse>, AppError> {
    let today = today();
    let mut data = state.data.lock().await;
    let updated = {
        let record = data.user_mut(&payload.user);
        let updated = streak::record_activity(&record.streak, today)?;
        record.streak = updated.clone();
        updated
    };

    persist_data(&state.data_path, &data).await?;

    Ok(Json(StreakResponse::from(updated)))
}

pub async fn get_streak(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<StreakStatusResponse>, AppError> {
    let today = today();
    let data = state.data.lock().await;
    let stored = data
        .user(&query.user)
        .map(|record| record.streak.clone())
        .unwrap_or_default();
    let effective = streak::effective_streak(&stored, today)?;

    Ok(Json(StreakStatusResponse {
        current_streak: effective,
        longest_streak: stored.longest_streak,
        last_activity_date: stored.last_activity_date,
        lapsed: stored.current_streak > 0 && effective == 0,
    }))
}

pub async fn reset_streak(
    State(state): State<AppState>,
    Json(payload): Json<UserRequest>,
) -> Result<Json<StreakResponse>, AppError> {
    let mut data = state.data.lock().await;
    let cleared = {
        let record = data.user_mut(&payload.user);
        let cleared = streak::reset(&record.streak);
        record.streak = cleared.clone();
        cleared
    };

    persist_data(&state.data_path, &data).await?;

    Ok(Json(StreakResponse::from(cleared)))
}

pub async fn create_mood_log(
    State(state): State<AppState>,
    Json(payload): Json<MoodLogRequest>,
) -> Result<(StatusCode, Json<MoodLog>), AppError> {
    let intensity = payload.intensity.unwrap_or(mood::DEFAULT_INTENSITY);
    if !mood::INTENSITY_RANGE.contains(&intensity) {
        return Err(AppError::bad_request("intensity must be between 1 and 10"));
    }

    let log = MoodLog {
        mood: payload.mood,
        intensity,
        note: payload.note,
        created_at: Utc::now(),
    };

    let mut data = state.data.lock().await;
    data.user_mut(&payload.user).mood_logs.push(log.clone());
    persist_data(&state.data_path, &data).await?;

    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn mood_history(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<MoodLog>>, AppError> {
    let data = state.data.lock().await;
    let mut logs = data
        .user(&query.user)
        .map(|record| record.mood_logs.clone())
        .unwrap_or_default();
    logs.reverse();
    Ok(Json(logs))
}

pub async fn mood_stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<MoodSummary>, AppError> {
    let today = today();
    let data = state.data.lock().await;
    let logs = data
        .user(&query.user)
        .map(|record| record.mood_logs.clone())
        .unwrap_or_default();
    Ok(Json(mood_summary_at(today, &logs)))
}

// The one place the clock is read; day boundaries are 00:00 UTC.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}
