use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::next_quiz_question, Question},
    server::{
        app::AppState,
        error::{ApiError, ApiJson, ApiResponse},
    },
    settings::Settings,
    telemetry::QUIZ_QUESTIONS_CNTR,
};

/// Category id the frontend uses for "all categories".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum QuizResponse {
    Next { success: bool, question: Question },
    Exhausted { message: &'static str },
}

async fn next_question(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<Settings>>,
    request: Result<ApiJson<QuizRequest>, ApiError>,
) -> ApiResponse<Json<QuizResponse>> {
    // every malformed quiz request is a 400, unlike the other json endpoints
    let ApiJson(request) = request.map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let category = match request.quiz_category.id {
        ALL_CATEGORIES => None,
        id => Some(id),
    };
    let question = next_quiz_question(
        &pool,
        &request.previous_questions,
        category,
        settings.quiz.randomize,
    )
    .await?;

    let response = match question {
        Some(question) => {
            QUIZ_QUESTIONS_CNTR
                .with_label_values(&[&question.category.to_string()])
                .inc();
            QuizResponse::Next {
                success: true,
                question,
            }
        }
        None => QuizResponse::Exhausted {
            message: "no more questions.",
        },
    };
    Ok(Json(response))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
