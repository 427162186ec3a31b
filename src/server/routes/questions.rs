use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, to_category_map, CategoryMap},
            questions::{self, count_questions, get_questions_page, search_questions},
        },
        Question,
    },
    server::{
        app::AppState,
        deserializers::PageQuery,
        error::{ApiError, ApiJson, ApiResponse},
    },
    settings::Settings,
};

#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    // the frontend sends select values as strings
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: CategoryMap,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    message: &'static str,
    deleted: String,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<Settings>>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let page_size = settings.pagination.page_size;
    let offset = page
        .checked_sub(1)
        .filter(|p| *p >= 0)
        .and_then(|p| p.checked_mul(page_size))
        .ok_or(ApiError::NotFound)?;

    let questions = get_questions_page(&pool, page_size, offset).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = count_questions(&pool).await?;
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: to_category_map(categories),
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    question_id: Result<Path<String>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    // an undecodable segment cannot name a question either
    let Path(question_id) = question_id.map_err(|_| ApiError::NotFound)?;
    let id: i64 = question_id.parse().map_err(|_| ApiError::NotFound)?;

    // rolled back on drop if anything below fails
    let mut tx = pool.begin().await?;
    if questions::get_question(&mut *tx, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    questions::delete_question(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(id, "Question deleted");
    Ok(Json(Deleted {
        success: true,
        message: "deleted",
        deleted: question_id,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    ApiJson(new_question): ApiJson<NewQuestion>,
) -> ApiResponse<Json<Created>> {
    let id = insert_question(&pool, &new_question).await.map_err(|e| {
        tracing::error!("Failed to create question: {e}");
        ApiError::Unprocessable(e.to_string())
    })?;

    tracing::info!(id, "Question created");
    Ok(Json(Created {
        success: true,
        message: "Question created successfully",
    }))
}

async fn insert_question(pool: &SqlitePool, new_question: &NewQuestion) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;
    let id = questions::create_question(
        &mut *tx,
        &new_question.question,
        &new_question.answer,
        new_question.category,
        new_question.difficulty,
    )
    .await?;
    tx.commit().await?;
    Ok(id)
}

async fn search(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<Json<SearchResults>> {
    let questions = search_questions(&pool, &body.search_term).await?;
    Ok(Json(SearchResults {
        success: true,
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
