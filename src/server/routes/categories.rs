use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, to_category_map, CategoryMap},
            questions::get_questions_for_category,
        },
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
    },
};

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    current_category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesList {
        success: true,
        categories: to_category_map(categories),
    }))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<CategoryQuestions>> {
    // a non-numeric id cannot match any category
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let questions = get_questions_for_category(&pool, id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        current_category: id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
