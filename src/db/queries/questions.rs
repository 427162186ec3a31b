use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

const COLUMNS: &str = "id, question, answer, category, difficulty";

pub async fn get_all_questions<'e>(executor: impl SqliteExecutor<'e>) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions ORDER BY id"))
        .fetch_all(executor)
        .await
}

pub async fn count_questions<'e>(executor: impl SqliteExecutor<'e>) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(executor)
        .await
}

pub async fn get_questions_page<'e>(
    executor: impl SqliteExecutor<'e>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions ORDER BY id LIMIT ?1 OFFSET ?2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn get_question<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE questions.id = ?1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_questions_for_category<'e>(
    executor: impl SqliteExecutor<'e>,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE questions.category = ?1 ORDER BY id"
    ))
    .bind(category)
    .fetch_all(executor)
    .await
}

/// Case-insensitive substring match on the question text. Folding happens in
/// Rust because SQLite's `LIKE` only ignores case for ASCII.
pub async fn search_questions<'e>(
    executor: impl SqliteExecutor<'e>,
    term: &str,
) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let questions = get_all_questions(executor).await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect())
}

pub async fn create_question<'e>(
    executor: impl SqliteExecutor<'e>,
    question: &str,
    answer: &str,
    category: i64,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(executor)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of deleted rows.
pub async fn delete_question<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Picks a question not in `previous`, optionally limited to one category.
/// Without `randomize` the lowest eligible id wins.
pub async fn next_quiz_question<'e>(
    executor: impl SqliteExecutor<'e>,
    previous: &[i64],
    category: Option<i64>,
    randomize: bool,
) -> sqlx::Result<Option<Question>> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM questions WHERE 1 = 1"));
    if let Some(category) = category {
        query.push(" AND questions.category = ").push_bind(category);
    }
    if !previous.is_empty() {
        // one bind for the whole list, whatever its length
        let previous = serde_json::to_string(previous)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        query
            .push(" AND questions.id NOT IN (SELECT value FROM json_each(")
            .push_bind(previous)
            .push("))");
    }
    query.push(if randomize {
        " ORDER BY RANDOM()"
    } else {
        " ORDER BY id"
    });
    query.push(" LIMIT 1");

    query
        .build_query_as::<Question>()
        .fetch_optional(executor)
        .await
}

/// Inserts questions keeping their ids, overwriting the ones that already exist.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
