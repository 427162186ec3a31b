use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Category id to display label, ordered by id.
pub type CategoryMap = BTreeMap<i64, String>;

pub fn to_category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

pub async fn get_all_categories<'e>(executor: impl SqliteExecutor<'e>) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_category<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<Category> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Inserts categories keeping their ids, relabeling the ones that already exist.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, type) VALUES (?1, ?2)
            ON CONFLICT (id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn seeded_categories_are_listed_in_id_order() {
        let pool = test_pool().await;
        let categories = get_all_categories(&pool).await.unwrap();
        let labels: Vec<&str> = categories.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(
            labels,
            ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        );
    }

    #[tokio::test]
    async fn map_is_keyed_by_id() {
        let pool = test_pool().await;
        let map = to_category_map(get_all_categories(&pool).await.unwrap());
        assert_eq!(map.len(), 6);
        assert_eq!(map.get(&3).map(String::as_str), Some("Geography"));

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["1"], "Science");
    }

    #[tokio::test]
    async fn import_relabels_existing_and_adds_new() {
        let pool = test_pool().await;
        import_categories(
            &pool,
            vec![
                Category {
                    id: 2,
                    kind: "Fine Art".to_owned(),
                },
                Category {
                    id: 10,
                    kind: "Music".to_owned(),
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!(get_category(&pool, 2).await.unwrap().kind, "Fine Art");
        assert_eq!(get_category(&pool, 10).await.unwrap().kind, "Music");
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn missing_category_is_row_not_found() {
        let pool = test_pool().await;
        let err = get_category(&pool, 99).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
    }
}
