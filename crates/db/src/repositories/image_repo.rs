//! Repository for the `images` table.

use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::pagination::{Page, PageRequest};
use fintrack_core::types::new_id;

use super::filter::WhereBuilder;
use super::ImageRepository;
use crate::error::RepoResult;
use crate::models::image::{Image, ImageFilter, NewImage};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, image_url, file_path, file_name, original_file_name, \
                       file_extension, size, readable_size, \
                       created_by, created_at, updated_by, updated_at";

/// PostgreSQL implementation of [`ImageRepository`].
#[derive(Clone)]
pub struct PgImageRepo {
    pool: DbPool,
}

impl PgImageRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepo {
    async fn create(&self, input: &NewImage) -> RepoResult<Option<Image>> {
        let query = format!(
            "INSERT INTO images
                (id, user_id, image_url, file_path, file_name, original_file_name,
                 file_extension, size, readable_size, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT ON CONSTRAINT uq_images_file_name DO NOTHING
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Image>(&query)
            .bind(new_id())
            .bind(&input.user_id)
            .bind(&input.image_url)
            .bind(&input.file_path)
            .bind(&input.file_name)
            .bind(&input.original_file_name)
            .bind(&input.file_extension)
            .bind(input.size)
            .bind(&input.readable_size)
            .bind(&input.created_by)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Image>> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        let row = sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_file_name(&self, file_name: &str) -> RepoResult<Option<Image>> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE file_name = $1");
        let row = sqlx::query_as::<_, Image>(&query)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ImageFilter, page: &PageRequest) -> RepoResult<Page<Image>> {
        let mut w = WhereBuilder::default();
        w.push_contains("original_file_name", &filter.original_file_name);
        w.push_text("file_extension = ", &filter.file_extension);
        w.push_contains("readable_size", &filter.readable_size);
        w.push_text("created_by = ", &filter.created_by);
        w.push_time("created_at >= ", &filter.from_date);
        w.push_time("created_at <= ", &filter.to_date);

        let total_count: i64 = w
            .count_query("images")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let items = w
            .page_query(COLUMNS, "images", page)
            .build_query_as::<Image>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page { items, total_count })
    }
}
