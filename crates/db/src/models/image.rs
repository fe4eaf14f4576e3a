//! Image entity model and DTOs.

use fintrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table. Each row is paired with one blob whose
/// key is `file_name`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: DbId,
    pub user_id: DbId,
    pub image_url: String,
    pub file_path: String,
    pub file_name: String,
    pub original_file_name: String,
    pub file_extension: String,
    pub size: i64,
    pub readable_size: String,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub user_id: DbId,
    pub image_url: String,
    pub file_path: String,
    pub file_name: String,
    pub original_file_name: String,
    pub file_extension: String,
    pub size: i64,
    pub readable_size: String,
    pub created_by: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    /// Case-insensitive substring match.
    pub original_file_name: Option<String>,
    pub file_extension: Option<String>,
    /// Case-insensitive substring match.
    pub readable_size: Option<String>,
    pub created_by: Option<String>,
    pub from_date: Option<Timestamp>,
    pub to_date: Option<Timestamp>,
}
