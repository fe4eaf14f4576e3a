/// Primary keys are GUID strings generated by the application.
pub type DbId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::new_v4().to_string()
}
