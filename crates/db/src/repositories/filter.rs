//! WHERE-clause collector shared by the list queries.
//!
//! Conditions are recorded once and replayed onto two
//! [`QueryBuilder`]s, the `COUNT(*)` query and the page query, so both
//! always filter the same rows. Each condition is a SQL prefix such as
//! `"account_id = "` followed by one bound value.

use chrono::NaiveDate;
use fintrack_core::pagination::PageRequest;
use fintrack_core::types::Timestamp;
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

#[derive(Debug, Clone)]
pub(crate) enum SqlValue {
    Text(String),
    Number(Decimal),
    Time(Timestamp),
    Date(NaiveDate),
}

#[derive(Debug, Default)]
pub(crate) struct WhereBuilder {
    conditions: Vec<(String, SqlValue)>,
}

impl WhereBuilder {
    /// Add `prefix` followed by a bind of `value`.
    pub fn push(&mut self, prefix: &str, value: SqlValue) {
        self.conditions.push((prefix.to_string(), value));
    }

    pub fn push_text(&mut self, prefix: &str, value: &Option<String>) {
        if let Some(v) = value {
            self.push(prefix, SqlValue::Text(v.clone()));
        }
    }

    /// Case-insensitive substring match on `column`.
    pub fn push_contains(&mut self, column: &str, value: &Option<String>) {
        if let Some(v) = value {
            self.push(
                &format!("{column} ILIKE "),
                SqlValue::Text(format!("%{}%", escape_like(v))),
            );
        }
    }

    pub fn push_time(&mut self, prefix: &str, value: &Option<Timestamp>) {
        if let Some(v) = value {
            self.push(prefix, SqlValue::Time(*v));
        }
    }

    pub fn push_date(&mut self, prefix: &str, value: &Option<NaiveDate>) {
        if let Some(v) = value {
            self.push(prefix, SqlValue::Date(*v));
        }
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        for (i, (prefix, value)) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(prefix);
            match value.clone() {
                SqlValue::Text(v) => qb.push_bind(v),
                SqlValue::Number(v) => qb.push_bind(v),
                SqlValue::Time(v) => qb.push_bind(v),
                SqlValue::Date(v) => qb.push_bind(v),
            };
        }
    }

    /// `SELECT COUNT(*) FROM {table}` with the collected conditions.
    pub fn count_query(&self, table: &str) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
        self.push_where(&mut qb);
        qb
    }

    /// One page of `columns` from `table`, ordered by creation time with the
    /// id as tie-breaker.
    pub fn page_query(
        &self,
        columns: &str,
        table: &str,
        page: &PageRequest,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {columns} FROM {table}"));
        self.push_where(&mut qb);
        qb.push(format!(
            " ORDER BY created_at {0}, id {0} LIMIT ",
            page.sort.as_sql()
        ));
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());
        qb
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
