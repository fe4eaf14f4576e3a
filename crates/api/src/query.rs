//! Query-string parameters of the list endpoints.
//!
//! Each struct carries the paging fields (`page`, `pageSize`, `sortDir`)
//! next to its entity filters, and converts into the repository filter, the
//! [`PageRequest`], and the `(name, value)` pairs that page links repeat.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fintrack_core::money::{AccountType, TransactionType};
use fintrack_core::pagination::PageRequest;
use fintrack_core::types::{DbId, Timestamp};
use fintrack_db::models::account::AccountFilter;
use fintrack_db::models::goal::GoalFilter;
use fintrack_db::models::image::ImageFilter;
use fintrack_db::models::transaction::TransactionFilter;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

/// Reads an RFC 3339 timestamp, a zone-less `YYYY-MM-DDTHH:MM:SS` (taken as
/// UTC), or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

fn timestamp_bound<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date or date-time '{raw}'"))),
    }
}

/// Collects the populated filters as link parameters.
#[derive(Default)]
struct LinkParams(Vec<(&'static str, String)>);

impl LinkParams {
    fn text(mut self, name: &'static str, value: &Option<String>) -> Self {
        if let Some(v) = value {
            self.0.push((name, v.clone()));
        }
        self
    }

    fn display<T: ToString>(mut self, name: &'static str, value: &Option<T>) -> Self {
        if let Some(v) = value {
            self.0.push((name, v.to_string()));
        }
        self
    }

    fn time(mut self, name: &'static str, value: &Option<Timestamp>) -> Self {
        if let Some(v) = value {
            self.0.push((name, v.to_rfc3339()));
        }
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_dir: Option<String>,
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub from_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub to_date: Option<Timestamp>,
}

impl AccountListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size, self.sort_dir.as_deref())
    }

    pub fn filter(&self) -> AccountFilter {
        AccountFilter {
            name: self.name.clone(),
            account_type: self.account_type,
            created_by: self.created_by.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        LinkParams::default()
            .text("name", &self.name)
            .display("accountType", &self.account_type)
            .text("createdBy", &self.created_by)
            .time("fromDate", &self.from_date)
            .time("toDate", &self.to_date)
            .0
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_dir: Option<String>,
    pub user_id: Option<DbId>,
    pub name: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub from_target_date: Option<NaiveDate>,
    pub to_target_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub from_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub to_date: Option<Timestamp>,
}

impl GoalListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size, self.sort_dir.as_deref())
    }

    pub fn filter(&self) -> GoalFilter {
        GoalFilter {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            target_date: self.target_date,
            from_target_date: self.from_target_date,
            to_target_date: self.to_target_date,
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        LinkParams::default()
            .text("userId", &self.user_id)
            .text("name", &self.name)
            .display("targetDate", &self.target_date)
            .display("fromTargetDate", &self.from_target_date)
            .display("toTargetDate", &self.to_target_date)
            .time("fromDate", &self.from_date)
            .time("toDate", &self.to_date)
            .0
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_dir: Option<String>,
    pub account_id: Option<DbId>,
    pub description: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub from_transaction_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub to_transaction_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub from_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub to_date: Option<Timestamp>,
}

impl TransactionListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size, self.sort_dir.as_deref())
    }

    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            account_id: self.account_id.clone(),
            description: self.description.clone(),
            transaction_type: self.transaction_type,
            amount: self.amount,
            from_transaction_date: self.from_transaction_date,
            to_transaction_date: self.to_transaction_date,
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        LinkParams::default()
            .text("accountId", &self.account_id)
            .text("description", &self.description)
            .display("transactionType", &self.transaction_type)
            .display("amount", &self.amount)
            .time("fromTransactionDate", &self.from_transaction_date)
            .time("toTransactionDate", &self.to_transaction_date)
            .time("fromDate", &self.from_date)
            .time("toDate", &self.to_date)
            .0
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_dir: Option<String>,
    pub original_file_name: Option<String>,
    pub file_extension: Option<String>,
    pub readable_size: Option<String>,
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub from_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp_bound")]
    pub to_date: Option<Timestamp>,
}

impl ImageListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size, self.sort_dir.as_deref())
    }

    pub fn filter(&self) -> ImageFilter {
        ImageFilter {
            original_file_name: self.original_file_name.clone(),
            file_extension: self.file_extension.clone(),
            readable_size: self.readable_size.clone(),
            created_by: self.created_by.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        LinkParams::default()
            .text("originalFileName", &self.original_file_name)
            .text("fileExtension", &self.file_extension)
            .text("readableSize", &self.readable_size)
            .text("createdBy", &self.created_by)
            .time("fromDate", &self.from_date)
            .time("toDate", &self.to_date)
            .0
    }
}

#[cfg(test)]
mod tests {
    use fintrack_core::pagination::SortDirection;

    use super::*;

    #[test]
    fn only_populated_filters_are_linked() {
        let params = AccountListParams {
            name: Some("main".into()),
            account_type: Some(AccountType::Savings),
            ..Default::default()
        };
        assert_eq!(
            params.link_filters(),
            vec![
                ("name", "main".to_string()),
                ("accountType", "Savings".to_string())
            ]
        );
    }

    #[test]
    fn timestamp_bounds_accept_dates_and_date_times() {
        let midnight = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(parse_timestamp("2025-01-01"), Some(midnight));
        assert_eq!(parse_timestamp("2025-01-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-01-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_timestamp("01/01/2025"), None);
    }

    #[test]
    fn page_request_reads_paging_fields() {
        let params = TransactionListParams {
            page: Some(2),
            page_size: Some(25),
            sort_dir: Some("desc".into()),
            ..Default::default()
        };
        let request = params.page_request();
        assert_eq!(request.page, 2);
        assert_eq!(request.page_size, 25);
        assert_eq!(request.sort, SortDirection::Desc);
    }
}
