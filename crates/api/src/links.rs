//! HATEOAS link generation.
//!
//! Route templates live in [`paths`] and are registered by the routers in
//! [`crate::routes`]; [`Endpoint`] names those same templates so every href
//! this module produces points at a route that actually exists.

use axum::http::Method;
use fintrack_core::link::Link;
use fintrack_core::pagination::{PageRequest, PagedList};

/// Route templates shared by the routers and the link builder.
pub mod paths {
    pub const HEALTH: &str = "/health";

    pub const ACCOUNTS: &str = "/api/account";
    pub const ACCOUNT: &str = "/api/account/{id}";

    pub const GOALS: &str = "/api/goal";
    pub const GOAL: &str = "/api/goal/{id}";

    pub const TRANSACTIONS: &str = "/api/transaction";
    pub const TRANSACTION: &str = "/api/transaction/{id}";

    pub const IMAGES: &str = "/api/images";
    pub const IMAGE: &str = "/api/images/{id}";

    pub const BLOBS: &str = "/api/blobs";
    pub const BLOB: &str = "/api/blobs/{blobName}";
    pub const ANTIFORGERY_TOKEN: &str = "/api/blobs/get-anti-forgery-token";

    pub const REGISTER: &str = "/api/auth/register";
    pub const LOGIN: &str = "/api/auth/login";
    pub const REFRESH_TOKEN: &str = "/api/auth/refresh-token";
}

/// Named endpoints that responses link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListAccounts,
    GetAccount,
    UpdateAccount,
    DeleteAccount,
    ListGoals,
    GetGoal,
    UpdateGoal,
    DeleteGoal,
    ListTransactions,
    GetTransaction,
    UpdateTransaction,
    DeleteTransaction,
    ListImages,
    GetImage,
    DeleteImage,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ListAccounts => paths::ACCOUNTS,
            Endpoint::GetAccount | Endpoint::UpdateAccount | Endpoint::DeleteAccount => {
                paths::ACCOUNT
            }
            Endpoint::ListGoals => paths::GOALS,
            Endpoint::GetGoal | Endpoint::UpdateGoal | Endpoint::DeleteGoal => paths::GOAL,
            Endpoint::ListTransactions => paths::TRANSACTIONS,
            Endpoint::GetTransaction
            | Endpoint::UpdateTransaction
            | Endpoint::DeleteTransaction => paths::TRANSACTION,
            Endpoint::ListImages => paths::IMAGES,
            Endpoint::GetImage | Endpoint::DeleteImage => paths::IMAGE,
        }
    }
}

/// Builds absolute hrefs against the public base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fill `{name}` segments of the endpoint's template from `params`;
    /// parameters that match no segment become the query string, in order.
    pub fn generate_link(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        rel: &str,
        method: &Method,
    ) -> Link {
        let mut path = endpoint.path().to_string();
        let mut query = Vec::new();

        for (name, value) in params {
            let segment = format!("{{{name}}}");
            if path.contains(&segment) {
                path = path.replace(&segment, &urlencoding::encode(value));
            } else {
                query.push(format!("{name}={}", urlencoding::encode(value)));
            }
        }

        let mut href = format!("{}{path}", self.base_url);
        if !query.is_empty() {
            href.push('?');
            href.push_str(&query.join("&"));
        }

        Link::new(href, rel, method.as_str())
    }

    /// `self`, update and delete controls for a single resource. Pass `None`
    /// for verbs the resource does not expose.
    pub fn resource_links(
        &self,
        id: &str,
        get: Endpoint,
        update: Option<(Endpoint, &str)>,
        delete: Option<(Endpoint, &str)>,
    ) -> Vec<Link> {
        let params = [("id", id.to_string())];
        let mut links = vec![self.generate_link(get, &params, "self", &Method::GET)];
        if let Some((endpoint, rel)) = update {
            links.push(self.generate_link(endpoint, &params, rel, &Method::PUT));
        }
        if let Some((endpoint, rel)) = delete {
            links.push(self.generate_link(endpoint, &params, rel, &Method::DELETE));
        }
        links
    }

    /// Page navigation for a list. `filters` are carried into every href so
    /// following a link keeps the same result set.
    ///
    /// Empty pages get no links at all; otherwise `self` is always present,
    /// `previous-page` only after the first page and `next-page` only before
    /// the last.
    pub fn page_links<T>(
        &self,
        endpoint: Endpoint,
        list: &PagedList<T>,
        request: &PageRequest,
        filters: &[(&'static str, String)],
    ) -> Vec<Link> {
        if list.items.is_empty() {
            return Vec::new();
        }

        let link_for = |page: i64, rel: &str| {
            let mut params: Vec<(&str, String)> = vec![
                ("page", page.to_string()),
                ("pageSize", request.page_size.to_string()),
                ("sortDir", request.sort.as_query().to_string()),
            ];
            params.extend(filters.iter().map(|(k, v)| (*k, v.clone())));
            self.generate_link(endpoint, &params, rel, &Method::GET)
        };

        let mut links = vec![link_for(list.page, "self")];
        if list.has_previous() {
            links.push(link_for(list.page - 1, "previous-page"));
        }
        if list.has_next() {
            links.push(link_for(list.page + 1, "next-page"));
        }
        links
    }
}
