use crate::auth::jwt::JwtConfig;

/// Which blob backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBackend {
    Memory,
    S3,
}

/// Blob storage settings.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    pub backend: BlobBackend,
    /// Bucket holding uploaded images (S3 backend only).
    pub bucket: String,
    /// Base URL that blob keys are appended to when building public URLs.
    pub public_base_url: String,
}

/// Credentials for the administrator seeded at startup.
#[derive(Debug, Clone)]
pub struct DefaultAdminConfig {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Absolute base used for every HATEOAS href.
    pub public_base_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// JWT token configuration (secret, issuer, audience, expiry durations).
    pub jwt: JwtConfig,
    pub blob: BlobConfig,
    pub default_admin: Option<DefaultAdminConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `HOST`                   | `0.0.0.0`                        |
    /// | `PORT`                   | `3000`                           |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:{PORT}`        |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                             |
    /// | `DATABASE_URL`           | unset (in-memory store)          |
    /// | `BLOB_BACKEND`           | `memory` (`s3` for S3)           |
    /// | `S3_BUCKET_NAME`         | `fintrack-images`                |
    /// | `BLOB_PUBLIC_BASE_URL`   | see below                        |
    /// | `DEFAULT_ADMIN_*`        | unset (no seeding)               |
    ///
    /// `BLOB_PUBLIC_BASE_URL` defaults to the bucket's virtual-hosted S3 URL
    /// for the S3 backend and to `{PUBLIC_BASE_URL}/api/blobs` otherwise.
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let jwt = JwtConfig::from_env();
        let blob = BlobConfig::from_env(&public_base_url);
        let default_admin = DefaultAdminConfig::from_env();

        Self {
            host,
            port,
            public_base_url,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt,
            blob,
            default_admin,
        }
    }
}

impl BlobConfig {
    fn from_env(public_base_url: &str) -> Self {
        let backend = match std::env::var("BLOB_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => BlobBackend::Memory,
            "s3" => BlobBackend::S3,
            other => panic!("BLOB_BACKEND must be 'memory' or 's3', got '{other}'"),
        };

        let bucket = std::env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "fintrack-images".into());

        let public_base_url = std::env::var("BLOB_PUBLIC_BASE_URL").unwrap_or_else(|_| match backend {
            BlobBackend::S3 => format!("https://{bucket}.s3.amazonaws.com"),
            BlobBackend::Memory => {
                format!("{}/api/blobs", public_base_url.trim_end_matches('/'))
            }
        });

        Self {
            backend,
            bucket,
            public_base_url,
        }
    }
}

impl DefaultAdminConfig {
    /// Present only when both `DEFAULT_ADMIN_EMAIL` and
    /// `DEFAULT_ADMIN_PASSWORD` are set.
    fn from_env() -> Option<Self> {
        let email = std::env::var("DEFAULT_ADMIN_EMAIL").ok()?;
        let password = std::env::var("DEFAULT_ADMIN_PASSWORD").ok()?;
        Some(Self {
            email,
            password,
            first_name: std::env::var("DEFAULT_ADMIN_FIRST_NAME")
                .unwrap_or_else(|_| "System".into()),
            last_name: std::env::var("DEFAULT_ADMIN_LAST_NAME")
                .unwrap_or_else(|_| "Administrator".into()),
        })
    }
}
