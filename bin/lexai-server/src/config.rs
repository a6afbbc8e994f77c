//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for lexai-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set (generation still needs provider
/// credentials in the environment, resolved by the genai client).
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// SQLite (or other) database URL (default: `"sqlite://lexai.db"`).
    /// Any sqlx-compatible connection string works – swap the scheme to
    /// migrate to Postgres (`postgres://…`) or MySQL (`mysql://…`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Model identifier handed to the genai client; the name selects the
    /// provider (default: `"gemini-2.0-flash"`).
    pub model: String,

    /// Anonymous questions allowed before the usage gate caps (default: 3).
    pub question_limit: u32,

    /// Maximum upload size for the extract endpoint, in MiB (default: 20).
    pub max_upload_size_mb: usize,

    /// Serve Swagger UI at `/swagger-ui` (default: true; disable in
    /// production).
    pub enable_swagger: bool,

    /// Comma-separated CORS origin allowlist; unset means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Static bearer-token table, `token:user_id` pairs separated by
    /// commas. Empty means no authenticated users — the verifier is the
    /// seam where a real identity provider plugs in.
    pub auth_tokens: String,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("LEXAI_BIND", "0.0.0.0:3000"),
            database_url: env_or("LEXAI_DATABASE_URL", "sqlite://lexai.db"),
            log_level: env_or("LEXAI_LOG", "info"),
            log_json: std::env::var("LEXAI_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            model: env_or("LEXAI_MODEL", "gemini-2.0-flash"),
            question_limit: parse_env("LEXAI_QUESTION_LIMIT", 3),
            max_upload_size_mb: parse_env("LEXAI_MAX_UPLOAD_SIZE_MB", 20),
            enable_swagger: std::env::var("LEXAI_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            cors_allowed_origins: std::env::var("LEXAI_CORS_ORIGINS").ok(),
            auth_tokens: env_or("LEXAI_AUTH_TOKENS", ""),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
