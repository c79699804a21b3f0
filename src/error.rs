use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Nova X.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum NovaError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Completion provider ─────────────────────────────────────────────
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),

    // ── News lookup ─────────────────────────────────────────────────────
    #[error("news: {0}")]
    News(#[from] NewsError),

    // ── Attachment text extraction ──────────────────────────────────────
    #[error("extract: {0}")]
    Extract(#[from] ExtractError),

    // ── Gateway transport ───────────────────────────────────────────────
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Upstream API errors ────────────────────────────────────────────────────

/// Errors talking to a hosted HTTP API (completion or news).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API error: {message}")]
    Request { provider: String, message: String },

    #[error("{provider} returned an unparseable body: {message}")]
    BadBody { provider: String, message: String },

    #[error("{provider} API key not set. Set {env_var} or edit config.toml.")]
    MissingKey { provider: String, env_var: String },
}

impl ProviderError {
    pub fn missing_key(provider: &str, env_var: &str) -> Self {
        Self::MissingKey {
            provider: provider.to_string(),
            env_var: env_var.to_string(),
        }
    }
}

// ─── News errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("unknown country: {0}")]
    UnknownCountry(String),

    #[error("news source {source_name} request failed: {message}")]
    Request {
        source_name: String,
        message: String,
    },

    #[error("no headlines found for {0}")]
    Empty(String),
}

// ─── Extraction errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("pdf extraction failed: {0}")]
    Pdf(String),

    #[error("ocr failed: {0}")]
    Ocr(String),
}

// ─── Gateway errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("bind failed: {0}")]
    Bind(String),

    #[error("gateway unreachable: {0}")]
    Unreachable(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, NovaError>;
