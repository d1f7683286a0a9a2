use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Used for `estimatedCompletion` when the application carries no session duration.
    pub default_session_minutes: u32,
    /// Optional JSON file overriding the classifier's phrase lists.
    pub intent_phrases_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_session_minutes: parse_session_minutes(
                &std::env::var("DEFAULT_SESSION_MINUTES").unwrap_or_else(|_| "30".to_string()),
            )?,
            intent_phrases_path: std::env::var("INTENT_PHRASES_PATH").ok(),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_session_minutes(raw: &str) -> Result<u32> {
    let minutes = raw
        .trim()
        .parse::<u32>()
        .context("DEFAULT_SESSION_MINUTES must be a positive integer")?;
    ensure!(minutes > 0, "DEFAULT_SESSION_MINUTES must be a positive integer");
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_minutes_accepts_positive_values() {
        assert_eq!(parse_session_minutes("45").unwrap(), 45);
        assert_eq!(parse_session_minutes(" 30 ").unwrap(), 30);
    }

    #[test]
    fn test_session_minutes_rejects_zero_and_garbage() {
        assert!(parse_session_minutes("0").is_err());
        assert!(parse_session_minutes("-5").is_err());
        assert!(parse_session_minutes("half an hour").is_err());
    }
}
