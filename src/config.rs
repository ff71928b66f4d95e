//! Configuration module

use std::env;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::logic::session::hash_password;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in hours
    pub jwt_expiration_hours: u64,

    /// Analyst login
    pub analyst_username: String,

    /// Argon2 PHC string of the analyst password
    pub analyst_password_hash: String,

    /// Simulated latency of a single asset analysis
    pub analysis_latency: Duration,

    /// Simulated latency of one recommendation pass
    pub recommendation_latency: Duration,

    /// `json` for structured logs, anything else for text
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let production = environment == "production";

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if production => bail!("JWT_SECRET must be set in production"),
            Err(_) => "banking-audit-dev-secret-change-in-production".to_string(),
        };

        let analyst_password_hash = match env::var("ANALYST_PASSWORD_HASH") {
            Ok(hash) => hash,
            Err(_) if production => bail!("ANALYST_PASSWORD_HASH must be set in production"),
            Err(_) => {
                let password = env::var("ANALYST_PASSWORD").unwrap_or_else(|_| "auditor123".to_string());
                hash_password(&password).context("hashing ANALYST_PASSWORD")?
            }
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment,

            jwt_secret,

            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(8),

            analyst_username: env::var("ANALYST_USERNAME")
                .unwrap_or_else(|_| "auditor".to_string()),

            analyst_password_hash,

            analysis_latency: Duration::from_millis(millis_var("ANALYSIS_LATENCY_MS", 1500)),

            recommendation_latency: Duration::from_millis(millis_var("RECOMMENDATION_LATENCY_MS", 2000)),

            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn millis_var(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
