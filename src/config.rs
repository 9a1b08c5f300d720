use std::env;

use anyhow::{Context, bail};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_key: String,
    pub host: String,
    pub port: u16,
    pub domain: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `DATABASE_URL` and
    /// `JWT_KEY` are required; everything else has a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_key = lookup("JWT_KEY").context("JWT_KEY is not set")?;
        if jwt_key.trim().is_empty() {
            bail!("JWT_KEY must not be empty");
        }
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            None => 3000,
        };
        let domain = lookup("DOMAIN").unwrap_or_else(|| "http://localhost".to_string());
        Ok(Self {
            database_url,
            jwt_key,
            host,
            port,
            domain,
        })
    }

    /// Base URL used for hypermedia links in responses.
    pub fn public_url(&self) -> String {
        format!("{}:{}", self.domain.trim_end_matches('/'), self.port)
    }
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
    pub seats: i32,
    pub ticket_price: i64,
}

impl SeedConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let admin_email = lookup("ADMIN_EMAIL").unwrap_or_else(|| "admin@example.com".to_string());
        let admin_password = lookup("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
        let admin_name = lookup("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string());
        let seats = match lookup("SEED_SEATS") {
            Some(raw) => raw
                .parse::<i32>()
                .with_context(|| format!("SEED_SEATS is not a number: {raw}"))?,
            None => 40,
        };
        if seats <= 0 {
            bail!("SEED_SEATS must be positive");
        }
        let ticket_price = match lookup("SEED_TICKET_PRICE") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("SEED_TICKET_PRICE is not a number: {raw}"))?,
            None => 500,
        };
        Ok(Self {
            admin_name,
            admin_email,
            admin_password,
            seats,
            ticket_price,
        })
    }
}
