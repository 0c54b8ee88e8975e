use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::adcs::{ActorRole, Environment};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub bdii: BdiiConfig,
    pub adcs: AdcsConfig,
    pub bcee: BceeConfig,
    pub moderation: ModerationConfig,
    pub features: BTreeMap<String, bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            auth: AuthConfig::default(),
            bdii: BdiiConfig::default(),
            adcs: AdcsConfig::default(),
            bcee: BceeConfig::default(),
            moderation: ModerationConfig::default(),
            features: [("opportunities", true), ("social_feed", true)]
                .into_iter()
                .map(|(name, on)| (name.to_string(), on))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origin: String,
    pub request_timeout_secs: u64,
    /// Deployment environment, checked by decision control
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: false,
            cors_origin: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            environment: Environment::Development,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is not set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,hyper=warn,tower_http=info".to_string(),
            json: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig { pub token: String }

impl AuthConfig {
    pub const MIN_TOKEN_LEN: usize = 32;

    /// Refuse empty, placeholder or short API tokens.
    pub fn ensure_usable(&self) -> Result<()> {
        let token = self.token.trim();
        if token.is_empty() || token.starts_with("__SET_VIA_ENV") {
            anyhow::bail!("BANIBS__AUTH__TOKEN must be set to a random API token");
        }
        if token.len() < Self::MIN_TOKEN_LEN {
            anyhow::bail!(
                "BANIBS__AUTH__TOKEN is {} chars, at least {} required. Generate one with: openssl rand -base64 32",
                token.len(),
                Self::MIN_TOKEN_LEN
            );
        }
        Ok(())
    }
}

/// Thresholds used by the inventory and demand engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BdiiConfig {
    /// Unit age (whole years) at which its holder may upgrade
    pub upgrade_after_years: u32,
    /// Expected yearly growth of assigned devices (0.10 = 10%)
    pub annual_growth_rate: f64,
    /// Extra stock kept on top of forecast demand, as a share of demand
    pub safety_stock_ratio: f64,
    /// Surplus above which idle stock should be moved elsewhere
    pub surplus_threshold: u32,
}

impl Default for BdiiConfig {
    fn default() -> Self {
        Self {
            upgrade_after_years: 3,
            annual_growth_rate: 0.10,
            safety_stock_ratio: 0.15,
            surplus_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdcsConfig {
    pub blocked_actions: Vec<String>,
    /// Minimum role per action; actions not listed require `member`
    pub required_roles: BTreeMap<String, ActorRole>,
    pub max_bulk_targets: u32,
    pub max_auto_amount: f64,
    pub production_sensitive_actions: Vec<String>,
    pub history_limit: usize,
}

impl Default for AdcsConfig {
    fn default() -> Self {
        let required_roles = [
            ("opportunity.approve", ActorRole::Moderator),
            ("opportunity.reject", ActorRole::Moderator),
            ("opportunity.feature", ActorRole::Moderator),
            ("opportunity.unfeature", ActorRole::Moderator),
            ("module.advance", ActorRole::Admin),
            ("module.rollback", ActorRole::Admin),
            ("module.deprecate", ActorRole::Admin),
            ("module.rollout", ActorRole::Admin),
            ("user.delete", ActorRole::Admin),
            ("payout.send", ActorRole::Admin),
        ]
        .into_iter()
        .map(|(action, role)| (action.to_string(), role))
        .collect();

        Self {
            blocked_actions: vec!["database.drop".to_string()],
            required_roles,
            max_bulk_targets: 50,
            max_auto_amount: 500.0,
            production_sensitive_actions: vec![
                "module.advance".to_string(),
                "module.deprecate".to_string(),
                "user.delete".to_string(),
            ],
            history_limit: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BceeConfig { pub default_currency: String }

impl Default for BceeConfig {
    fn default() -> Self {
        Self { default_currency: "USD".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub flag_threshold: f64,
    pub blocked_terms: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            flag_threshold: -0.5,
            blocked_terms: vec!["scam".to_string(), "spam".to_string()],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("BANIBS__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_sections_missing() {
        let cfg = Config::from_figment(Figment::new().merge(Toml::string(
            r#"
            [auth]
            token = "abc"

            [bdii]
            upgrade_after_years = 4
            "#,
        )))
        .unwrap();

        assert_eq!(cfg.auth.token, "abc");
        assert_eq!(cfg.bdii.upgrade_after_years, 4);
        assert_eq!(cfg.bdii.surplus_threshold, 5);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.bcee.default_currency, "USD");
    }

    #[test]
    fn required_roles_parse_from_toml() {
        let cfg = Config::from_figment(Figment::new().merge(Toml::string(
            r#"
            [adcs.required_roles]
            "grant.award" = "admin"
            "#,
        )))
        .unwrap();

        assert_eq!(cfg.adcs.required_roles.get("grant.award"), Some(&ActorRole::Admin));
    }

    #[test]
    fn default_config_enables_core_features() {
        let cfg = Config::default();
        assert_eq!(cfg.features.get("social_feed"), Some(&true));
        assert_eq!(cfg.features.get("opportunities"), Some(&true));
        assert_eq!(cfg.server.environment, Environment::Development);
    }

    #[test]
    fn auth_token_must_be_set_and_long_enough() {
        let token = |t: &str| AuthConfig { token: t.to_string() };
        assert!(token("").ensure_usable().is_err());
        assert!(token("__SET_VIA_ENV__").ensure_usable().is_err());
        assert!(token("devtoken").ensure_usable().is_err());
        assert!(token(&"x".repeat(31)).ensure_usable().is_err());
        assert!(token("pQ7vX2mN9rT4sW8yB3cF6hJ1kL5zD0aE").ensure_usable().is_ok());
    }
}
