//! src/configuration.rs
use crate::domain::{AllowedDomains, AllowedDomainsError, EmailValidator};
use config::{Config, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
    /// Full connection URL; takes precedence over the individual fields.
    #[serde(default)]
    pub url: Option<Secret<String>>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    File,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub file_path: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ValidationSettings {
    /// Replaces the built-in provider list when set.
    #[serde(default)]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default = "default_max_suggestion_distance")]
    pub max_suggestion_distance: usize,
}

fn default_max_suggestion_distance() -> usize {
    crate::domain::DEFAULT_MAX_SUGGESTION_DISTANCE
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            allowed_domains: None,
            max_suggestion_distance: default_max_suggestion_distance(),
        }
    }
}

impl ValidationSettings {
    pub fn validator(&self) -> Result<EmailValidator, AllowedDomainsError> {
        let domains = match &self.allowed_domains {
            Some(domains) => AllowedDomains::new(domains)?,
            None => AllowedDomains::default(),
        };

        Ok(EmailValidator::new(domains, self.max_suggestion_distance))
    }
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> Secret<String> {
        let url = match &self.url {
            Some(url) => url.expose_secret().clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username,
                self.password.expose_secret(),
                self.host,
                self.port,
                self.database_name
            ),
        };

        Secret::new(normalize_database_url(&url, self.require_ssl))
    }
}

/// Accepts both `postgres://` and `postgresql://` URLs and appends
/// `sslmode=require` when SSL is required and no mode was given.
pub fn normalize_database_url(url: &str, require_ssl: bool) -> String {
    let is_postgres = url.starts_with("postgres://") || url.starts_with("postgresql://");
    if !is_postgres || !require_ssl || url.contains("sslmode=") {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}sslmode=require", url, separator)
}

/// Process-level overrides, in the shape hosting platforms hand them out.
#[derive(Deserialize, Debug, Default)]
struct EnvOverrides {
    host: Option<String>,
    port: Option<u16>,
    database_url: Option<Secret<String>>,
    storage_backend: Option<StorageBackend>,
    storage_file_path: Option<PathBuf>,
}

impl Settings {
    fn apply(&mut self, overrides: EnvOverrides) {
        if let Some(host) = overrides.host {
            self.application.host = host;
        }
        if let Some(port) = overrides.port {
            self.application.port = port;
        }
        if let Some(url) = overrides.database_url {
            self.database.url = Some(url);
        }
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(path) = overrides.storage_file_path {
            self.storage.file_path = path;
        }
    }
}

#[derive(PartialEq)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                s
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if not specified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    if environment == Environment::Local {
        // A missing .env is fine locally.
        let _ = dotenvy::dotenv();
    }

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;

    let overrides = envy::from_env::<EnvOverrides>()
        .map_err(|e| config::ConfigError::Message(format!("Invalid environment override: {}", e)))?;
    settings.apply(overrides);

    Ok(settings)
}
