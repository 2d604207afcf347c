use std::sync::Arc;

use axum::extract::FromRef;
use url::Url;

use common::access::PasswordFilter;
use common::gate::MediaGate;
use common::rules::UploadsUrlResolver;

use super::config::{Config, ConfigError};
use super::database::{Database, DatabaseSetupError};
use super::htaccess::HtaccessSink;

/// Main service state - the gate plus the store behind it
#[derive(Clone, Debug)]
pub struct State {
    gate: MediaGate<Database>,
    database: Database,
    config: Arc<Config>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => Url::parse(&format!("sqlite://{}", path.display()))
                .map_err(|_| StateSetupError::InvalidDatabaseUrl),
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        Self::new(config, database)
    }

    /// Build state around an already connected database
    pub fn new(config: &Config, database: Database) -> Result<Self, StateSetupError> {
        let urls = UploadsUrlResolver::new(config.uploads_url()?);
        tracing::debug!(uploads = %urls.base(), "resolving storage urls");

        let gate = MediaGate::new(database.clone(), config.site_url.clone(), urls)
            .with_endpoint(config.gated_endpoint.clone());
        let gate = match &config.htaccess_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "writing rewrite rules to htaccess");
                gate.with_sink(HtaccessSink::new(path))
            }
            None => gate,
        };

        Ok(Self {
            gate,
            database,
            config: Arc::new(config.clone()),
        })
    }

    /// Run resolved passwords through `filter` before they are checked
    pub fn with_password_filter(mut self, filter: impl PasswordFilter + 'static) -> Self {
        self.gate = self.gate.with_password_filter(filter);
        self
    }

    pub fn gate(&self) -> &MediaGate<Database> {
        &self.gate
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `token` grants the read-private capability
    pub fn is_editor_token(&self, token: &str) -> bool {
        !token.is_empty() && self.config.editor_tokens.iter().any(|t| t == token)
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        &self.database
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database setup error")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
