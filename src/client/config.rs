use secrecy::SecretString;

use crate::client::consts::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};

/// Connection settings for the HTTP transport.
pub struct Config {
    base_url: String,
    api_key: Option<SecretString>,
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = normalize(base_url);
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = Some(SecretString::from(api_key.to_string()));
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Defaults from the environment; a `.env` file is honored when present.
    ///
    /// * `GROUP_CHAT_BASE_URL`: server base URL, default `http://127.0.0.1:8000`.
    /// * `GROUP_CHAT_API_KEY`: optional bearer token sent with every request.
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        Self {
            base_url: normalize(
                &std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ),
            api_key: std::env::var(API_KEY_ENV).ok().map(SecretString::from),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
