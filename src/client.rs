use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use secrecy::ExposeSecret;

use crate::error::Error;
use crate::transport::{ByteStream, Transport};

mod config;
mod consts;
mod utils;

pub use config::{Config, ConfigBuilder};

/// HTTP implementation of [`Transport`]: a turn is a POST whose response
/// body is the event stream; pause and resume are acknowledged POSTs.
pub struct HttpTransport {
    http: reqwest::Client,
    config: Config,
}

impl HttpTransport {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.post(url);
        if let Some(api_key) = self.config.api_key() {
            request = request.bearer_auth(api_key.expose_secret());
        }
        request
    }

    async fn acknowledged(&self, url: &str) -> Result<(), Error> {
        let response = self.post(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

#[derive(serde::Serialize)]
struct TurnBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start_turn(
        &self,
        conversation: &str,
        user_text: Option<String>,
    ) -> Result<ByteStream, Error> {
        let url = utils::turn_url(self.config.base_url(), conversation);
        let response = self
            .post(&url)
            .json(&TurnBody {
                text: user_text.as_deref(),
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        tracing::debug!("turn stream opened for {}", conversation);
        Ok(response.bytes_stream().map_err(Error::from).boxed())
    }

    async fn pause(&self, conversation: &str) -> Result<(), Error> {
        self.acknowledged(&utils::pause_url(self.config.base_url(), conversation))
            .await
    }

    async fn resume(&self, conversation: &str) -> Result<(), Error> {
        self.acknowledged(&utils::resume_url(self.config.base_url(), conversation))
            .await
    }
}
