//! HTTP session against the platform's REST API.

use attendance_core::{FeedPage, FeedQuery, ParticipantPage, ParticipantQuery, Session, TransportError};
use reqwest::{Client, Proxy, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const SCOPE: &str = "READ_USER_PROFILE,READ_CONVERSATIONS";

/// Connection settings for the platform.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    user_id: String,
}

/// A logged-on bot account.
pub struct HttpSession {
    client: Client,
    base_url: String,
    token: String,
    member_id: String,
}

impl HttpSession {
    /// Obtains a bot token with the client credentials grant and reads the bot's own profile.
    pub async fn logon(settings: &PlatformSettings) -> Result<Self, TransportError> {
        let mut builder = Client::builder().timeout(settings.timeout);
        builder = match settings.proxy {
            Some(ref proxy) => {
                let proxy = Proxy::all(proxy)
                    .map_err(|e| TransportError::with_source(format!("invalid proxy {proxy}"), e))?;
                builder.proxy(proxy)
            }
            // the proxy flag already falls back to http_proxy
            None => builder.no_proxy(),
        };
        let client = builder
            .build()
            .map_err(|e| TransportError::with_source("failed to build HTTP client", e))?;

        let token: TokenResponse = fetch(
            client
                .post(format!("{}/oauth/token", settings.base_url))
                .form(&[
                    ("grant_type", "client_credentials"),
                    ("client_id", settings.client_id.as_str()),
                    ("client_secret", settings.client_secret.as_str()),
                    ("scope", SCOPE),
                ]),
        )
        .await?;

        let profile: Profile = fetch(
            client
                .get(format!("{}/rest/v2/users/profile", settings.base_url))
                .bearer_auth(&token.access_token),
        )
        .await?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            token: token.access_token,
            member_id: profile.user_id,
        })
    }

    fn conversation_get(&self, conversation_id: &str, resource: &str) -> RequestBuilder {
        self.client
            .get(format!(
                "{}/rest/v2/conversations/{conversation_id}/{resource}",
                self.base_url
            ))
            .bearer_auth(&self.token)
    }
}

impl Session for HttpSession {
    fn own_member_id(&self) -> &str {
        &self.member_id
    }

    async fn participants_page(
        &self,
        conversation_id: &str,
        query: &ParticipantQuery,
    ) -> Result<ParticipantPage, TransportError> {
        fetch(self.conversation_get(conversation_id, "participants").query(query)).await
    }

    async fn feed_page(
        &self,
        conversation_id: &str,
        query: &FeedQuery,
    ) -> Result<FeedPage, TransportError> {
        fetch(self.conversation_get(conversation_id, "feed").query(query)).await
    }
}

/// Sends a request and decodes a JSON body, treating non-success statuses as errors.
async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, TransportError> {
    let response = request
        .send()
        .await
        .map_err(|e| TransportError::with_source("request failed", e))?;
    let url = response.url().path().to_string();
    debug!(%url, status = %response.status(), "platform response");

    let response = response
        .error_for_status()
        .map_err(|e| TransportError::with_source(format!("{url} was rejected"), e))?;
    response
        .json()
        .await
        .map_err(|e| TransportError::with_source(format!("invalid response from {url}"), e))
}
