use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::rating::Rating;

/// Reply shape shared by the host's POST endpoints and TMDB's rating DELETE.
/// The host reports failures in `error`, TMDB in `status_message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl AccountResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            status_message: None,
        }
    }

    /// Why the request was refused. Always `None` on success.
    pub fn failure_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        self.error.clone().or_else(|| self.status_message.clone())
    }
}

/// Short-lived credentials for calling TMDB directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub session_id: String,
    pub access_token: String,
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn logged_in(&self) -> Result<bool>;
    async fn session_id(&self) -> Result<String>;
    async fn access_token(&self) -> Result<String>;
    async fn set_watchlist(&self, movie_id: i64, watchlist: bool) -> Result<AccountResponse>;
    async fn set_favorite(&self, movie_id: i64, favorite: bool) -> Result<AccountResponse>;
    async fn rate_movie(&self, movie_id: i64, rating: Rating) -> Result<AccountResponse>;
    async fn delete_rating(
        &self,
        movie_id: i64,
        credentials: &Credentials,
    ) -> Result<AccountResponse>;
}

/// Fetches both credentials concurrently. An empty value counts as a failure.
pub async fn fetch_credentials(api: &dyn AccountApi) -> Result<Credentials> {
    let (session_id, access_token) = tokio::try_join!(
        async {
            let id = api.session_id().await?;
            if id.trim().is_empty() {
                return Err(anyhow!("Error fetching session ID: session ID is empty"));
            }
            Ok::<_, anyhow::Error>(id)
        },
        async {
            let token = api.access_token().await?;
            if token.trim().is_empty() {
                return Err(anyhow!(
                    "Error fetching access token: access token is empty"
                ));
            }
            Ok::<_, anyhow::Error>(token)
        },
    )?;
    Ok(Credentials {
        session_id,
        access_token,
    })
}

#[derive(Debug, Clone)]
pub struct HttpAccountApi {
    client: Client,
    config: Config,
}

impl HttpAccountApi {
    pub fn new(config: Config) -> Result<Self> {
        let user_agent = format!("reelview/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.host_url(path);
        send_json(self.client.get(&url), &url).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AccountResponse> {
        let url = self.config.host_url(path);
        send_json(self.client.post(&url).json(body), &url).await
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> Result<T> {
    debug!("Requesting {}", url);
    let res = request.send().await.context("request failed")?;
    let status = res.status();
    let text = res.text().await.context("reading body failed")?;
    if !status.is_success() {
        return Err(anyhow!(
            "Error with fetch call, HTTP status {} ({} -> {})",
            status.as_u16(),
            url,
            text
        ));
    }
    let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
    Ok(parsed)
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn logged_in(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct LoggedIn {
            #[serde(default)]
            logged_in: bool,
        }
        let data: LoggedIn = self.get_json("api/logged_in").await?;
        Ok(data.logged_in)
    }

    async fn session_id(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct SessionId {
            session_id: Option<String>,
        }
        let data: SessionId = self.get_json("api/session_id").await?;
        Ok(data.session_id.unwrap_or_default())
    }

    async fn access_token(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct Token {
            access_token: Option<String>,
        }
        let data: Token = self.get_json("api/token").await?;
        Ok(data.access_token.unwrap_or_default())
    }

    async fn set_watchlist(&self, movie_id: i64, watchlist: bool) -> Result<AccountResponse> {
        self.post_json(
            "watchlist_movie/",
            &json!({ "movie_id": movie_id, "watchlist": watchlist }),
        )
        .await
    }

    async fn set_favorite(&self, movie_id: i64, favorite: bool) -> Result<AccountResponse> {
        self.post_json(
            "favorite_movie/",
            &json!({ "movie_id": movie_id, "favorite": favorite }),
        )
        .await
    }

    async fn rate_movie(&self, movie_id: i64, rating: Rating) -> Result<AccountResponse> {
        self.post_json(
            "rate_movie/",
            &json!({ "movie_id": movie_id, "rating": rating }),
        )
        .await
    }

    async fn delete_rating(
        &self,
        movie_id: i64,
        credentials: &Credentials,
    ) -> Result<AccountResponse> {
        let url = format!(
            "{}/movie/{movie_id}/rating?session_id={}",
            self.config.tmdb_base,
            urlencoding::encode(&credentials.session_id)
        );
        let request = self
            .client
            .delete(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&credentials.access_token);
        send_json(request, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_success_and_tmdb_status_message() {
        let host: AccountResponse =
            serde_json::from_value(json!({ "success": false, "error": "nope" })).unwrap();
        assert_eq!(host, AccountResponse::failed("nope"));

        let tmdb: AccountResponse = serde_json::from_value(json!({
            "success": true,
            "status_code": 13,
            "status_message": "The item/record was deleted successfully."
        }))
        .unwrap();
        assert!(tmdb.success);
        assert!(tmdb.error.is_none());
        assert!(tmdb.failure_reason().is_none());
        assert_eq!(
            tmdb.status_message.as_deref(),
            Some("The item/record was deleted successfully.")
        );

        let refused: AccountResponse = serde_json::from_value(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        }))
        .unwrap();
        assert_eq!(
            refused.failure_reason().as_deref(),
            Some("The resource you requested could not be found.")
        );
        assert_eq!(host.failure_reason().as_deref(), Some("nope"));

        let bare: AccountResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!bare.success);
        assert!(bare.failure_reason().is_none());
    }
}
