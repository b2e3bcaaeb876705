//! Client side of the Activity Directory Service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::ActivityDirectory,
    error::ErrorResponse,
    protocol::{activities_route, signup_route, unregister_route, MessageResponse},
};
use tracing::debug;
use url::Url;

use crate::error::BoardError;

#[async_trait]
pub trait ActivityDirectoryApi: Send + Sync {
    async fn fetch_activities(&self) -> Result<ActivityDirectory, BoardError>;
    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse, BoardError>;
    async fn unregister(&self, activity: &str, email: &str)
        -> Result<MessageResponse, BoardError>;
}

#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    http: Client,
    base_url: Url,
}

impl HttpDirectoryClient {
    pub fn new(base_url: &str) -> Result<Self, BoardError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BoardError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends an already-encoded route to the base url, keeping any path
    /// prefix the base carries.
    fn endpoint(&self, route: &str) -> Result<Url, BoardError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{route}"))?)
    }

    async fn read_outcome(resp: Response) -> Result<MessageResponse, BoardError> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| BoardError::Decode(e.to_string()));
        }

        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|b| b.detail_text().map(str::to_owned));
        Err(BoardError::Application {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ActivityDirectoryApi for HttpDirectoryClient {
    async fn fetch_activities(&self) -> Result<ActivityDirectory, BoardError> {
        let url = self.endpoint(activities_route())?;
        debug!(%url, "fetching activity directory");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|b| b.detail_text().map(str::to_owned));
            return Err(BoardError::Application {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(ActivityDirectory::from_json_str(&body)?)
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse, BoardError> {
        let url = self.endpoint(&signup_route(activity, email))?;
        debug!(%url, "sending signup");
        let resp = self.http.post(url).send().await?;
        Self::read_outcome(resp).await
    }

    async fn unregister(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MessageResponse, BoardError> {
        let url = self.endpoint(&unregister_route(activity, email))?;
        debug!(%url, "sending unregister");
        let resp = self.http.delete(url).send().await?;
        Self::read_outcome(resp).await
    }
}
