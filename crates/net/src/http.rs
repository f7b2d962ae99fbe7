//! HTTP/JSON implementation of the school API

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use sonatina_core::{ClassSummary, Slot, SlotStudent};
use tracing::{debug, warn};

use crate::api::{AuthContext, SchedulerApi, SlotFilters};
use crate::error::{Error, Result};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// REST client for the school backend
#[derive(Debug, Clone)]
pub struct RestClient {
    http: HttpClient,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::InvalidRequest("API base URL is empty".into()));
        }

        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, auth: &AuthContext, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(&auth.token)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Map non-success responses to errors, keeping the body as the message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    if status == StatusCode::UNAUTHORIZED {
        warn!(url = %url, "API rejected credentials");
        return Err(Error::Unauthorized);
    }

    let message = response.text().await.unwrap_or_default();
    warn!(url = %url, status = status.as_u16(), "API request failed");
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SchedulerApi for RestClient {
    async fn fetch_slots(
        &self,
        auth: &AuthContext,
        start: NaiveDate,
        end: NaiveDate,
        filters: &SlotFilters,
    ) -> Result<Vec<Slot>> {
        let request = self.get(auth, "slots").query(&filters.query_pairs(start, end));
        let slots: Vec<Slot> = self.send_json(request).await?;
        debug!(start = %start, end = %end, count = slots.len(), "Fetched slots");
        Ok(slots)
    }

    async fn fetch_slot_by_id(&self, auth: &AuthContext, slot_id: i64) -> Result<Slot> {
        self.send_json(self.get(auth, &format!("slots/{}", slot_id)))
            .await
    }

    async fn fetch_attendance_status(
        &self,
        auth: &AuthContext,
        slot_id: i64,
    ) -> Result<Vec<SlotStudent>> {
        self.send_json(self.get(auth, &format!("slots/{}/attendance", slot_id)))
            .await
    }

    async fn fetch_update_attendance_status(
        &self,
        auth: &AuthContext,
        slot_id: i64,
        records: &[SlotStudent],
    ) -> Result<()> {
        let request = self
            .http
            .put(self.url(&format!("slots/{}/attendance", slot_id)))
            .bearer_auth(&auth.token)
            .json(records);
        check_status(request.send().await?).await?;
        debug!(slot_id, count = records.len(), "Submitted attendance");
        Ok(())
    }

    async fn fetch_classes(&self, auth: &AuthContext) -> Result<Vec<ClassSummary>> {
        self.send_json(self.get(auth, "classes")).await
    }
}
