//! API client for Planning Center Online.
//!
//! All requests use HTTP Basic auth and a fixed identifying user-agent
//! against a single hardcoded service-type plan collection. Requests are
//! issued strictly one at a time; nothing is retried.

use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

const BASE_URL: &str =
    "https://api.planningcenteronline.com/services/v2/service_types/1069223/plans";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for accessing the Planning Center Online API
#[derive(Clone)]
pub struct PlanningCenterClient {
    app_id: String,
    secret: String,
    base_url: String,
    client: Client,
}

impl PlanningCenterClient {
    /// Create a new Planning Center client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client targeting an alternate plan-collection URL.
    ///
    /// Used by tests to point the client at a mock server.
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Self {
        Self {
            app_id: config.pco_app_id.clone(),
            secret: config.pco_secret.clone(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Make an authenticated GET request and decode the JSON body.
    ///
    /// `context` names the request in error messages ("Plan", "Plan times",
    /// ...). Non-2xx responses surface their status and body; bodies that
    /// are not valid JSON are a decode error.
    async fn get(&self, url: &str, query: &[(&str, &str)], context: &'static str) -> Result<Value> {
        tracing::debug!(url, context, "requesting");
        let resp = self
            .client
            .get(url)
            .basic_auth(&self.app_id, Some(&self.secret))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to reach API for {context}: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read {context} response: {e}")))?;

        if !status.is_success() {
            return Err(Error::api_status(
                format!("{context} request failed with status {}: {body}", status.as_u16()),
                status.as_u16(),
            ));
        }

        serde_json::from_str(&body).map_err(|_| Error::decode(context))
    }

    /// Find the first plan starting strictly after the given date.
    ///
    /// Issues one query limited to a single result; if the response holds
    /// no plan, the run fails with [`Error::NoPlan`].
    pub async fn find_first_plan_after(&self, after: NaiveDate) -> Result<String> {
        let after = after.format("%Y-%m-%d").to_string();
        let json = self
            .get(
                &self.base_url,
                &[("per_page", "1"), ("filter", "after"), ("after", &after)],
                "Plan",
            )
            .await?;

        json["data"][0]["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| Error::NoPlan(format!("no plan found after {after}")))
    }

    /// Fetch all time entries for a plan.
    pub async fn fetch_plan_times(&self, plan_id: &str) -> Result<Value> {
        let url = format!("{}/{plan_id}/plan_times", self.base_url);
        self.get(&url, &[], "Plan times").await
    }

    /// Fetch all agenda items for a plan, with the item-times inclusion hint.
    pub async fn fetch_plan_items(&self, plan_id: &str) -> Result<Value> {
        let url = format!("{}/{plan_id}/items", self.base_url);
        self.get(&url, &[("include", "item_times")], "Plan items").await
    }

    /// Fetch one item-time detail record via the related-resource link
    /// supplied in the item response.
    pub async fn fetch_item_time(&self, related_url: &str, item_time_id: &str) -> Result<Value> {
        let url = format!("{}/{item_time_id}", related_url.trim_end_matches('/'));
        self.get(&url, &[], "Item time").await
    }
}
