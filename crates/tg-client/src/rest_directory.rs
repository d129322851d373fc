use crate::response::{error_details, list_body};
use crate::{ClientResult, endpoint, http_client};

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Url};
use serde::Deserialize;
use serde_json::Value;
use tg_auth::deserialize_id;
use tg_gate::{DirectoryError, PageDirectory, PageSummary, TenantDirectory};

const TENANTS_PATH: &str = "/rest/v1/tenants";
const PAGES_PATH: &str = "/rest/v1/pages";

#[derive(Deserialize)]
struct TenantRow {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

/// Tenant and page lookups against a PostgREST endpoint
pub struct RestDirectory {
    pub url: String,
    api_key: Option<String>,
    client: ReqwestClient,
}

impl RestDirectory {
    pub fn new(url: &str, api_key: Option<&str>, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.map(String::from),
            client: http_client(timeout)?,
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, DirectoryError> {
        let mut url =
            endpoint(&self.url, path).map_err(|e| DirectoryError::network(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// GET a PostgREST table query, returning its rows
    async fn rows(&self, url: Url) -> Result<Vec<Value>, DirectoryError> {
        debug!("GET {url}");
        let mut req = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(ref api_key) = self.api_key {
            req = req
                .header("apikey", api_key)
                .header(AUTHORIZATION, format!("Bearer {api_key}"));
        }

        let response = req
            .send()
            .await
            .map_err(|e| DirectoryError::network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DirectoryError::network(e.to_string()))?;

        if !status.is_success() {
            let (_, message) = error_details(&body);
            return Err(DirectoryError::api(status.as_u16(), message));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| DirectoryError::malformed(e.to_string()))?;
        Ok(list_body(value))
    }
}

#[async_trait]
impl TenantDirectory for RestDirectory {
    async fn tenant_id_for_slug(
        &self,
        tenant_slug: &str,
    ) -> Result<Option<String>, DirectoryError> {
        let slug_filter = format!("eq.{tenant_slug}");
        let url = self.url(
            TENANTS_PATH,
            &[("select", "id"), ("slug", &slug_filter), ("limit", "1")],
        )?;

        match self.rows(url).await?.into_iter().next() {
            Some(row) => serde_json::from_value::<TenantRow>(row)
                .map(|tenant| Some(tenant.id))
                .map_err(|e| DirectoryError::malformed(format!("tenant row: {e}"))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PageDirectory for RestDirectory {
    async fn visible_pages(
        &self,
        tenant_id: &str,
        role_id: Option<&str>,
    ) -> Result<Vec<PageSummary>, DirectoryError> {
        let tenant_filter = format!("eq.{tenant_id}");
        let role_filter = role_id.map(|role_id| format!("(role.is.null,role.eq.{role_id})"));

        let mut query = vec![("select", "id,name,role"), ("tenant_id", tenant_filter.as_str())];
        match role_filter.as_deref() {
            Some(role_filter) => query.push(("or", role_filter)),
            None => query.push(("role", "is.null")),
        }
        query.push(("order", "updated_at.desc"));

        let url = self.url(PAGES_PATH, &query)?;
        self.rows(url)
            .await?
            .into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| DirectoryError::malformed(format!("page row: {e}")))
            })
            .collect()
    }
}
