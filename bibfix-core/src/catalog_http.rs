use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};

use crate::catalog::{CatalogClient, UpdateResponse};
use crate::error::{FixError, Result};
use crate::record::{Record, RecordId};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP catalog client: `GET {base}/records/{id}` to load,
/// `PUT {base}/records/{id}` to update.
pub struct HttpCatalog {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCatalog {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/records/{}", self.base_url, id)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }
}

impl CatalogClient for HttpCatalog {
    fn load_record(&self, id: RecordId) -> Result<Option<Record>> {
        let resp = self.authed(self.http.get(self.record_url(id))).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp.error_for_status()?;
        let record: Record = resp.json()?;
        Ok(Some(record))
    }

    fn update_record(&self, record: &Record) -> Result<UpdateResponse> {
        let resp = self
            .authed(self.http.put(self.record_url(record.id)))
            .json(record)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let reason = resp
                .text()
                .unwrap_or_else(|_| String::new());
            return Err(FixError::UpdateFailed {
                id: record.id,
                reason: format!("{status}: {reason}"),
            });
        }
        Ok(resp.json()?)
    }
}
