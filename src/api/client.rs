// Client for the data.gov.il datastore search API
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value as JsonValue;

use super::{ApiError, DatastoreQuery, HttpResponse, ResourceId};
use crate::utils::{Config, Logger};

/// Path of the search action relative to the portal base URL
pub const DATASTORE_SEARCH_PATH: &str = "/api/3/action/datastore_search";

/// Blocking HTTP GET
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse, ApiError>;
}

/// Transport over a reqwest blocking client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Datastore search client keeping the last query, status and payload
pub struct DataGovClient<T = HttpTransport> {
    transport: T,
    logger: Logger,
    base_url: String,
    resources: HashMap<ResourceId, String>,
    url_query: Option<String>,
    json_data: Option<JsonValue>,
    request_status: Option<u16>,
}

impl DataGovClient<HttpTransport> {
    /// Create a client from configuration
    pub fn from_config(config: &Config, logger: Logger) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config.api.timeout())?;
        Ok(Self::with_transport(
            transport,
            logger,
            &config.api.base_url,
            config.api.resources.clone(),
        ))
    }
}

impl<T: Transport> DataGovClient<T> {
    /// Create a client over a given transport
    pub fn with_transport(
        transport: T,
        logger: Logger,
        base_url: &str,
        resources: HashMap<ResourceId, String>,
    ) -> Self {
        logger.info(format_args!("created data.gov.il client for {}", base_url));
        DataGovClient {
            transport,
            logger,
            base_url: base_url.trim_end_matches('/').to_string(),
            resources,
            url_query: None,
            json_data: None,
            request_status: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the last request
    pub fn url_query(&self) -> Option<&str> {
        self.url_query.as_deref()
    }

    /// Status code of the last completed request
    pub fn request_status(&self) -> Option<u16> {
        self.request_status
    }

    /// Payload of the last successful request
    pub fn json_data(&self) -> Option<&JsonValue> {
        self.json_data.as_ref()
    }

    /// Check whether the base URL parses as an absolute URL
    pub fn is_valid(&self) -> bool {
        Url::parse(&self.base_url).is_ok()
    }

    /// Build the search URL for a resource.
    ///
    /// `limit` and `offset` are only added when non-zero.
    pub fn build_url_query(&self, resource: ResourceId, query: &DatastoreQuery) -> Result<String, ApiError> {
        let resource_id = self
            .resources
            .get(&resource)
            .ok_or_else(|| ApiError::UnknownResource(resource.to_string()))?;

        let mut url = Url::parse(&format!("{}{}", self.base_url, DATASTORE_SEARCH_PATH))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("resource_id", resource_id);
            if query.limit != 0 {
                pairs.append_pair("limit", &query.limit.to_string());
            }
            if query.offset != 0 {
                pairs.append_pair("offset", &query.offset.to_string());
            }
            if query.include_total {
                pairs.append_pair("include_total", "true");
            }
            if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
                pairs.append_pair("q", q);
            }
        }

        Ok(url.into())
    }

    /// Fetch a resource and return the current payload.
    ///
    /// A non-2xx status is recorded without replacing the payload. Transport
    /// and JSON failures are logged and also leave the payload untouched.
    pub fn get_data_by_resource_id(
        &mut self,
        resource: ResourceId,
        query: &DatastoreQuery,
    ) -> Result<Option<&JsonValue>, ApiError> {
        let url = self.build_url_query(resource, query)?;
        self.logger.info(format_args!("url_query = {}", url));
        self.url_query = Some(url.clone());

        match self.transport.get(&url) {
            Ok(response) => {
                self.request_status = Some(response.status);
                if response.is_success() {
                    match serde_json::from_str::<JsonValue>(&response.body) {
                        Ok(json) => self.json_data = Some(json),
                        Err(err) => self.logger.exception("decoding response", &err),
                    }
                } else {
                    self.logger.warn(format_args!(
                        "request for {} returned status {}",
                        resource, response.status
                    ));
                }
            }
            Err(err) => self.logger.exception("request", &err),
        }

        self.logger
            .debug(format_args!("status code is {:?}", self.request_status));
        Ok(self.json_data.as_ref())
    }
}
