//! Celenium API client.

use crate::error::Error;
use log::debug;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub mod celenium;

struct RequestHandler {
    client: Client,
}

const USER_AGENT: &str = "blobsync";

/// Upper bound for a single request, so a hanging endpoint cannot stall the ingestion loop.
const REQUEST_TIMEOUT: u64 = 30;

/// Handler for the Celenium API; sets the query parameters selecting the most recent blob.
struct CeleniumResponseHandler;

trait ResponseHandler {
    /// Prepares a request by i.e. setting it's headers or query parameters.
    fn prepare(request_handler: &RequestHandler, url: &Url) -> RequestBuilder;

    /// Given a response different error status codes are handled.
    fn process(response: Response) -> Result<Response, Error>;
}

impl RequestHandler {
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .build()?;

        Ok(RequestHandler { client })
    }

    /// Sends a single request; there are no retries, the caller decides whether to try again later.
    fn execute<T: ResponseHandler>(&self, url: &Url, header: Option<(&str, &str)>) -> Result<Response, Error> {
        let mut request = T::prepare(self, url);

        if let Some(header) = header {
            request = request.header(header.0, header.1);
        }

        let response = request.send().map_err(Error::HttpRequest)?;
        debug!("Received {} from {}", response.status(), response.url());

        T::process(response)
    }

    pub fn execute_deser_header<T: ResponseHandler, U: DeserializeOwned>(
        &self,
        url: &Url,
        header: (&str, &str),
    ) -> Result<U, Error> {
        let content = self.execute::<T>(url, Some(header))?.text().map_err(Error::HttpRequest)?;

        Ok(serde_json::from_str(&content)?)
    }
}

impl ResponseHandler for CeleniumResponseHandler {
    fn prepare(request_handler: &RequestHandler, url: &Url) -> RequestBuilder {
        let mut request = request_handler.client.get(url.clone());
        request = request.query(&[("limit", "1"), ("offset", "0"), ("sort", "desc"), ("sort_by", "time")]);

        request
    }

    fn process(response: Response) -> Result<Response, Error> {
        match response.status() {
            StatusCode::OK => Ok(response),

            status => Err(Error::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            }),
        }
    }
}
