//! Client for the [Celenium](https://celenium.io) rollup blob endpoint.
//!
//! Only ever requests the single most recent blob (`limit=1&offset=0&sort=desc&sort_by=time`). If a rollup
//! publishes blobs faster than they are polled, the blobs in between are never seen.

use crate::config::ApiConfig;
use crate::error::Error;
use crate::model::Blob;
use url::Url;

use super::CeleniumResponseHandler;
use super::RequestHandler;

const API_KEY_HEADER: &str = "apikey";

pub struct CeleniumClient {
    request_handler: RequestHandler,
    url: Url,
    key: String,
}

impl CeleniumClient {
    pub fn new(config: &ApiConfig) -> Result<Self, Error> {
        Ok(CeleniumClient {
            request_handler: RequestHandler::new()?,
            url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    /// Returns the most recent blob, wrapped in a `Vec` of length 0 or 1 as returned by the API.
    pub fn get_latest_blobs(&self) -> Result<Vec<Blob>, Error> {
        self.request_handler
            .execute_deser_header::<CeleniumResponseHandler, Vec<Blob>>(&self.url, (API_KEY_HEADER, &self.key))
    }
}
