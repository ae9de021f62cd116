// A padding oracle reached over HTTP
pub mod server;

use base64::{engine::general_purpose::URL_SAFE, Engine};
use log::warn;
use reqwest::{blocking::Client, StatusCode};

use crate::{Error, PaddingOracle, Result};

/// Queries `GET {address}/search?data=<base64>` and reads the padding verdict
/// off the response status.
///
/// A success status means valid padding and the padding-error status means
/// invalid padding. Any other status is treated like a failed request: it is
/// retried, then counted as invalid.
///
/// Uses a blocking client, so it must not be built or dropped inside an async
/// runtime.
pub struct HttpOracle {
    client: Client,
    address: String,
    padding_error: StatusCode,
    retries: usize,
    intercepted: Option<Vec<u8>>,
}

impl HttpOracle {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            address: address.into(),
            padding_error: StatusCode::INTERNAL_SERVER_ERROR,
            retries: 3,
            intercepted: None,
        }
    }

    /// The ciphertext (IV first) handed out by [`PaddingOracle::supply`].
    pub fn with_intercepted(mut self, ciphertext: Vec<u8>) -> Self {
        self.intercepted = Some(ciphertext);
        self
    }

    /// The status the server answers with when padding is invalid.
    pub fn with_padding_error_status(mut self, status: StatusCode) -> Self {
        self.padding_error = status;
        self
    }

    /// How many times a failed request, or one answered with an unexpected
    /// status, is repeated before the ciphertext is counted as invalid.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }
}

impl PaddingOracle for HttpOracle {
    fn validate(&self, ciphertext: &[u8]) -> bool {
        let uri = search_url(&self.address, ciphertext);
        for attempt in 0..=self.retries {
            match self.client.get(&uri).send() {
                Ok(response) if response.status().is_success() => return true,
                Ok(response) if response.status() == self.padding_error => return false,
                Ok(response) => warn!(
                    "oracle request {} answered with unexpected status {}",
                    attempt + 1,
                    response.status()
                ),
                Err(e) => warn!("oracle request {} failed: {e}", attempt + 1),
            }
        }
        false
    }

    fn supply(&self) -> Result<Vec<u8>> {
        self.intercepted.clone().ok_or(Error::NoCiphertext)
    }
}

pub fn search_url(address: &str, ciphertext: &[u8]) -> String {
    format!("{}/search?data={}", address, URL_SAFE.encode(ciphertext))
}
