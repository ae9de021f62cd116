// A search service that leaks padding errors.
//
// Queries look like '/search?data=base64(iv || ciphertext)'. The service
// decrypts the data with a key only it knows and, like plenty of real
// backends, answers differently when the padding turns out to be broken.
use crate::cbc::{decrypt_aes_128_cbc, AES_BLOCK_SIZE};
use crate::pkcs7_unpad;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE, Engine};
use log::{debug, error};
use tokio::net::{TcpListener, ToSocketAddrs};

use std::{collections::HashMap, sync::Arc};

pub const DEMO_KEY: [u8; 16] = *b"3452851383948128";
pub const DEMO_IV: [u8; 16] = *b"8173648291826401";
pub const DEMO_MESSAGE: &[u8] = b"The more you know, the more you realize you know nothing.";

/// Binds `address` and serves the search endpoint in the background. Returns
/// the base URL of the service.
pub async fn spawn_service(
    address: impl ToSocketAddrs,
    key: [u8; 16],
) -> std::io::Result<String> {
    let listener = TcpListener::bind(address).await?;
    let addr = listener.local_addr()?;
    let app = router(SearchRequestHandler::new(key));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("search service stopped: {e}");
        }
    });
    Ok(format!("http://{}", addr))
}

pub fn router(request_handler: SearchRequestHandler) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(Arc::new(request_handler))
}

async fn search(
    State(handler): State<Arc<SearchRequestHandler>>,
    query: Query<HashMap<String, String>>,
) -> Response {
    handler.handle_request(query)
}

#[derive(Debug, Clone)]
pub struct SearchRequestHandler {
    key: [u8; 16],
}

impl SearchRequestHandler {
    pub fn new(key: [u8; 16]) -> Self {
        Self { key }
    }

    pub fn handle_request(&self, Query(params): Query<HashMap<String, String>>) -> Response {
        let data = match params.get("data") {
            Some(d) if !d.is_empty() => d,
            _ => return (StatusCode::BAD_REQUEST, "[!] missing data").into_response(),
        };

        let data = match URL_SAFE.decode(data) {
            Ok(d) => d,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("[!] decoding (base64) error: {e}"))
                    .into_response()
            }
        };

        if data.len() < 2 * AES_BLOCK_SIZE || data.len() % AES_BLOCK_SIZE != 0 {
            return (StatusCode::BAD_REQUEST, "[!] ciphertext length mismatch").into_response();
        }
        let (iv, ciphertext) = data.split_at(AES_BLOCK_SIZE);
        let mut iv_block = [0u8; AES_BLOCK_SIZE];
        iv_block.copy_from_slice(iv);

        let mut plaintext = match decrypt_aes_128_cbc(ciphertext, &self.key, &iv_block) {
            Ok(p) => p,
            Err(_) => {
                return (StatusCode::BAD_REQUEST, "[!] ciphertext length mismatch").into_response()
            }
        };
        if let Err(e) = pkcs7_unpad(&mut plaintext) {
            debug!("rejecting query: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("[!] error {e}")).into_response();
        }

        (StatusCode::OK, "[+] no results found :(").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::CbcPaddingOracle;

    fn query(data: Option<&str>) -> Query<HashMap<String, String>> {
        let mut params = HashMap::new();
        if let Some(d) = data {
            params.insert("data".to_string(), d.to_string());
        }
        Query(params)
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("not base64!"))]
    #[case(Some("AAAA"))]
    #[case(Some("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"))]
    fn handle_request_rejects_malformed_queries(#[case] data: Option<&str>) {
        let handler = SearchRequestHandler::new(DEMO_KEY);

        let response = handler.handle_request(query(data));

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn handle_request_accepts_valid_ciphertext() {
        let handler = SearchRequestHandler::new(DEMO_KEY);
        let data = CbcPaddingOracle::new(DEMO_KEY, DEMO_IV)
            .seal(DEMO_MESSAGE)
            .unwrap();

        let response = handler.handle_request(query(Some(&URL_SAFE.encode(data))));

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn handle_request_reports_padding_errors() {
        let handler = SearchRequestHandler::new(DEMO_KEY);
        let data = CbcPaddingOracle::new(DEMO_KEY, DEMO_IV)
            .seal_unpadded(b"no padding here!")
            .unwrap();

        let response = handler.handle_request(query(Some(&URL_SAFE.encode(data))));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn spawned_service_answers_over_http() {
        let addr = spawn_service("127.0.0.1:0", DEMO_KEY).await.unwrap();
        let data = CbcPaddingOracle::new(DEMO_KEY, DEMO_IV)
            .seal(b"YELLOW SUBMARINE")
            .unwrap();

        let ok = reqwest::get(crate::http::search_url(&addr, &data)).await.unwrap();
        let missing = reqwest::get(format!("{addr}/search")).await.unwrap();

        assert_eq!(ok.status(), reqwest::StatusCode::OK);
        assert_eq!(missing.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
