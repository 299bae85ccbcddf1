//! Request URL assembly.

use crate::params::{Params, SIGNATURE_KEY};
use crate::signer::{canonical_query, sign};

/// Base URL of the public Karotz REST API.
pub const DEFAULT_BASE_URL: &str = "http://api.karotz.com/api/karotz/";

/// Builds fully qualified request URLs against a base endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    base_url: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl RequestBuilder {
    /// Create a builder for the given base URL. A trailing `/` is added if missing.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// The base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Assemble `base + endpoint + "?" + canonical query`.
    ///
    /// When `signature` is given it is added under `signature` before
    /// serialization, so it lands in its canonical position.
    pub fn build(&self, endpoint: &str, params: &Params, signature: Option<&str>) -> String {
        let query = match signature {
            Some(signature) => {
                let mut signed = params.clone();
                signed.insert(SIGNATURE_KEY, signature);
                canonical_query(&signed)
            }
            None => canonical_query(params),
        };
        format!("{}{}?{}", self.base_url, endpoint, query)
    }

    /// Sign `params` with `secret` and assemble the URL.
    pub fn build_signed(&self, endpoint: &str, params: &Params, secret: &str) -> String {
        let signature = sign(params, secret);
        self.build(endpoint, params, Some(&signature))
    }
}
