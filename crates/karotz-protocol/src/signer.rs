//! Request signing.
//!
//! The `start` call is authenticated with an HMAC-SHA1 over the canonical
//! query string, keyed with the application's shared secret. The digest is
//! base64 encoded and sent as the `signature` parameter, which is never part
//! of its own digest input.

use crate::params::{Params, SIGNATURE_KEY};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::form_urlencoded;

type HmacSha1 = Hmac<Sha1>;

/// Serialize parameters as a form-urlencoded query string in key order.
pub fn canonical_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Compute the base64 HMAC-SHA1 signature of `params` under `secret`.
///
/// A `signature` entry already present in `params` is left out of the digest.
pub fn sign(params: &Params, secret: &str) -> String {
    let query = if params.contains_key(SIGNATURE_KEY) {
        let mut unsigned = params.clone();
        unsigned.remove(SIGNATURE_KEY);
        canonical_query(&unsigned)
    } else {
        canonical_query(params)
    };

    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(query.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_params() -> Params {
        Params::new()
            .with("apikey", "AK")
            .with("installid", "IID")
            .with("once", 123456789u64)
            .with("timestamp", 1300000000i64)
    }

    #[test]
    fn test_canonical_query_sorted() {
        let query = canonical_query(&start_params());
        assert_eq!(query, "apikey=AK&installid=IID&once=123456789&timestamp=1300000000");
    }

    #[test]
    fn test_canonical_query_encoding() {
        let params = Params::new().with("text", "hello world & more").with("lang", "EN");
        assert_eq!(canonical_query(&params), "lang=EN&text=hello+world+%26+more");
    }

    #[test]
    fn test_canonical_query_empty() {
        assert_eq!(canonical_query(&Params::new()), "");
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        // RFC 2202 style vector, checked against an independent implementation.
        let mut mac = HmacSha1::new_from_slice(b"key").unwrap();
        mac.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(STANDARD.encode(mac.finalize().into_bytes()), "3nybhbi3iqa8ino29wqQcBydtNk=");
    }

    #[test]
    fn test_sign_known_value() {
        assert_eq!(sign(&start_params(), "S3"), "QAm4SmM23TwtuI94f6dZz3vNy+0=");
    }

    #[test]
    fn test_sign_deterministic() {
        let a = sign(&start_params(), "S3");
        let b = sign(&start_params(), "S3");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_changes_with_any_value() {
        let base = sign(&start_params(), "S3");
        for key in ["apikey", "installid", "once", "timestamp"] {
            let mut params = start_params();
            let changed = format!("{}x", params.get(key).unwrap());
            params.insert(key, changed);
            assert_ne!(sign(&params, "S3"), base, "changing {} must change the signature", key);
        }
    }

    #[test]
    fn test_sign_changes_with_secret() {
        assert_ne!(sign(&start_params(), "S3"), sign(&start_params(), "S4"));
    }

    #[test]
    fn test_sign_ignores_existing_signature() {
        let with_signature = start_params().with(SIGNATURE_KEY, "bogus");
        assert_eq!(sign(&with_signature, "S3"), sign(&start_params(), "S3"));
    }

    #[test]
    fn test_sign_independent_of_insertion_order() {
        let reversed = Params::new()
            .with("timestamp", 1300000000i64)
            .with("once", 123456789u64)
            .with("installid", "IID")
            .with("apikey", "AK");
        assert_eq!(sign(&reversed, "S3"), sign(&start_params(), "S3"));
    }
}
