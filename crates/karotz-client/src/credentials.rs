//! Application credentials and the settings file they are read from.
//!
//! The settings file is YAML with one section per application:
//!
//! ```yaml
//! karotz-app-settings:
//!   apikey: 0b6ed2f8-...
//!   secret: 1f7b6d9e-...
//!   installid: 9f1c3a27-...
//! ```
//!
//! `KAROTZ_APIKEY`, `KAROTZ_SECRET` and `KAROTZ_INSTALLID` override the file
//! values when set.

use crate::{ClientError, Result};
use serde::{de, Deserialize, Deserializer};
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Section read when none is given.
pub const DEFAULT_SECTION: &str = "karotz-app-settings";

/// Settings file name, looked up in the home directory.
pub const DEFAULT_FILE_NAME: &str = ".karotz.yaml";

/// Environment variable overriding the API key.
pub const ENV_APIKEY: &str = "KAROTZ_APIKEY";
/// Environment variable overriding the shared secret.
pub const ENV_SECRET: &str = "KAROTZ_SECRET";
/// Environment variable overriding the install id.
pub const ENV_INSTALLID: &str = "KAROTZ_INSTALLID";

/// Validated application credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    apikey: String,
    secret: String,
    installid: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("apikey", &self.apikey)
            .field("secret", &"<redacted>")
            .field("installid", &self.installid)
            .finish()
    }
}

/// Credentials as they appear in a settings section, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawCredentials {
    #[serde(default, deserialize_with = "scalar_string")]
    apikey: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    secret: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    installid: Option<String>,
}

/// Read any YAML scalar as text, so `apikey: 12345` is the string `"12345"`.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar value, found {:?}",
            other
        ))),
    }
}

impl RawCredentials {
    /// Replace fields with non-empty values returned by `lookup`.
    fn override_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (ENV_APIKEY, &mut self.apikey),
            (ENV_SECRET, &mut self.secret),
            (ENV_INSTALLID, &mut self.installid),
        ];
        for (name, field) in fields {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *field = Some(value);
            }
        }
        self
    }

    fn validate(self) -> Result<Credentials> {
        Credentials::new(
            self.apikey.unwrap_or_default(),
            self.secret.unwrap_or_default(),
            self.installid.unwrap_or_default(),
        )
    }
}

impl Credentials {
    /// Build credentials, rejecting any empty field.
    pub fn new(
        apikey: impl Into<String>,
        secret: impl Into<String>,
        installid: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Credentials {
            apikey: apikey.into(),
            secret: secret.into(),
            installid: installid.into(),
        };
        for (name, value) in [
            ("apikey", &credentials.apikey),
            ("secret", &credentials.secret),
            ("installid", &credentials.installid),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::MissingCredentials(format!("'{}' is missing or empty", name)));
            }
        }
        Ok(credentials)
    }

    /// The application's API key.
    pub fn apikey(&self) -> &str {
        &self.apikey
    }

    /// The shared secret used to sign `start`.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The application's install id on the device.
    pub fn installid(&self) -> &str {
        &self.installid
    }

    /// Default settings file path (`~/.karotz.yaml`).
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_FILE_NAME))
            .ok_or_else(|| ClientError::MissingCredentials("cannot locate the home directory".to_string()))
    }

    /// Load from the default file and section, applying environment overrides.
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?, DEFAULT_SECTION)
    }

    /// Load `section` from a settings file, applying environment overrides.
    pub fn load<P: AsRef<Path>>(path: P, section: &str) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let raw = raw_section(&text, section)?;
        raw.override_with(|name| std::env::var(name).ok()).validate()
    }

    /// Parse `section` from YAML text. No environment overrides are applied.
    pub fn from_yaml_str(text: &str, section: &str) -> Result<Self> {
        raw_section(text, section)?.validate()
    }

    /// Build solely from the `KAROTZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        RawCredentials::default()
            .override_with(|name| std::env::var(name).ok())
            .validate()
    }
}

fn raw_section(text: &str, section: &str) -> Result<RawCredentials> {
    let document: serde_yaml::Value = serde_yaml::from_str(text)?;
    let value = document
        .get(section)
        .cloned()
        .ok_or_else(|| ClientError::MissingCredentials(format!("no section '{}'", section)))?;
    if value.is_null() {
        return Ok(RawCredentials::default());
    }
    Ok(serde_yaml::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DUMMY_VALUE: &str = "23426660-beef-beee-baad-food0000babe";

    const GOOD_CONFIG: &str = "\
karotz-app-settings:
  apikey: 23426660-beef-beee-baad-food0000babe
  secret: 23426660-beef-beee-baad-food0000babe
  installid: 23426660-beef-beee-baad-food0000babe
";

    #[test]
    fn test_from_yaml_good() {
        let credentials = Credentials::from_yaml_str(GOOD_CONFIG, DEFAULT_SECTION).unwrap();
        assert_eq!(credentials.apikey(), DUMMY_VALUE);
        assert_eq!(credentials.secret(), DUMMY_VALUE);
        assert_eq!(credentials.installid(), DUMMY_VALUE);
    }

    #[test]
    fn test_from_yaml_other_section() {
        let text = "other:\n  apikey: a\n  secret: s\n  installid: i\n";
        let credentials = Credentials::from_yaml_str(text, "other").unwrap();
        assert_eq!(credentials.apikey(), "a");
    }

    #[test]
    fn test_from_yaml_no_section() {
        let err = Credentials::from_yaml_str(GOOD_CONFIG, "nope").unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials(_)));

        let err = Credentials::from_yaml_str("karotz-app-settings:\n", DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials(_)));
    }

    #[test]
    fn test_from_yaml_missing_each_option() {
        for missing in ["apikey", "secret", "installid"] {
            let text: String = GOOD_CONFIG
                .lines()
                .filter(|line| !line.trim_start().starts_with(missing))
                .map(|line| format!("{}\n", line))
                .collect();
            match Credentials::from_yaml_str(&text, DEFAULT_SECTION) {
                Err(ClientError::MissingCredentials(msg)) => assert!(msg.contains(missing), "{}", msg),
                other => panic!("expected MissingCredentials for {}, got {:?}", missing, other),
            }
        }
    }

    #[test]
    fn test_from_yaml_numeric_values_are_strings() {
        let text = "karotz-app-settings:\n  apikey: 12345\n  secret: s3cr3t\n  installid: 987654321\n";
        let credentials = Credentials::from_yaml_str(text, DEFAULT_SECTION).unwrap();
        assert_eq!(credentials.apikey(), "12345");
        assert_eq!(credentials.secret(), "s3cr3t");
        assert_eq!(credentials.installid(), "987654321");
    }

    #[test]
    fn test_from_yaml_nested_value_is_config_error() {
        let text = "karotz-app-settings:\n  apikey: [a, b]\n  secret: s\n  installid: i\n";
        let err = Credentials::from_yaml_str(text, DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = Credentials::from_yaml_str("karotz-app-settings: [unclosed", DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Credentials::new("a", "", "i").is_err());
        assert!(Credentials::new(" ", "s", "i").is_err());
        assert!(Credentials::new("a", "s", "i").is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("AK", "S3cr3t", "IID").unwrap();
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("AK"));
        assert!(!debug.contains("S3cr3t"));
    }

    #[test]
    fn test_overrides_replace_and_fill() {
        let env: HashMap<&str, &str> = [(ENV_SECRET, "from-env"), (ENV_INSTALLID, "")].into_iter().collect();
        let raw = RawCredentials {
            apikey: Some("file-key".to_string()),
            secret: Some("file-secret".to_string()),
            installid: Some("file-install".to_string()),
        };

        let credentials = raw
            .override_with(|name| env.get(name).map(|v| v.to_string()))
            .validate()
            .unwrap();

        assert_eq!(credentials.apikey(), "file-key");
        assert_eq!(credentials.secret(), "from-env");
        // Empty overrides are ignored.
        assert_eq!(credentials.installid(), "file-install");
    }

    #[test]
    fn test_overrides_complete_a_partial_section() {
        let raw = raw_section("karotz-app-settings:\n  apikey: a\n  installid: i\n", DEFAULT_SECTION).unwrap();
        let credentials = raw
            .override_with(|name| (name == ENV_SECRET).then(|| "s".to_string()))
            .validate()
            .unwrap();
        assert_eq!(credentials.secret(), "s");
    }
}
