//! Client configuration.
//!
//! Read from a TOML file. Every key is optional and falls back to the
//! defaults below:
//!
//! ```toml
//! state_dir = ".dsocial"
//! page_size = 10
//! max_image_bytes = 1048576
//!
//! [gateway]
//! url = "https://ipfs.infura.io:5001"
//! timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dsocial_feed::{DEFAULT_PAGE_SIZE, MAX_IMAGE_BYTES};
use dsocial_store::{IpfsConfig, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "dsocial.toml";

const DEFAULT_STATE_DIR: &str = ".dsocial";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the profile route.
    pub state_dir: PathBuf,
    pub page_size: usize,
    pub max_image_bytes: u64,
    pub gateway: GatewayConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the IPFS HTTP RPC endpoint.
    pub url: String,
    /// Per-request timeout. `0` disables it.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            max_image_bytes: MAX_IMAGE_BYTES,
            gateway: GatewayConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "config loaded");
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists in
    /// the working directory, else the defaults.
    pub fn discover(path: Option<&Path>) -> SdkResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    fn validate(&self) -> SdkResult<()> {
        if self.page_size == 0 {
            return Err(SdkError::Config("page_size must be at least 1".into()));
        }
        if self.gateway.url.trim().is_empty() {
            return Err(SdkError::Config("gateway.url must not be empty".into()));
        }
        Ok(())
    }

    /// Settings for the IPFS HTTP backend.
    pub fn ipfs(&self) -> IpfsConfig {
        IpfsConfig {
            api_url: self.gateway.url.clone(),
            timeout: match self.gateway.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}
