use crate::error::{Result, SrtSyncError};
use crate::subtitle::resync::ShiftPolicy;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Display name for documents built from text with no file behind them.
pub const DEFAULT_NAME: &str = "SRT.srt";

/// A named text encoding, resolved from a WHATWG label such as `windows-1250` or `utf-8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    pub fn utf_8() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }

    pub fn windows_1250() -> Self {
        TextEncoding(encoding_rs::WINDOWS_1250)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }

    /// Whether text can be written back out in this encoding. UTF-16 decoders
    /// exist, but their encoders emit UTF-8.
    pub fn is_writable(&self) -> bool {
        self.0.output_encoding() == self.0
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::windows_1250()
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Encoding::for_label(s.trim().as_bytes())
            .map(TextEncoding)
            .ok_or_else(|| format!("Unknown encoding: {}. Use a label like 'windows-1250' or 'utf-8'", s))
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(value: TextEncoding) -> Self {
        value.name().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoding used to read and write subtitle files.
    pub encoding: TextEncoding,
    /// What to do when a shift would push a timestamp out of range.
    pub shift_policy: ShiftPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            shift_policy: ShiftPolicy::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = fs::read_to_string(&config_path)?;
                match toml::from_str::<Config>(&contents) {
                    Ok(file_config) => {
                        debug!("Loaded config from {:?}", config_path);
                        config = file_config;
                    }
                    Err(e) => warn!("Ignoring unreadable config {:?}: {}", config_path, e),
                }
            }
        }

        // Override with environment variables
        if let Ok(encoding) = std::env::var("SRTSYNC_ENCODING") {
            if let Ok(e) = encoding.parse() {
                config.encoding = e;
            }
        }
        if let Ok(policy) = std::env::var("SRTSYNC_SHIFT_POLICY") {
            if let Ok(p) = policy.parse() {
                config.shift_policy = p;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.encoding.is_writable() {
            return Err(SrtSyncError::Config(format!(
                "Encoding {} can be read but not written. Pick an 8-bit encoding or utf-8",
                self.encoding
            )));
        }

        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path().ok_or_else(|| {
            SrtSyncError::Config("No configuration directory on this platform".to_string())
        })?;
        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| SrtSyncError::Config(e.to_string()))?;
        fs::write(&config_path, toml_content)?;
        Ok(config_path)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("srtsync").join("config.toml"))
    }
}
