//! Conversion settings.
//!
//! Values come from `MAILARCHIVE_*` environment variables first; command line
//! flags are applied on top by the binary.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

fn lookup_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn lookup_duration_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_millis: u64,
) -> Duration {
    lookup(key)
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(default_millis))
}

/// Layout of the archive being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    /// Raw mbox, messages separated by `From ` lines
    #[default]
    Mbox,
    /// A JSON array of already decoded records
    Json,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputFormat::Mbox => "mbox",
            InputFormat::Json => "json",
        })
    }
}

impl FromStr for InputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mbox" | "" => Ok(InputFormat::Mbox),
            "json" => Ok(InputFormat::Json),
            _ => Err(()),
        }
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Local path or `http(s)` URL of the archive
    pub source: String,
    pub format: InputFormat,
    /// Decompress the source with gzip before decoding
    pub gzip: bool,
    /// Output file; stdout when unset
    pub output: Option<PathBuf>,
    /// Indent the JSON output
    pub pretty: bool,
    pub fetch_timeout: Duration,
}

impl ConvertConfig {
    pub fn from_env(source: impl Into<String>) -> Self {
        Self::from_lookup(source, |key| env::var(key).ok())
    }

    /// Build a config reading variables through `lookup` instead of the
    /// process environment.
    pub fn from_lookup(source: impl Into<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let format = lookup("MAILARCHIVE_FORMAT")
            .and_then(|value| InputFormat::from_str(&value).ok())
            .unwrap_or_default();

        Self {
            source: source.into(),
            format,
            gzip: lookup_bool(&lookup, "MAILARCHIVE_GZIP", false),
            output: None,
            pretty: lookup_bool(&lookup, "MAILARCHIVE_PRETTY", false),
            fetch_timeout: lookup_duration_millis(&lookup, "MAILARCHIVE_FETCH_TIMEOUT_MS", 30_000),
        }
    }
}
