//! Settings from the JSON config file merged with command-line flags.

use crate::Args;
use crate::session::PlatformSettings;
use anyhow::{Context, Result};
use attendance_core::{DateWindow, ReportError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Bot application credentials (OAuth client credentials grant).
#[derive(Debug, Clone, Deserialize)]
pub struct BotCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Contents of `config.json`. Every key is optional; flags may supply them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub domain: Option<String>,
    pub bot: Option<BotCredentials>,
    pub conversation_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FileConfig {
    /// Loads the config file. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using flags only");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {}", path.display()))?;
        Ok(config)
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub platform: PlatformSettings,
    pub conversation_id: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub out_dir: PathBuf,
    pub attenders_file: String,
    pub non_attenders_file: String,
}

impl Settings {
    /// Merges flags over file values. Fails on anything needed before the first request.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, ReportError> {
        let missing = |what: &str| ReportError::Configuration(format!("{what} not provided"));

        let conversation_id = args
            .conversation_id
            .clone()
            .or(file.conversation_id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| missing("conversationId"))?;

        let domain = args
            .domain
            .clone()
            .or(file.domain)
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| missing("domain"))?;

        let client_id = args
            .client_id
            .clone()
            .or_else(|| file.bot.as_ref().map(|b| b.client_id.clone()))
            .ok_or_else(|| missing("bot client_id"))?;
        let client_secret = args
            .client_secret
            .clone()
            .or_else(|| file.bot.as_ref().map(|b| b.client_secret.clone()))
            .ok_or_else(|| missing("bot client_secret"))?;

        Ok(Self {
            platform: PlatformSettings {
                base_url: base_url(&domain),
                client_id,
                client_secret,
                proxy: args.proxy.clone().filter(|p| !p.is_empty()),
                timeout: Duration::from_secs(args.timeout),
            },
            conversation_id,
            start_date: args.start_date.clone().or(file.start_date),
            end_date: args.end_date.clone().or(file.end_date),
            out_dir: args.out_dir.clone(),
            attenders_file: args.attenders_file.clone(),
            non_attenders_file: args.non_attenders_file.clone(),
        })
    }

    /// Parses the configured dates. A malformed date is a configuration error.
    pub fn window(&self) -> Result<DateWindow, ReportError> {
        DateWindow::parse(self.start_date.as_deref(), self.end_date.as_deref())
            .map_err(ReportError::from)
    }
}

fn base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}
