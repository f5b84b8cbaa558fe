use crate::notifier::DEFAULT_MESSAGE_TIMEOUT;
use anyhow::Context;
use gridbot_protocol::paths;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub message_timeout: Duration,
    /// Drop a snapshot that answers an older request than the one last rendered.
    pub discard_stale_snapshots: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            discard_stale_snapshots: true,
        }
    }
}

impl ClientConfig {
    pub fn endpoints(&self) -> anyhow::Result<Endpoints> {
        let base = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base url: {}", self.base_url))?;
        Endpoints::from_base(base)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub state: Url,
    pub command: Url,
    pub export: Url,
}

impl Endpoints {
    pub fn from_base(mut base: Url) -> anyhow::Result<Self> {
        if base.cannot_be_a_base() {
            anyhow::bail!("base url cannot carry paths: {base}");
        }
        // Without the trailing slash `join` would replace the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let join = |path: &str| {
            base.join(path)
                .with_context(|| format!("join {path} onto {base}"))
        };
        Ok(Self {
            state: join(paths::STATE)?,
            command: join(paths::COMMAND)?,
            export: join(paths::EXPORT)?,
        })
    }
}
