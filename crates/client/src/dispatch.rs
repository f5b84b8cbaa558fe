use crate::config::Endpoints;
use crate::notifier::Notifier;
use crate::render::render;
use crate::view::Document;
use anyhow::Context;
use gridbot_protocol::{Command, ErrorResponse, Snapshot};

pub const COMMAND_FAILED_PREFIX: &str = "Command failed: ";

/// Result of a command the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(Snapshot),
    Rejected(ErrorResponse),
}

/// Talks to the game server. One attempt per call: no retry, no timeout.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl Dispatcher {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
        }
    }

    pub async fn fetch_state(&self) -> anyhow::Result<Snapshot> {
        let response = self
            .http
            .get(self.endpoints.state.clone())
            .send()
            .await
            .context("GET /state")?;

        if !response.status().is_success() {
            anyhow::bail!("GET /state returned {}", response.status());
        }

        response.json::<Snapshot>().await.context("decode state")
    }

    pub async fn send_command(&self, command: &Command) -> anyhow::Result<CommandOutcome> {
        let response = self
            .http
            .post(self.endpoints.command.clone())
            .json(command)
            .send()
            .await
            .context("POST /command")?;

        let status = response.status();
        if status.is_success() {
            let snapshot = response
                .json::<Snapshot>()
                .await
                .context("decode command snapshot")?;
            return Ok(CommandOutcome::Applied(snapshot));
        }

        let rejection = response
            .json::<ErrorResponse>()
            .await
            .with_context(|| format!("decode command rejection ({status})"))?;
        Ok(CommandOutcome::Rejected(rejection))
    }
}

/// Feeds a command outcome into the page: a snapshot repaints, a rejection only
/// touches the message region.
pub fn apply_outcome(doc: &mut Document, notifier: &mut Notifier, outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Applied(snapshot) => render(doc, notifier, snapshot),
        CommandOutcome::Rejected(rejection) => {
            notifier.show_error(doc, &format!("{COMMAND_FAILED_PREFIX}{}", rejection.error));
        }
    }
}
