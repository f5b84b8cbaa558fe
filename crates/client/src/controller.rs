use crate::bootstrap;
use crate::config::ClientConfig;
use crate::dispatch::{apply_outcome, CommandOutcome, Dispatcher};
use crate::notifier::Notifier;
use crate::router::{InputRouter, Navigator, Route, UiEvent};
use crate::view::Document;
use gridbot_protocol::{Command, Snapshot};
use std::future::Future;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

enum Reply {
    State(anyhow::Result<Snapshot>),
    Command(Command, anyhow::Result<CommandOutcome>),
}

/// Request generations. Every request gets the next number; a snapshot older
/// than the last one rendered is dropped when `discard_stale` is set.
#[derive(Debug)]
struct Generations {
    next: u64,
    rendered: Option<u64>,
    discard_stale: bool,
}

impl Generations {
    fn new(discard_stale: bool) -> Self {
        Self {
            next: 0,
            rendered: None,
            discard_stale,
        }
    }

    fn issue(&mut self) -> u64 {
        let generation = self.next;
        self.next += 1;
        generation
    }

    fn admit(&mut self, generation: u64) -> bool {
        if self.discard_stale && self.rendered.is_some_and(|last| generation < last) {
            return false;
        }
        self.rendered = Some(generation);
        true
    }
}

/// Owns the page and every component that touches it. Requests run on spawned
/// tasks and report back through the inbox; the page itself is only touched by
/// the task that calls [`Controller::run`].
pub struct Controller<N> {
    doc: Document,
    notifier: Notifier,
    dispatcher: Dispatcher,
    router: InputRouter,
    navigator: N,
    generations: Generations,
    inbox_tx: mpsc::UnboundedSender<(u64, Reply)>,
    inbox_rx: mpsc::UnboundedReceiver<(u64, Reply)>,
    in_flight: usize,
}

impl<N: Navigator> Controller<N> {
    pub fn new(config: &ClientConfig, navigator: N) -> anyhow::Result<Self> {
        let endpoints = config.endpoints()?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            doc: Document::new(),
            notifier: Notifier::new(config.message_timeout),
            router: InputRouter::for_endpoints(&endpoints),
            dispatcher: Dispatcher::new(endpoints),
            navigator,
            generations: Generations::new(config.discard_stale_snapshots),
            inbox_tx,
            inbox_rx,
            in_flight: 0,
        })
    }

    /// Bootstraps, then reacts to `events` until the channel closes and every
    /// request already sent has been answered. `on_change` sees the page after
    /// each visible change. Returns the final page.
    pub async fn run<F>(mut self, mut events: mpsc::Receiver<UiEvent>, mut on_change: F) -> Document
    where
        F: FnMut(&Document),
    {
        self.request_state();
        let mut events_open = true;
        on_change(&self.doc);

        while events_open || self.in_flight > 0 {
            let deadline = self.notifier.deadline();
            let changed = tokio::select! {
                event = events.recv(), if events_open => {
                    match event {
                        Some(event) => self.handle_event(&event),
                        None => events_open = false,
                    }
                    false
                }
                Some((generation, reply)) = self.inbox_rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    self.handle_reply(generation, reply)
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.notifier.expire(&mut self.doc, Instant::now())
                }
            };
            if changed {
                on_change(&self.doc);
            }
        }

        self.doc
    }

    fn handle_event(&mut self, event: &UiEvent) {
        match self.router.route(&self.doc, event) {
            Route::Command(command) => self.request_command(command),
            Route::Navigate(url) => {
                tracing::info!(%url, "navigating");
                if let Err(err) = self.navigator.navigate(&url) {
                    tracing::warn!(%url, "navigation failed: {err:#}");
                }
            }
            Route::Ignored => tracing::trace!(?event, "ignored"),
        }
    }

    /// Runs `request` on its own task under a fresh generation; the reply lands in the inbox.
    fn spawn_request<F, Fut>(&mut self, request: F) -> u64
    where
        F: FnOnce(Dispatcher) -> Fut,
        Fut: Future<Output = Reply> + Send + 'static,
    {
        let generation = self.generations.issue();
        self.in_flight += 1;
        let reply = request(self.dispatcher.clone());
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send((generation, reply.await));
        });
        generation
    }

    fn request_state(&mut self) {
        self.spawn_request(|dispatcher| async move { Reply::State(dispatcher.fetch_state().await) });
    }

    fn request_command(&mut self, command: Command) {
        let action = command.action.clone();
        let direction = command.direction.clone();
        let generation = self.spawn_request(|dispatcher| async move {
            let result = dispatcher.send_command(&command).await;
            Reply::Command(command, result)
        });
        tracing::debug!(generation, %action, ?direction, "sent command");
    }

    fn handle_reply(&mut self, generation: u64, reply: Reply) -> bool {
        match reply {
            Reply::State(result) => {
                if result.is_ok() && !self.generations.admit(generation) {
                    tracing::debug!(generation, "dropping stale initial state");
                    return false;
                }
                bootstrap::finish(&mut self.doc, &mut self.notifier, result).is_ok()
            }
            Reply::Command(command, Ok(outcome)) => {
                match &outcome {
                    CommandOutcome::Applied(_) if !self.generations.admit(generation) => {
                        tracing::debug!(generation, "dropping stale snapshot");
                        return false;
                    }
                    CommandOutcome::Applied(snapshot) => {
                        tracing::debug!(generation, won = snapshot.won, "applying snapshot");
                    }
                    CommandOutcome::Rejected(rejection) => {
                        tracing::debug!(
                            generation,
                            action = %command.action,
                            error = %rejection.error,
                            "command rejected"
                        );
                    }
                }
                apply_outcome(&mut self.doc, &mut self.notifier, &outcome);
                true
            }
            Reply::Command(command, Err(err)) => {
                tracing::error!(generation, action = %command.action, "command failed: {err:#}");
                false
            }
        }
    }
}
