use crate::dispatch::Dispatcher;
use crate::notifier::Notifier;
use crate::render::render;
use crate::view::Document;
use gridbot_protocol::Snapshot;

/// Fetches the current state once and paints it.
///
/// A failure is logged and otherwise invisible: the page stays blank and the
/// message region is not touched. The error is still returned to the caller.
pub async fn bootstrap(
    dispatcher: &Dispatcher,
    doc: &mut Document,
    notifier: &mut Notifier,
) -> anyhow::Result<()> {
    let result = dispatcher.fetch_state().await;
    finish(doc, notifier, result)
}

pub(crate) fn finish(
    doc: &mut Document,
    notifier: &mut Notifier,
    result: anyhow::Result<Snapshot>,
) -> anyhow::Result<()> {
    match result {
        Ok(snapshot) => {
            tracing::debug!(rows = snapshot.rows(), won = snapshot.won, "initial state");
            render(doc, notifier, &snapshot);
            Ok(())
        }
        Err(err) => {
            tracing::error!("initial state fetch failed: {err:#}");
            Err(err)
        }
    }
}
