mod command_channel;
mod publish_error;
mod published;

pub use publish_error::*;
pub use published::*;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::album::Album;
use command_channel::{CommandReceiver, CommandSender, Envelope, command_channel};

enum PublisherCommand {
    Publish {
        term: String,
        source: ResultSource,
        albums: Vec<Album>,
    },
    Shutdown,
}

/// Handle to the task that owns the published result set.
///
/// Search completions can finish on any worker thread. They all funnel through this
/// handle's channel so the result set is only ever replaced by one task, one
/// publish at a time. Concurrent searches are not coordinated beyond that: whichever
/// publish arrives last is what observers end up seeing.
#[derive(Clone)]
pub struct Publisher {
    cmd_tx: CommandSender<PublisherCommand, u64>,
    results_rx: watch::Receiver<Option<Published>>,
}

impl Publisher {
    /// Starts the publishing task. Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (cmd_tx, cmd_rx) = command_channel();
        let (results_tx, results_rx) = watch::channel(None);
        tokio::spawn(publish_loop(cmd_rx, results_tx));

        Self { cmd_tx, results_rx }
    }

    /// Replaces the published result set and returns its sequence number once the
    /// publishing task has applied it.
    pub async fn publish(
        &self,
        term: &str,
        source: ResultSource,
        albums: Vec<Album>,
    ) -> Result<u64, PublishError> {
        self.cmd_tx
            .request(PublisherCommand::Publish {
                term: term.to_owned(),
                source,
                albums,
            })
            .await
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Published>> {
        self.results_rx.clone()
    }

    pub fn current(&self) -> Option<Published> {
        self.results_rx.borrow().clone()
    }

    /// Stops applying publishes. Any publish after this fails with
    /// [`PublishError::NoResponse`].
    pub async fn shutdown(&self) -> Result<(), PublishError> {
        self.cmd_tx.send(PublisherCommand::Shutdown).await
    }
}

async fn publish_loop(
    mut cmd_rx: CommandReceiver<PublisherCommand, u64>,
    results_tx: watch::Sender<Option<Published>>,
) {
    let mut sequence = 0;
    let mut running = true;
    // Requests arriving after shutdown are answered by dropping their responder
    while let Some(Envelope { command, responder }) = cmd_rx.recv().await {
        match command {
            PublisherCommand::Publish { term, .. } if !running => {
                debug!("Publisher is shut down, ignoring results for {term:?}");
                drop(responder);
            }
            PublisherCommand::Publish {
                term,
                source,
                albums,
            } => {
                sequence += 1;
                debug!(
                    "Publishing {} albums for {term:?} from {source} (sequence {sequence})",
                    albums.len()
                );
                results_tx.send_replace(Some(Published {
                    sequence,
                    term,
                    source,
                    albums,
                }));
                responder.respond(sequence);
            }
            PublisherCommand::Shutdown => {
                if running {
                    info!("Publisher shutting down");
                    running = false;
                }
            }
        }
    }
}
