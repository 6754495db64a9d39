use flume::{Receiver, Sender};
use tap::TapFallible;
use tokio::sync::oneshot;
use tracing::warn;

use super::PublishError;

pub(crate) fn command_channel<TIn, TOut>() -> (CommandSender<TIn, TOut>, CommandReceiver<TIn, TOut>)
{
    let (tx, rx) = flume::unbounded();
    (CommandSender { tx }, CommandReceiver { rx })
}

pub(crate) struct Envelope<TIn, TOut> {
    pub(crate) command: TIn,
    pub(crate) responder: Responder<TOut>,
}

pub(crate) struct Responder<TOut>(Option<oneshot::Sender<TOut>>);

impl<TOut> Responder<TOut> {
    pub(crate) fn respond(self, response: TOut) {
        if let Some(tx) = self.0 {
            let _ = tx
                .send(response)
                .tap_err(|_| warn!("Requester went away before receiving a response"));
        }
    }
}

pub(crate) struct CommandSender<TIn, TOut> {
    tx: Sender<Envelope<TIn, TOut>>,
}

// Derived Clone would require TIn: Clone
impl<TIn, TOut> Clone for CommandSender<TIn, TOut> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<TIn, TOut> CommandSender<TIn, TOut> {
    pub(crate) async fn send(&self, command: TIn) -> Result<(), PublishError> {
        self.tx
            .send_async(Envelope {
                command,
                responder: Responder(None),
            })
            .await
            .map_err(|_| PublishError::Closed("command channel disconnected".to_owned()))
    }

    pub(crate) async fn request(&self, command: TIn) -> Result<TOut, PublishError> {
        let (oneshot_tx, oneshot_rx) = oneshot::channel();
        self.tx
            .send_async(Envelope {
                command,
                responder: Responder(Some(oneshot_tx)),
            })
            .await
            .map_err(|_| PublishError::Closed("command channel disconnected".to_owned()))?;
        oneshot_rx
            .await
            .map_err(|e| PublishError::NoResponse(format!("{e:?}")))
    }
}

pub(crate) struct CommandReceiver<TIn, TOut> {
    rx: Receiver<Envelope<TIn, TOut>>,
}

impl<TIn, TOut> CommandReceiver<TIn, TOut> {
    pub(crate) async fn recv(&mut self) -> Option<Envelope<TIn, TOut>> {
        self.rx.recv_async().await.ok()
    }
}
