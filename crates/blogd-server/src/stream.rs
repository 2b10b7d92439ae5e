//! Drives a list cursor and forwards one record at a time.

use tokio::sync::mpsc;
use tracing::{debug, error};

use blogd_protocol::{FrameCodec, ListFrame};
use blogd_store::{BlogDocument, DocumentCursor};

use crate::error::ServiceError;
use crate::mapper;

/// How a list stream ended.
#[derive(Debug, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The cursor was exhausted.
    Completed { sent: usize },
    /// A document failed to decode or frame, or the cursor failed. Items
    /// already sent stay sent.
    Failed { sent: usize, error: ServiceError },
    /// The receiving side went away; the cursor was not drained.
    Disconnected { sent: usize },
}

impl EmitOutcome {
    pub fn sent(&self) -> usize {
        match self {
            Self::Completed { sent } | Self::Failed { sent, .. } | Self::Disconnected { sent } => {
                *sent
            }
        }
    }
}

/// Push every document under `cursor` into `tx`, then close the cursor.
///
/// The cursor is closed on every exit path, including decode failures and a
/// dropped receiver.
pub async fn emit(mut cursor: Box<dyn DocumentCursor>, tx: &mpsc::Sender<ListFrame>) -> EmitOutcome {
    let outcome = pump(cursor.as_mut(), tx).await;
    cursor.close().await;
    outcome
}

async fn pump(cursor: &mut dyn DocumentCursor, tx: &mpsc::Sender<ListFrame>) -> EmitOutcome {
    let mut sent = 0;
    loop {
        match cursor.advance().await {
            Ok(true) => {}
            Ok(false) => return EmitOutcome::Completed { sent },
            Err(e) => {
                return EmitOutcome::Failed {
                    sent,
                    error: ServiceError::Internal(format!("cursor failed: {e}")),
                }
            }
        }

        let Some(stored) = cursor.current() else {
            return EmitOutcome::Failed {
                sent,
                error: ServiceError::Internal("cursor advanced without a document".into()),
            };
        };
        let doc = match BlogDocument::decode(stored) {
            Ok(doc) => doc,
            Err(e) => {
                return EmitOutcome::Failed {
                    sent,
                    error: ServiceError::Internal(format!("failed to decode blog: {e}")),
                }
            }
        };

        let frame = ListFrame::Blog { blog: mapper::to_record(&doc) };
        // A frame the body cannot encode must fail here, while an error frame
        // can still follow it.
        if let Err(e) = FrameCodec::encode(&frame) {
            return EmitOutcome::Failed {
                sent,
                error: ServiceError::Internal(format!("failed to frame blog: {e}")),
            };
        }
        if tx.send(frame).await.is_err() {
            return EmitOutcome::Disconnected { sent };
        }
        sent += 1;
    }
}

/// Run [`emit`] on its own task and return the receiving end.
///
/// A failed stream ends with one `ListFrame::Error` after the items that
/// were already sent. A completed stream just closes the channel.
pub fn spawn_emitter(cursor: Box<dyn DocumentCursor>, buffer: usize) -> mpsc::Receiver<ListFrame> {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    tokio::spawn(async move {
        match emit(cursor, &tx).await {
            EmitOutcome::Completed { sent } => debug!(sent, "list stream completed"),
            EmitOutcome::Disconnected { sent } => debug!(sent, "list receiver dropped, stream stopped"),
            EmitOutcome::Failed { sent, error } => {
                error!(sent, %error, "list stream failed");
                let frame = ListFrame::Error {
                    code: error.kind(),
                    message: error.message().to_string(),
                };
                if tx.send(frame).await.is_err() {
                    debug!("list receiver dropped before error frame");
                }
            }
        }
    });
    rx
}
