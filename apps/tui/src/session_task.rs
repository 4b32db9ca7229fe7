//! Channel-based session worker for the dashboard.
//!
//! The worker task owns the only driver of the contract session: commands
//! arrive on an unbounded channel, run to completion one at a time, and each
//! outcome goes back to the draw loop without blocking it.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use heirloom_abstraction::{IndexerClient, WalletProvider};
use heirloom_core::ContractSession;

/// Operations the view can ask the session worker to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Establish (or re-establish) the session.
    Connect,
    /// Best-effort ledger refresh.
    Refresh,
    /// Register an inheritance pair; addresses as entered by the user.
    Register { parent: String, child: String },
    /// Execute the inheritance.
    Execute,
}

/// Outcomes the worker reports back to the draw loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// `connect()` succeeded.
    Connected,
    /// A refresh replaced (or confirmed) the snapshot.
    Refreshed,
    /// A register/execute call reached finality.
    Finalized { operation: &'static str, tx_id: String },
    /// An operation failed; the message is already user-readable.
    Failed { operation: &'static str, message: String },
}

/// Spawn the session worker and return its command/event channel ends.
///
/// The session stays shared: the caller keeps reading status and snapshots
/// directly off the `Arc` while the worker is the only issuer of operations.
pub fn spawn_session_worker<W, I>(
    session: Arc<ContractSession<W, I>>,
) -> (UnboundedSender<SessionCommand>, UnboundedReceiver<SessionEvent>)
where
    W: WalletProvider + 'static,
    I: IndexerClient + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<SessionCommand>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();

    tokio::spawn(async move {
        while let Some(command) = cmd_rx.recv().await {
            debug!(?command, "Session worker running command");
            let event = match command {
                SessionCommand::Connect => match session.connect().await {
                    Ok(()) => SessionEvent::Connected,
                    Err(err) => {
                        SessionEvent::Failed { operation: "connect", message: err.to_string() }
                    }
                },
                SessionCommand::Refresh => match session.refresh().await {
                    Ok(()) => SessionEvent::Refreshed,
                    Err(err) => {
                        SessionEvent::Failed { operation: "refresh", message: err.to_string() }
                    }
                },
                SessionCommand::Register { parent, child } => {
                    match session.register(&parent, &child).await {
                        Ok(tx_id) => {
                            SessionEvent::Finalized { operation: "register", tx_id: tx_id.0 }
                        }
                        Err(err) => {
                            SessionEvent::Failed { operation: "register", message: err.to_string() }
                        }
                    }
                }
                SessionCommand::Execute => match session.execute().await {
                    Ok(tx_id) => SessionEvent::Finalized { operation: "execute", tx_id: tx_id.0 },
                    Err(err) => {
                        SessionEvent::Failed { operation: "execute", message: err.to_string() }
                    }
                },
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
    });

    (cmd_tx, event_rx)
}
