use anyhow::anyhow;
use tokio::sync::mpsc;

use domlens_coordinator::{Coordinator, ERR_SAVE_FAILED};
use domlens_core::{CoordinatorReply, CoordinatorRequest, Envelope, Paths};
use domlens_storage::CredentialStore;

/// Plays the part of the sign-in page: delivers the external
/// LOGIN_SUCCESS signal to a coordinator and waits for the internal
/// broadcast that lets the popup leave its loading state.
pub async fn run(user_id: String) -> anyhow::Result<()> {
    let paths = Paths::new();
    paths.ensure_dirs()?;

    let store = CredentialStore::new(paths);
    // no page context in this flow; instructions to it are dropped
    let (inspector_tx, _inspector_rx) = mpsc::channel(8);
    let coordinator = Coordinator::new(store, inspector_tx);
    let mut signals = coordinator.login_signals();

    let (requests_tx, requests_rx) = mpsc::channel(8);
    tokio::spawn(coordinator.run(requests_rx));

    let (envelope, reply) = Envelope::call(CoordinatorRequest::LoginSucceeded { user_id });
    requests_tx
        .send(envelope)
        .await
        .map_err(|_| anyhow!("coordinator unavailable"))?;

    match reply.await? {
        CoordinatorReply::Ack { success: true } => {
            let signal = signals.recv().await?;
            println!("Signed in as {}", signal.user_id);
            println!("Run `domlens status` to verify the session.");
        }
        _ => {
            println!("{}", ERR_SAVE_FAILED);
        }
    }
    Ok(())
}
