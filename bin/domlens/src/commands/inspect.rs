use anyhow::{anyhow, Context};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use domlens_coordinator::Coordinator;
use domlens_core::{Config, CoordinatorReply, CoordinatorRequest, Envelope, InspectorCommand, Paths};
use domlens_dom::{parse_document, NodeId};
use domlens_inspector::{
    DriverRequest, EventEnvelope, EventType, InspectorContext, Page, PageEvent,
};
use domlens_panel::{PanelAction, PanelBridge};
use domlens_storage::CredentialStore;

/// Channel ends the REPL holds onto. `sidebar_tx` stands in for the
/// browser delivering the toolbar-icon instruction to the page context.
struct Session {
    coordinator_tx: mpsc::Sender<Envelope>,
    driver_tx: mpsc::Sender<DriverRequest>,
    actions_tx: mpsc::Sender<PanelAction>,
    sidebar_tx: mpsc::Sender<InspectorCommand>,
}

pub async fn run(source: String, url: Option<String>) -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = Config::load_or_default(&paths)?;

    let (html, fetched_url) = load_source(&source).await?;
    let page_url = url.unwrap_or(fetched_url);

    if !config.is_allowed_url(&page_url) {
        println!(
            "note: {} is not in the allow-list; the inspector stays inactive on this page",
            page_url
        );
    }

    let page = Page::new(parse_document(&html), &page_url, &config.page);

    // Wire the three contexts. Every channel below is the only way the
    // contexts can reach each other.
    let (coordinator_tx, coordinator_rx) = mpsc::channel::<Envelope>(32);
    let (inspector_cmd_tx, inspector_cmd_rx) = mpsc::channel(32);
    let (driver_tx, driver_rx) = mpsc::channel(32);
    let (to_panel_tx, to_panel_rx) = mpsc::channel(32);
    let (to_inspector_tx, to_inspector_rx) = mpsc::channel(32);
    let (actions_tx, actions_rx) = mpsc::channel(32);

    let store = CredentialStore::new(paths);
    let coordinator = Coordinator::new(store, inspector_cmd_tx.clone());
    tokio::spawn(coordinator.run(coordinator_rx));

    let inspector = InspectorContext::new(page, &config, coordinator_tx.clone(), to_panel_tx);
    tokio::spawn(inspector.run(inspector_cmd_rx, driver_rx, to_inspector_rx));

    let bridge = PanelBridge::new(coordinator_tx.clone(), to_inspector_tx);
    tokio::spawn(bridge.run(to_panel_rx, actions_rx));

    let session = Session {
        coordinator_tx,
        driver_tx,
        actions_tx,
        sidebar_tx: inspector_cmd_tx,
    };

    println!("inspecting {} ({} bytes)", page_url, html.len());
    println!("type `help` for commands");
    repl(session).await
}

async fn load_source(source: &str) -> anyhow::Result<(String, String)> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::get(source)
            .await
            .with_context(|| format!("failed to fetch {}", source))?;
        let final_url = response.url().to_string();
        let html = response.text().await.context("failed to read page body")?;
        Ok((html, final_url))
    } else {
        let html = std::fs::read_to_string(source)
            .with_context(|| format!("failed to read {}", source))?;
        Ok((html, format!("file://{}", source)))
    }
}

async fn repl(session: Session) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"domlens> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let arg = parts.next();

        match (command, arg) {
            ("help", _) => print_help(),
            ("quit", _) | ("exit", _) => break,
            ("toggle", _) => {
                session.actions_tx.send(PanelAction::ToggleInspection).await?;
            }
            ("hover", Some(sel)) => dispatch(&session, EventType::MouseOver, sel).await?,
            ("leave", Some(sel)) => dispatch(&session, EventType::MouseOut, sel).await?,
            ("click", Some(sel)) => dispatch(&session, EventType::Click, sel).await?,
            ("panel", _) => {
                let (reply, rx) = oneshot::channel();
                session.actions_tx.send(PanelAction::Render { reply }).await?;
                for line in rx.await? {
                    println!("{}", line);
                }
            }
            ("expand", Some(path)) | ("collapse", Some(path)) => {
                session
                    .actions_tx
                    .send(PanelAction::ToggleExpand {
                        path: path.to_string(),
                    })
                    .await?;
            }
            ("sidebar", _) => {
                session
                    .sidebar_tx
                    .send(InspectorCommand::ToggleSidebar)
                    .await
                    .map_err(|_| anyhow!("page context unavailable"))?;
            }
            ("close", _) => {
                session.actions_tx.send(PanelAction::ClosePanel).await?;
            }
            ("login", Some(user_id)) => {
                let (envelope, rx) = Envelope::call(CoordinatorRequest::LoginSucceeded {
                    user_id: user_id.to_string(),
                });
                session
                    .coordinator_tx
                    .send(envelope)
                    .await
                    .map_err(|_| anyhow!("coordinator unavailable"))?;
                match rx.await? {
                    CoordinatorReply::Ack { success: true } => println!("login recorded"),
                    _ => println!("{}", domlens_coordinator::ERR_SAVE_FAILED),
                }
            }
            ("state", _) => {
                let (envelope, rx) = Envelope::call(CoordinatorRequest::GetState);
                session
                    .coordinator_tx
                    .send(envelope)
                    .await
                    .map_err(|_| anyhow!("coordinator unavailable"))?;
                if let CoordinatorReply::State {
                    is_highlighting,
                    selection,
                } = rx.await?
                {
                    println!("isHighlighting: {}", is_highlighting);
                    match selection {
                        Some(snapshot) => println!(
                            "selection: <{}>{}",
                            snapshot.element.tag_name,
                            snapshot
                                .element
                                .id
                                .as_deref()
                                .map(|id| format!(" #{}", id))
                                .unwrap_or_default()
                        ),
                        None => println!("selection: none"),
                    }
                }
            }
            _ => println!("unknown command, try `help`"),
        }
    }
    Ok(())
}

/// Resolves a selector on the live page and dispatches one event to it,
/// reporting what the host page was told to do with it.
async fn dispatch(session: &Session, event_type: EventType, selector: &str) -> anyhow::Result<()> {
    let Some(target) = resolve(session, selector).await? else {
        println!("no element matches `{}`", selector);
        return Ok(());
    };

    let (envelope, outcome_rx) = EventEnvelope::call(PageEvent::new(event_type, target));
    session
        .driver_tx
        .send(DriverRequest::Dispatch(envelope))
        .await
        .map_err(|_| anyhow!("page context unavailable"))?;
    let outcome = outcome_rx.await?;

    if outcome.default_prevented {
        println!("{} on {} (default action suppressed)", event_type.name(), selector);
    } else {
        println!("{} on {}", event_type.name(), selector);
    }
    Ok(())
}

async fn resolve(session: &Session, selector: &str) -> anyhow::Result<Option<NodeId>> {
    let (reply, rx) = oneshot::channel();
    session
        .driver_tx
        .send(DriverRequest::Resolve {
            selector: selector.to_string(),
            reply,
        })
        .await
        .map_err(|_| anyhow!("page context unavailable"))?;
    match rx.await? {
        Ok(node) => Ok(node),
        Err(e) => {
            println!("{}", e);
            Ok(None)
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  toggle            flip inspection mode from the panel");
    println!("  hover <sel>       move the pointer onto the first match");
    println!("  leave <sel>       move the pointer off the element");
    println!("  click <sel>       click the element (captures while inspecting)");
    println!("  panel             render the panel");
    println!("  expand <path>     expand/collapse a panel tree node (e.g. element.0)");
    println!("  collapse <path>   same as expand; the action toggles");
    println!("  sidebar           slide the panel host in or out (toolbar icon)");
    println!("  close             collapse the panel host");
    println!("  state             show the coordinator's canonical state");
    println!("  login <user-id>   simulate the external login signal");
    println!("  quit              leave");
}
