//! # webiar
//!
//! Terminal front-end for the webiar web-modifier worker. Relays chat
//! instructions over WebSocket, keeps the HTML document in sync with
//! the worker, and serves it on a local preview URL.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webiar_client::{
    ChatSession, ConnectOptions, ConnectionState, IgnoreReason, SessionEvent, SubmitOutcome,
    run_supervisor,
};
use webiar_core::{ChatMessage, Role};
use webiar_preview::{PreviewConfig, PreviewServer};

/// Chat front-end for the webiar web-modifier worker.
#[derive(Parser, Debug)]
#[command(name = "webiar", about = "Chat front-end for the webiar web-modifier worker")]
struct Cli {
    /// Worker WebSocket URL (overrides settings).
    #[arg(long)]
    server_url: Option<String>,

    /// Preview server host (overrides settings).
    #[arg(long)]
    preview_host: Option<String>,

    /// Preview server port, 0 for auto-assign (overrides settings).
    #[arg(long)]
    preview_port: Option<u16>,

    /// Path to the settings file (default `~/.webiar/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_file = args
        .settings
        .clone()
        .unwrap_or_else(webiar_settings::settings_path);
    let mut settings =
        webiar_settings::load_settings_from_path(&settings_file).unwrap_or_default();

    // CLI flags win over file and env.
    if let Some(url) = args.server_url {
        settings.server.url = url;
    }
    if let Some(host) = args.preview_host {
        settings.preview.host = host;
    }
    if let Some(port) = args.preview_port {
        settings.preview.port = port;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        url = %settings.server.url,
        reconnect_delay_ms = settings.server.reconnect_delay_ms,
        "starting webiar client"
    );

    // Channels between the session, the connection, and this loop.
    let (outbound_tx, outbound_rx) = mpsc::channel(64);
    let (inbound_tx, mut inbound_rx) = mpsc::channel(64);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (status_tx, mut status_rx) = watch::channel(ConnectionState::Connecting);
    let cancel = CancellationToken::new();

    let mut session = ChatSession::new(outbound_tx, events_tx);

    // Local preview of the live document.
    let preview = PreviewServer::new(
        PreviewConfig {
            host: settings.preview.host.clone(),
            port: settings.preview.port,
        },
        session.document(),
    );
    let (preview_addr, preview_handle) = preview
        .listen()
        .await
        .context("failed to start preview server")?;
    println!("Preview: http://{preview_addr}/");
    println!("Commands: /html <markup> replaces the editor, /quit exits.\n");

    let supervisor = tokio::spawn(run_supervisor(
        ConnectOptions {
            url: settings.server.url.clone(),
            reconnect_delay: Duration::from_millis(settings.server.reconnect_delay_ms),
        },
        outbound_rx,
        inbound_tx,
        status_tx,
        cancel.clone(),
    ));

    // The session starts with the assistant greeting; show it.
    for message in session.history().messages() {
        print_message(message);
    }
    render_status(*status_rx.borrow_and_update());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    // EOF: the terminal went away.
                    cancel.cancel();
                    break;
                };
                if !handle_line(&mut session, &line) {
                    cancel.cancel();
                    break;
                }
            }
            frame = inbound_rx.recv() => {
                let Some(frame) = frame else { break };
                session.handle_frame(frame);
            }
            event = events_rx.recv() => {
                let Some(event) = event else { break };
                render_event(&event);
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                render_status(*status_rx.borrow_and_update());
            }
        }
    }

    preview_handle.abort();
    let _ = supervisor.await;
    info!("shut down");
    Ok(())
}

/// Handle one line of user input. Returns `false` on `/quit`.
fn handle_line(session: &mut ChatSession, line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed == "/quit" || trimmed == "/exit" {
        return false;
    }
    if let Some(html) = trimmed.strip_prefix("/html ") {
        let revision = session.set_editor_html(html);
        println!("(editor replaced, revision {revision})");
        return true;
    }
    match session.submit(line) {
        SubmitOutcome::Sent | SubmitOutcome::Ignored(IgnoreReason::EmptyInput) => {}
        SubmitOutcome::Ignored(IgnoreReason::Busy) => {
            println!("(a message is still being sent, try again)");
        }
    }
    true
}

fn render_event(event: &SessionEvent) {
    match event {
        // The user's own line was just typed; only echo assistant entries.
        SessionEvent::MessageAppended(message) if message.role == Role::Assistant => {
            print_message(message);
        }
        SessionEvent::MessageAppended(_) => {}
        SessionEvent::TypingStarted => println!("(assistant is typing…)"),
        SessionEvent::TypingStopped => {}
    }
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("[{who}] {}", message.content);
}

fn render_status(state: ConnectionState) {
    match state {
        ConnectionState::Connecting => println!("(connecting…)"),
        ConnectionState::Online => println!("(online)"),
        ConnectionState::OfflineRetrying => println!("(offline, reconnecting)"),
    }
}
