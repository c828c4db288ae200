//! Minimal terminal host for the widget core.
//!
//! Reads commands from stdin, feeds them to the widget as typed text, and
//! prints the event stream to stdout. Useful for exercising the core against
//! a running assistant service without any UI.
//!
//! Environment:
//! - `ORION_API_URL`: assistant service base URL (default `http://localhost:5000`)
//! - `ORION_CONFIG_DIR`: settings directory override
//! - `RUST_LOG`: log filter (logs go to stderr)

use anyhow::Result;
use orion::command::KeywordMatcher;
use orion::{
    AssistantClient, SettingsStore, SystemOpener, UiIntent, Widget, WidgetEvent, WidgetParts,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let base_url =
        std::env::var("ORION_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    tracing::info!(%base_url, "starting shell");

    let client = AssistantClient::new(base_url);
    let store = SettingsStore::new(SettingsStore::default_path());
    let (mut widget, mut events) = Widget::new(
        client,
        store,
        WidgetParts {
            recognition: None,
            synthesis: None,
            opener: Arc::new(SystemOpener),
            matcher: Arc::new(KeywordMatcher),
        },
    );

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if line == "/new" {
            widget.handle_intent(UiIntent::NewQuestion).await?;
            continue;
        }
        if line == "/go" {
            widget.handle_intent(UiIntent::ActivatePendingAction).await?;
            continue;
        }
        widget.handle_intent(UiIntent::SubmitText(line)).await?;
    }

    Ok(())
}

fn print_event(event: &WidgetEvent) {
    match event {
        WidgetEvent::Status(s) => println!("[status] {s}"),
        WidgetEvent::UserMessage { text, timestamp } => match timestamp {
            Some(ts) => println!("[you {}] {text}", ts.format("%H:%M:%S")),
            None => println!("[you] {text}"),
        },
        WidgetEvent::RevealChar(c) => {
            print!("{c}");
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
        WidgetEvent::RevealFinished => println!(),
        WidgetEvent::PendingActionOffered(action) => {
            println!("[action] {} -> {} (type /go)", action.button_label, action.url);
        }
        WidgetEvent::Warning(w) => println!("[warning] {w}"),
        _ => {}
    }
}
