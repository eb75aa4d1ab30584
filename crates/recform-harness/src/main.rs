#![forbid(unsafe_code)]

//! Line-oriented driver for one recform screen.
//!
//! ```text
//! RECFORM_STORE_PATH=/tmp/records.json recform cartao
//! ```
//!
//! Commands are read from stdin one per line (`help` lists them). Field
//! views and notifications go to stdout, logs go to stderr.

mod command;

use std::fmt::Write as _;
use std::sync::Arc;

use recform::prelude::*;
use recform::RecordKeyTable;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};

#[tokio::main(flavor = "current_thread")]
async fn main() -> recform::Result<()> {
    let parsed = RecformConfig::from_env();
    init_logging(&parsed.config.log_filter);
    for err in &parsed.errors {
        tracing::warn!(%err, "ignoring environment value");
    }
    let config = parsed.config;

    let screen = match std::env::args().nth(1) {
        Some(arg) => Screen::parse(&arg)
            .ok_or_else(|| recform::Error::Config(format!("unknown screen {arg:?}")))?,
        None => config.screen.ok_or_else(|| {
            recform::Error::Config(format!(
                "no screen given; pass one as the first argument or set {}",
                recform::config::ENV_SCREEN
            ))
        })?,
    };

    for collision in RecordKeyTable::new(config.key_policy).collisions() {
        tracing::warn!(%collision, policy = %config.key_policy, "screens share a record key");
    }

    let file_store = config.file_store();
    tracing::info!(screen = %screen, store = %file_store.path().display(), "opening");
    let store: Arc<dyn RecordStore> = Arc::new(file_store);
    let mut controller = recform::controller(screen, config.key_policy, store)?;
    controller.initialize().await;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(render(&mut controller, config.key_policy).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                stdout.write_all(format!("{err}\n").as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
        };
        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                stdout.write_all(format!("{HELP}\n").as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
            Command::Keys => {
                let text = render_keys(&RecordKeyTable::new(config.key_policy));
                stdout.write_all(text.as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
            Command::Show => None,
            Command::Edit => Some(controller.enable_edit()),
            Command::Set { field, raw } => Some(controller.change_field(&field, &raw)),
            Command::Save => Some(controller.submit().await),
            Command::Delete => Some(controller.delete().await),
            Command::Reload => Some(controller.initialize().await),
        };
        if let Some(outcome) = outcome {
            tracing::debug!(?outcome, "command finished");
            if let Outcome::Ignored(reason) = &outcome {
                stdout
                    .write_all(format!("(ignored: {reason:?})\n").as_bytes())
                    .await?;
            }
        }
        stdout
            .write_all(render(&mut controller, config.key_policy).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    Ok(())
}

fn init_logging(directive: &str) {
    let (filter, rejected) = log_filter(directive);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Some(err) = rejected {
        tracing::warn!(directive, %err, "invalid log filter, falling back to info");
    }
}

/// Parse a filter directive; an unparseable one yields `info` and the error.
fn log_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err.to_string())),
    }
}

/// Pending notifications followed by the field table.
fn render(controller: &mut RecordController, policy: KeyPolicy) -> String {
    let mut out = String::new();
    for note in controller.take_notifications() {
        let _ = writeln!(out, "{note}");
    }

    let machine = controller.machine();
    let _ = writeln!(
        out,
        "== {} [{}] key={} policy={}{}",
        machine.schema().title(),
        machine.phase(),
        machine.key(),
        policy,
        if machine.is_busy() { " (busy)" } else { "" },
    );
    let actions: Vec<&str> = [
        (machine.can_edit(), "edit"),
        (machine.can_submit(), "save"),
        (machine.can_delete(), "delete"),
    ]
    .into_iter()
    .filter_map(|(allowed, name)| allowed.then_some(name))
    .collect();
    let _ = writeln!(
        out,
        "actions: {}",
        if actions.is_empty() { "-".to_string() } else { actions.join(" ") }
    );
    for view in controller.fields() {
        let marker = match (view.enabled, view.dirty) {
            (_, true) => '*',
            (true, false) => ' ',
            (false, false) => '.',
        };
        let _ = write!(out, "{marker} {:<28} {:<22} {:?}", view.name, view.label, view.value);
        if !view.choices.is_empty() {
            let values: Vec<&str> = view.choices.iter().map(|c| c.value.as_str()).collect();
            let _ = write!(out, "  [{}]", values.join("|"));
        }
        if let Some(error) = &view.error {
            let _ = write!(out, "  ! {error}");
        }
        out.push('\n');
    }
    out
}

fn render_keys(table: &RecordKeyTable) -> String {
    let mut out = String::new();
    for (screen, key) in table.entries() {
        let _ = writeln!(out, "{:<16} {key}", screen.slug());
    }
    for collision in table.collisions() {
        let _ = writeln!(out, "warning: {collision}");
    }
    out
}
