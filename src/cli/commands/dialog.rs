use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::{Credential, CredentialId, CredentialKind, CredentialService};
use crate::dialog::{DialogContext, DialogEvent, OpenSignal};
use crate::tui::{DialogRuntime, Theme};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Args)]
pub struct AddArgs {
    /// Source type the credential authenticates against
    #[arg(long, default_value = "network")]
    pub kind: CredentialKind,
}

#[derive(Args)]
pub struct EditArgs {
    /// Id of the credential to edit
    pub id: CredentialId,
}

pub async fn add_command(args: AddArgs, context: DialogContext, settle_timeout: Duration) -> Result<()> {
    run_dialog(OpenSignal::Create { kind: args.kind }, context, settle_timeout).await
}

pub async fn edit_command(args: EditArgs, context: DialogContext, settle_timeout: Duration) -> Result<()> {
    let credential = find_credential(context.service.as_ref(), args.id).await?;
    run_dialog(OpenSignal::Edit { credential }, context, settle_timeout).await
}

/// Fetch the credential to edit directly by id
pub async fn find_credential(service: &dyn CredentialService, id: CredentialId) -> Result<Credential> {
    service
        .get_credential(id)
        .await
        .with_context(|| format!("Credential {} not found", id))
}

async fn run_dialog(signal: OpenSignal, context: DialogContext, settle_timeout: Duration) -> Result<()> {
    let mut runtime = DialogRuntime::new(context);
    runtime.open(signal);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut runtime).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    // Refreshes started by a successful save finish after the dialog closes
    if runtime.has_pending()
        && tokio::time::timeout(settle_timeout, runtime.settle()).await.is_err()
    {
        log::warn!("Timed out waiting for credential list refresh");
    }

    report(runtime.take_events());
    Ok(())
}

async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, runtime: &mut DialogRuntime) -> Result<()> {
    let theme = Theme::default();

    while runtime.is_open() {
        terminal.draw(|frame| runtime.render(frame, &theme))?;

        // Process all pending events before the next frame
        let mut timeout = FRAME;
        while runtime.is_open() && event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    runtime.handle_key(key);
                }
            }
            timeout = Duration::ZERO;
        }

        runtime.poll_async();
        // Let the IO driver make progress on in-flight requests
        tokio::task::yield_now().await;
    }

    Ok(())
}

/// What the user is told once the dialog is gone
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Saved(String),
    Listed(u64),
    ClosedUnconfirmed,
}

fn summarize(events: Vec<DialogEvent>) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    for event in events {
        match event {
            DialogEvent::Notification(notification) => outcomes.push(Outcome::Saved(notification.message)),
            DialogEvent::CredentialsRefreshed(page) => outcomes.push(Outcome::Listed(page.count)),
            DialogEvent::WizardCredentialsRefreshed(credentials) => {
                log::debug!("{} credentials available to the source wizard", credentials.len());
            }
        }
    }

    // A save abandoned mid-flight may still have been applied by the server
    if !outcomes.iter().any(|outcome| matches!(outcome, Outcome::Saved(_))) {
        outcomes.push(Outcome::ClosedUnconfirmed);
    }
    outcomes
}

fn report(events: Vec<DialogEvent>) {
    for outcome in summarize(events) {
        match outcome {
            Outcome::Saved(message) => println!("{} {}", "✓".bright_green().bold(), message.green()),
            Outcome::Listed(count) => println!("{}", format!("{} credentials in listing", count).dimmed()),
            Outcome::ClosedUnconfirmed => println!("{}", "Dialog closed before a save was confirmed".yellow()),
        }
    }
}
