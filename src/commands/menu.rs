//! # Menu Command Implementation
//!
//! The interactive entry point, and the default when no subcommand is given.
//!
//! 1. A main menu offers "Manage Manifest Components" and "Quit".
//! 2. Managing components discovers tags, fetches both documents and opens
//!    the full-screen project view (see [`super::screen`]).
//! 3. After the view closes, if a save changed the manifest, the update tool
//!    (`west` by default) is offered. Its output is streamed as it runs.
//!
//! Failures while loading the documents are reported and the main menu is
//! shown again; nothing is retried automatically.

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use std::io::IsTerminal;

use west_curate::fetch::HttpFetcher;
use west_curate::git::SystemGit;
use west_curate::output::OutputConfig;
use west_curate::progress::WithSpinner;
use west_curate::session::Session;
use west_curate::tool::{self, Stream};
use west_curate::writer::ManifestWriter;

use super::{screen, spinners_visible, SourceArgs};

const MANAGE: &str = "Manage Manifest Components";
const QUIT: &str = "Quit";

/// Pick projects interactively and save the manifest
#[derive(Args, Debug, Default)]
pub struct MenuArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `menu` command.
pub fn execute(args: MenuArgs, output: OutputConfig) -> Result<()> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        bail!("the interactive menu needs a terminal\n  hint: use `west-curate render` in scripts");
    }
    let settings = args.source.settings()?;
    let theme = ColorfulTheme::default();

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("west-curate")
            .items(&[MANAGE, QUIT])
            .default(0)
            .interact_opt()?;

        match choice {
            Some(0) => {
                if let Some(changed) = manage(&settings, output)? {
                    if changed {
                        offer_update(&settings.update_tool, &theme, output)?;
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

/// Load a session and run the project view.
///
/// Returns `None` when the documents could not be loaded, otherwise whether
/// any save changed the manifest.
fn manage(settings: &west_curate::config::Settings, output: OutputConfig) -> Result<Option<bool>> {
    let visible = spinners_visible();
    let fetcher = WithSpinner::new(HttpFetcher::new(settings.token_env.clone()), visible);
    let lister = WithSpinner::new(SystemGit, visible);

    let mut session = match Session::bootstrap(settings.clone(), fetcher, &lister) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{} {}", output.warn(), style(&err).red());
            return Ok(None);
        }
    };
    if let Some(warning) = session.tag_warning() {
        eprintln!("{} Could not list tags, only main is available: {}", output.warn(), warning);
    }

    let writer = ManifestWriter::from_settings(settings);
    let outcome = screen::run(&mut session, &writer, output)?;
    Ok(Some(outcome.saved_changes))
}

fn offer_update(tool_name: &str, theme: &ColorfulTheme, output: OutputConfig) -> Result<()> {
    if !tool::is_available(tool_name) {
        println!(
            "{} {} not found on PATH. Run `{} update` yourself to fetch the selected projects.",
            output.hint(),
            tool_name,
            tool_name
        );
        return Ok(());
    }

    let run = Confirm::with_theme(theme)
        .with_prompt(format!("The manifest changed. Run `{} update` now?", tool_name))
        .default(true)
        .interact()?;
    if !run {
        println!(
            "{} Run `{} update` later to fetch the selected projects.",
            output.hint(),
            tool_name
        );
        return Ok(());
    }

    let status = tool::run_streaming(tool_name, ["update"], |line| match line.stream {
        Stream::Stdout => println!("{}", line.text),
        Stream::Stderr => eprintln!("{}", style(&line.text).dim()),
    })?;

    if status.success() {
        println!("{} {} update finished", output.ok(), tool_name);
    } else {
        eprintln!("{} {} update exited with {}", output.warn(), tool_name, status);
    }
    Ok(())
}
