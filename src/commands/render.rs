//! # Render Command Implementation
//!
//! Non-interactive counterpart of the menu: fetches the primary document at
//! `--tag` and the overlay, merges them, selects projects by name and writes
//! (or prints) the curated manifest.
//!
//! ```bash
//! west-curate render --tag v3.6.0 --select cmsis --select hal_nordic
//! west-curate render --all --stdout
//! ```
//!
//! Every `--select` name must match a merged project. A name that matches
//! several entries (a project present in both documents) selects all of
//! them.

use anyhow::{bail, Result};
use clap::Args;

use west_curate::fetch::{DocumentFetcher, HttpFetcher};
use west_curate::merge::merge_manifests;
use west_curate::output::OutputConfig;
use west_curate::progress::WithSpinner;
use west_curate::tool;
use west_curate::version::Tag;
use west_curate::writer::ManifestWriter;

use super::{spinners_visible, SourceArgs};

/// Compose the manifest without interaction
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Tag of the primary document.
    #[arg(short, long, value_name = "TAG", default_value = west_curate::defaults::MAIN_TAG)]
    pub tag: String,

    /// Project to include; repeat for several.
    #[arg(
        short,
        long = "select",
        value_name = "NAME",
        required_unless_present = "all",
        conflicts_with = "all"
    )]
    pub select: Vec<String>,

    /// Include every project.
    #[arg(long)]
    pub all: bool,

    /// Print the manifest instead of writing it.
    #[arg(long)]
    pub stdout: bool,
}

/// Execute the `render` command.
pub fn execute(args: RenderArgs, output: OutputConfig) -> Result<()> {
    let settings = args.source.settings()?;
    let tag = Tag::new(args.tag.as_str());
    let fetcher = WithSpinner::new(
        HttpFetcher::new(settings.token_env.clone()),
        spinners_visible(),
    );

    let primary = fetcher.fetch(&settings.primary_url_for(&tag), false)?;
    let overlay = fetcher.fetch(&settings.overlay_url, settings.overlay_authenticated)?;
    let mut merged = merge_manifests(&primary, &overlay);

    if args.all {
        for project in &mut merged.projects {
            project.selected = true;
        }
    } else {
        let unknown = merged.select_by_name(&args.select);
        if !unknown.is_empty() {
            bail!(
                "unknown project(s) at {}: {}\n  hint: run with --all --stdout to see every project",
                tag,
                unknown.join(", ")
            );
        }
    }

    let writer = ManifestWriter::from_settings(&settings);
    if args.stdout {
        print!("{}", writer.render(&merged, &tag)?);
        return Ok(());
    }

    let outcome = writer.write(&merged, &tag)?;
    let path = outcome.path.display().to_string();
    println!(
        "{} Saved {} projects at {} to {}",
        output.ok(),
        merged.selected_count(),
        output.tag(tag.as_str()),
        output.path(&path)
    );
    if outcome.changed {
        let hint = if tool::is_available(&settings.update_tool) {
            format!("Run `{} update` to fetch the selected projects", settings.update_tool)
        } else {
            format!(
                "Install {} and run `{} update` to fetch the selected projects",
                settings.update_tool, settings.update_tool
            )
        };
        println!("{} {}", output.hint(), hint);
    }
    Ok(())
}
