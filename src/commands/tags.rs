//! # Tags Command Implementation
//!
//! Lists the tags the interactive menu would offer: `main` followed by the
//! compliant release tags of the tag repository, newest first.
//!
//! When the repository cannot be listed only `main` is printed, with a
//! warning on stderr. The command still succeeds; the interactive flow
//! behaves the same way.

use anyhow::Result;
use clap::Args;

use west_curate::git::SystemGit;
use west_curate::output::OutputConfig;
use west_curate::progress::WithSpinner;
use west_curate::version::discover_tags;

use super::{spinners_visible, SourceArgs};

/// List selectable tags
#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print machine-readable JSON instead of one tag per line.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `tags` command.
pub fn execute(args: TagsArgs, output: OutputConfig) -> Result<()> {
    let settings = args.source.settings()?;
    let lister = WithSpinner::new(SystemGit, spinners_visible() && !args.json);
    let discovery = discover_tags(&lister, &settings.tag_repository);

    if args.json {
        let report = serde_json::json!({
            "repository": settings.tag_repository,
            "tags": discovery.tags.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            "degraded": discovery.is_degraded(),
            "warning": discovery.warning.as_ref().map(|w| w.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(warning) = &discovery.warning {
        eprintln!("{} Could not list tags, only main is available: {}", output.warn(), warning);
    }
    for tag in &discovery.tags {
        println!("{}", tag);
    }
    Ok(())
}
