//! recart command line interface
//!
//! Offline tooling around the selector registry and diff engine: validate a
//! directory of selector packs, diff two snapshot files, and export the JSON
//! schemas of the on-disk formats. Nothing here touches a browser.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use recart::diff::{self, CartDiff};
use recart::extract::{CartItem, OrderItem};
use recart::selectors::{PageSelectorFile, SelectorIndex, SelectorRegistry};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "recart", version, about = "Selector pack validation and cart reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every selector pack in a directory and report what registered
    Validate {
        /// Directory containing `index.json` plus one JSON file per page version
        dir: PathBuf,
    },

    /// Diff a baseline order snapshot against a current cart snapshot
    Diff {
        /// JSON file with an array of order items
        #[arg(long)]
        baseline: PathBuf,

        /// JSON file with an array of cart items
        #[arg(long)]
        current: PathBuf,

        /// Print the full diff as JSON instead of the human summary
        #[arg(long)]
        json: bool,

        /// Price delta above which the exit code signals attention needed
        #[arg(long, default_value_t = 10.0)]
        threshold: f64,
    },

    /// Print the JSON schema for an on-disk format
    Schema {
        #[arg(long, value_enum, default_value_t = SchemaTarget::Selectors)]
        target: SchemaTarget,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaTarget {
    /// Per-page selector pack document
    Selectors,
    /// Master index document
    Index,
    /// Diff output record
    Diff,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate { dir } => validate(&dir),
        Command::Diff { baseline, current, json, threshold } => {
            run_diff(&baseline, &current, json, threshold)
        }
        Command::Schema { target } => {
            let schema = match target {
                SchemaTarget::Selectors => schemars::schema_for!(PageSelectorFile),
                SchemaTarget::Index => schemars::schema_for!(SelectorIndex),
                SchemaTarget::Diff => schemars::schema_for!(CartDiff),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn validate(dir: &Path) -> anyhow::Result<()> {
    let index_path = dir.join("index.json");
    let index_json = std::fs::read_to_string(&index_path)
        .with_context(|| format!("reading {}", index_path.display()))?;
    let index = SelectorIndex::from_json(&index_json)?;

    let mut registry = SelectorRegistry::new();
    let mut loaded = 0usize;

    for file in sorted_pack_files(dir)? {
        let json = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let pack = PageSelectorFile::from_json(&json)
            .with_context(|| format!("parsing {}", file.display()))?;

        let page = pack.page.clone();
        let version = pack.version;
        registry
            .register(pack.into_set()?)
            .with_context(|| format!("registering {}", file.display()))?;
        println!("ok: {} v{}", page, version);
        loaded += 1;
    }

    if loaded == 0 {
        bail!("no selector packs found in {}", dir.display());
    }

    // Pin every page the index names, so a stale index fails here and not in
    // production
    let pages: Vec<String> = registry.list_pages().iter().map(|p| p.to_string()).collect();
    for page in pages {
        match index.active(&page) {
            Some(version) => registry
                .pin(&page, version)
                .with_context(|| format!("index activates {} v{}", page, version))?,
            None => bail!("page '{}' has packs but no index entry", page),
        }
    }

    println!("{} packs registered, index consistent", loaded);
    Ok(())
}

/// Pack files in name order, so version conflicts surface deterministically
fn sorted_pack_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|name| name != "index.json")
        })
        .collect();
    files.sort();
    Ok(files)
}

fn run_diff(baseline: &Path, current: &Path, json: bool, threshold: f64) -> anyhow::Result<()> {
    let baseline_items: Vec<OrderItem> = read_snapshot(baseline)?;
    let current_items: Vec<CartItem> = read_snapshot(current)?;

    let result = diff::diff_carts(&baseline_items, &current_items);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", diff::summarize(&result));
        println!(
            "baseline availability: {:.0}%",
            diff::availability_percentage(&result, baseline_items.len())
        );
    }

    if diff::requires_user_attention(&result, threshold) {
        std::process::exit(2);
    }
    Ok(())
}

fn read_snapshot<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}
