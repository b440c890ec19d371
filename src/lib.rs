// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mindmap: tree layout and pointer interaction for a radial idea map

use anyhow::Result;
use clap::Parser;
use kurbo::Size;
use std::fmt::Write as _;
use std::path::PathBuf;

pub mod data;
pub mod editing;
pub mod layout;
pub mod model;
pub mod settings;

use data::AppState;
use model::{JsonFileStore, Node, Tree};
use settings::Preferences;

/// Install the tracing subscriber (can be controlled via RUST_LOG env var)
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mindmap=info"));
    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Print and maintain the stored mind maps
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Preferences file (TOML)
    #[arg(long, value_name = "FILE")]
    pub prefs: Option<PathBuf>,
    /// Node array to add as a new map before printing
    #[arg(long, value_name = "FILE")]
    pub import: Option<PathBuf>,
    /// Directory to export the open map into
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

/// Entry point for the `mindmap` binary: open the archive, lay out the
/// current map and print it as an indented outline.
pub fn run(args: CliArgs) -> Result<()> {
    let prefs_path = args.prefs.unwrap_or_else(|| PathBuf::from("mindmap.toml"));
    let prefs = Preferences::load(&prefs_path)?;

    let store = JsonFileStore::new(&prefs.store_path);
    let size = Size::new(prefs.viewport_width, prefs.viewport_height);
    let mut state = AppState::load(store, size);

    if let Some(path) = &args.import {
        let id = state.import_file(path)?;
        tracing::info!("Imported {} as {}", path.display(), id);
    }

    let title = state
        .archive
        .current()
        .map(|r| r.title.clone())
        .unwrap_or_default();
    println!("{title}");
    print!("{}", outline(&state.session.tree));

    if let Some(dir) = &args.export {
        let path = state.export_to_dir(dir)?;
        println!("Exported to {}", path.display());
    }

    state.save_current();
    if let Some(error) = state.error_message {
        anyhow::bail!(error);
    }
    Ok(())
}

/// Visible nodes as an indented list with positions and collapse markers
pub fn outline(tree: &Tree) -> String {
    let mut out = String::new();
    for root in tree.roots() {
        outline_node(tree, root, 0, &mut out);
    }
    out
}

fn outline_node(tree: &Tree, node: &Node, depth: usize, out: &mut String) {
    let mut marks = String::new();
    if node.collapsed_left {
        marks.push_str(" [+left]");
    }
    if node.collapsed_right {
        marks.push_str(" [+right]");
    }
    let _ = writeln!(
        out,
        "{:indent$}- {} ({:.0}, {:.0}){}",
        "",
        node.text,
        node.x,
        node.y,
        marks,
        indent = depth * 2
    );
    for child in layout::visible_children(tree, &node.id) {
        outline_node(tree, child, depth + 1, out);
    }
}
