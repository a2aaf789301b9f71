use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{load_outline, LoadedTree};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{KindCounter, LeafCollector, NodeId, NodeKind, Renderer, TreeRender};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `arbor --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    if !settings.color {
        colored::control::set_override(false);
    }

    if let Commands::Count { .. } = command {
        output::header("node counts");
    }
    output::rows(&render_command(command, &settings)?);
    Ok(())
}

/// Output lines of a data command, without printing them.
#[instrument(level = "debug", skip(settings))]
pub fn render_command(command: &Commands, settings: &Settings) -> CliResult<Vec<String>> {
    match command {
        Commands::Measure { file, node } => _measure(file, node.as_deref()),
        Commands::Describe {
            file,
            node,
            max_depth,
        } => _describe(file, node.as_deref(), *max_depth, settings),
        Commands::Tree { file } => _tree(file),
        Commands::Walk { file, postorder } => _walk(file, *postorder),
        Commands::Count { file } => _count(file),
        Commands::Leaves { file } => _leaves(file),
        Commands::Find { file, label } => _find(file, label),
        Commands::Completion { .. } => Err(CliError::InvalidArgs(
            "completion produces no lines".to_string(),
        )),
    }
}

fn start_node(loaded: &LoadedTree, node: Option<&str>) -> CliResult<NodeId> {
    match node {
        Some(label) => Ok(loaded.find(label)?),
        None => Ok(loaded.root),
    }
}

fn _measure(file: &Path, node: Option<&str>) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let start = start_node(&loaded, node)?;
    let total = loaded.tree.measure(start)?;
    debug!(%start, total, "measured");
    Ok(vec![total.to_string()])
}

fn _describe(
    file: &Path,
    node: Option<&str>,
    max_depth: Option<usize>,
    settings: &Settings,
) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let start = start_node(&loaded, node)?;
    let mut renderer = Renderer::new(settings.describe_style(), 0);
    if let Some(max) = max_depth {
        renderer = renderer.with_max_depth(max);
    }
    loaded.tree.accept(start, &mut renderer)?;
    Ok(renderer.lines)
}

fn _tree(file: &Path) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let rendered = loaded.tree.to_tree_string(loaded.root)?.to_string();
    Ok(rendered.lines().map(str::to_string).collect())
}

fn _walk(file: &Path, postorder: bool) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let tree = &loaded.tree;
    if postorder {
        return Ok(tree
            .iter_postorder(loaded.root)
            .map(|node| node.label().to_string())
            .collect());
    }
    let mut cursor = tree.cursor(loaded.root)?;
    let ids = cursor.collect_remaining(tree)?;
    ids.into_iter()
        .map(|id| Ok(tree.node(id)?.label().to_string()))
        .collect()
}

fn _count(file: &Path) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let mut counter = KindCounter::new();
    loaded.tree.accept(loaded.root, &mut counter)?;
    let mut lines: Vec<String> = NodeKind::ALL
        .iter()
        .map(|&kind| format!("{}: {}", kind, counter.get(kind)))
        .collect();
    lines.push(format!("total: {}", counter.total()));
    Ok(lines)
}

fn _leaves(file: &Path) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let mut collector = LeafCollector::new();
    loaded.tree.accept(loaded.root, &mut collector)?;
    Ok(collector.labels)
}

/// Prints the root-to-node label path of the first match.
fn _find(file: &Path, label: &str) -> CliResult<Vec<String>> {
    let loaded = load_outline(file)?;
    let found = loaded.find(label)?;

    let mut path = Vec::new();
    let mut current = Some(found);
    while let Some(id) = current {
        let node = loaded.tree.node(id)?;
        path.push(node.label().to_string());
        current = node.parent();
    }
    Ok(vec![path.iter().rev().join("/")])
}
