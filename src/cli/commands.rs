//! Command dispatch

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::{NodeId, Record, TreeStore};
use crate::infrastructure::{load_store, InfraError};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        let mut cmd = Cli::command();
        cmd.print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => execute_config(cli, command),
        query => {
            let settings = resolve_settings(cli)?;
            let input = settings.input.clone().ok_or_else(|| {
                CliError::InvalidArgs(
                    "no node list given: pass --file or set `input` in .treestore.toml".into(),
                )
            })?;
            let store = load_store(&input, settings.strict)?;
            let rendered = run_query(query, &store, &settings, cli.string_ids)?;
            if !rendered.is_empty() {
                output::info(&rendered);
            }
            Ok(())
        }
    }
}

fn project_dir(cli: &Cli) -> PathBuf {
    cli.project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Layered settings with command line flags applied last.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(Some(&project_dir(cli)))?;
    Ok(apply_cli_overrides(settings, cli))
}

pub fn apply_cli_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(file) = &cli.file {
        settings.input = Some(file.clone());
    }
    if let Some(format) = cli.format {
        settings.format = format;
    }
    if cli.strict {
        settings.strict = true;
    }
    settings
}

/// Numeric-looking ids become integers unless `string_ids` is set.
pub fn parse_id(raw: &str, string_ids: bool) -> NodeId {
    if string_ids {
        return NodeId::from(raw);
    }
    match raw.parse::<NodeId>() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

/// Runs a query command and returns what should be printed.
#[instrument(level = "debug", skip(store, settings))]
pub fn run_query(
    command: &Commands,
    store: &TreeStore<Record>,
    settings: &Settings,
    string_ids: bool,
) -> CliResult<String> {
    let id = |raw: &String| parse_id(raw, string_ids);
    let format = settings.format;

    match command {
        Commands::All => render_nodes(store.get_all().iter(), format),
        Commands::Item { id: raw } => render_single(store.get_item(id(raw)), raw, "node", format),
        Commands::Children { id: raw } => render_nodes(store.get_children(id(raw)), format),
        Commands::Descendants { id: raw } => render_nodes(store.descendants(id(raw)), format),
        Commands::Parent { id: raw } => {
            render_single(store.get_parent(id(raw)), raw, "parent", format)
        }
        Commands::Ancestors { id: raw } => render_nodes(store.ancestors(id(raw)), format),
        Commands::Roots => render_nodes(store.roots(), format),
        Commands::Leaves { id: raw } => render_nodes(store.leaf_nodes(id(raw)), format),
        Commands::Depth { id: raw } => Ok(store.depth(id(raw)).to_string()),
        Commands::Tree { id: raw } => {
            let label = |node: &Record| node_label(node, settings.label_field.as_deref());
            let trees = match raw {
                Some(raw) => vec![store.to_tree_with(&id(raw), label)],
                None => store.forest_with(label),
            };
            debug!(trees = trees.len(), "rendering trees");
            Ok(trees.iter().map(|t| t.to_string()).join("").trim_end().to_string())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::InvalidArgs(
            "not a query command".to_string(),
        )),
    }
}

fn render_nodes<'a, I>(nodes: I, format: OutputFormat) -> CliResult<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let nodes: Vec<&Record> = nodes.into_iter().collect();
    match format {
        OutputFormat::Text => Ok(nodes
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n")),
        OutputFormat::Json => to_pretty(&nodes),
    }
}

fn render_single(
    node: Option<&Record>,
    raw_id: &str,
    what: &str,
    format: OutputFormat,
) -> CliResult<String> {
    if node.is_none() {
        output::warning(&format!("no {what} found for id {raw_id}"));
    }
    match (node, format) {
        (Some(node), OutputFormat::Text) => Ok(serde_json::to_string(node)?),
        (None, OutputFormat::Text) => Ok(String::new()),
        (node, OutputFormat::Json) => to_pretty(&node),
    }
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Node id, followed by the configured payload field when it has a value.
pub fn node_label(node: &Record, label_field: Option<&str>) -> String {
    match label_field.and_then(|field| node.field(field)) {
        None | Some(Value::Null) => node.id.to_string(),
        Some(Value::String(s)) => format!("{} ({})", node.id, s),
        Some(other) => format!("{} ({})", node.id, other),
    }
}

fn execute_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = resolve_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest precedence first)");
            let global = global_config_path();
            let local = local_config_path(&project_dir(cli));
            for path in global.iter().chain(std::iter::once(&local)) {
                let marker = if path.exists() { "found" } else { "missing" };
                output::info(&format!("  {} [{}]", path.display(), marker));
            }
        }
    }
    Ok(())
}
