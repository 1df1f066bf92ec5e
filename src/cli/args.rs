//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Query a flat list of parent-referencing nodes as a tree
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory searched for .treestore.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// JSON node list, `-` for stdin (overrides the configured input)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Output format (overrides the configured format)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Reject duplicate node ids
    #[arg(long, global = true)]
    pub strict: bool,

    /// Treat every ID argument as a string, even if it looks like a number
    #[arg(short, long, global = true)]
    pub string_ids: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every node in input order
    All,

    /// Print the node with the given id
    Item { id: String },

    /// Print the direct children of a node
    Children { id: String },

    /// Print all descendants, breadth-first
    Descendants { id: String },

    /// Print the direct parent of a node
    Parent { id: String },

    /// Print the ancestor chain, nearest first
    Ancestors { id: String },

    /// Print nodes without a resolved parent
    Roots,

    /// Print descendants that have no children
    Leaves { id: String },

    /// Print the number of ancestors of a node
    Depth { id: String },

    /// Draw the hierarchy below a node (default: every root)
    Tree { id: Option<String> },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
        let cli = Cli::try_parse_from([
            "treestore",
            "children",
            "4",
            "-f",
            "nodes.json",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("nodes.json")));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Some(Commands::Children { ref id }) if id == "4"));
    }
}
