//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schema.org JSON-LD graph compiler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; the config file is resolved against it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: schemagraph.toml)
    #[arg(short = 'C', long, default_value = "schemagraph.toml")]
    pub config: PathBuf,

    /// Override the site url from the config file.
    ///
    /// Useful for previewing a staging host without editing schemagraph.toml:
    ///   schemagraph --base-url "https://staging.acme.example" render page.json
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile the JSON-LD script element for a page fixture
    Render {
        /// JSON fixture: page context plus the posts, terms and images it refers to
        fixture: PathBuf,

        /// Print the validation report instead of the script element
        #[arg(long)]
        report: bool,
    },

    /// Print the breadcrumb trail for a page fixture as JSON
    Trail {
        /// JSON fixture
        fixture: PathBuf,
    },

    /// Evaluate rendered HTML or JSON-LD for a schema.org type
    Check {
        /// File to check; `-` reads stdin
        input: PathBuf,

        /// Node type to look for (rules derived from the validator)
        #[arg(short = 't', long = "type")]
        target_type: Option<String>,

        /// TOML check spec, used instead of the derived rules
        #[arg(short, long, conflicts_with = "target_type")]
        spec: Option<PathBuf>,
    },

    /// Remove competing JSON-LD blocks from an HTML file
    Strip {
        /// HTML file; `-` reads stdin
        input: PathBuf,
    },

    /// Self-check the site-wide nodes on the front page
    Health {
        /// Optional JSON fixture supplying images for the logo
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },
}

impl Cli {
    /// Commands that fall back to the default configuration without a config file.
    pub const fn config_optional(&self) -> bool {
        matches!(self.command, Commands::Check { .. } | Commands::Strip { .. })
    }
}
