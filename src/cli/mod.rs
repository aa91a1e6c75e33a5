pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};

/// Layered deployment profiles. Resolve once, render uWSGI and NGINX configs.
#[derive(Parser, Debug)]
#[command(name = "deployfig", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Active profile. Never inferred: pass it here or export DEPLOYFIG_PROFILE
    #[arg(long, global = true, env = "DEPLOYFIG_PROFILE")]
    pub profile: Option<String>,

    /// Verbose output (debug diagnostics on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to an alternative config directory
    #[arg(long, global = true)]
    pub config_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Deployfig in the current project
    Init {
        /// Python package name of the project
        #[arg(long, default_value = "mysite")]
        project: String,
    },

    /// Write the resolved profile as a dotenv file
    Resolve {
        /// Output file
        #[arg(long, default_value = ".env")]
        output: String,
    },

    /// Print the resolved profile with the origin of each value
    Show,

    /// Check profiles for unsafe deployment settings
    Check {
        /// Check every declared profile instead of the selected one
        #[arg(long)]
        all: bool,
    },

    /// Compare two resolved profiles
    Diff {
        /// Left profile
        left: String,
        /// Right profile
        right: String,
    },

    /// Render a configuration artifact for an external tool
    Render {
        /// What to render
        #[arg(value_enum)]
        target: RenderTarget,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Show profiles, layer files and selection state
    Status,

    /// Show operation history (narrowed to --profile when one is selected)
    Log {
        /// Filter by author
        #[arg(long)]
        author: Option<String>,
        /// Filter entries since this date (ISO 8601)
        #[arg(long)]
        since: Option<String>,
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// uWSGI .ini file
    Uwsgi,
    /// NGINX site with upstream and server block(s)
    Nginx,
    /// openssl command that creates the certificate and key
    Tls,
}
