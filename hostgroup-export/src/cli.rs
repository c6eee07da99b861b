use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "hostgroup-export")]
#[command(about = "Export selected host groups and their hosts from a firewall API archive")]
pub struct Cli {
    /// Directory searched for the newest *api-*.tar archive. Defaults to the working directory.
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Directory receiving <export-name>.tar. Defaults to the working directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Optional TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Substring an input archive name must contain (case-insensitive).
    #[arg(long)]
    pub marker: Option<String>,
    /// Group selection such as "1,3,5", "1-5" or a name; skips the prompt.
    #[arg(long)]
    pub select: Option<String>,
    /// Export name; skips the prompt.
    #[arg(long)]
    pub name: Option<String>,
    /// Replace an existing output archive without asking.
    #[arg(long)]
    pub overwrite: bool,
    /// Print the group catalog and exit.
    #[arg(long)]
    pub list: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
