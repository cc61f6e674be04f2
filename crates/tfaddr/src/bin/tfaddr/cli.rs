//! tfaddr cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;
use tfaddr::Index;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; tfaddr ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse addresses and print their structure
    Parse(ParseCommand),

    /// Validate addresses, one per line
    ///
    /// Reads from stdin unless files are given. Empty lines and lines starting with # are skipped.
    Check(CheckCommand),

    /// Derive a new address from an existing one
    #[command(alias = "mv")]
    Rename(RenameCommand),

    /// List the moves declared in `moved` blocks of terraform files
    Moved(MovedCommand),
}

#[derive(Parser, Debug)]
pub struct ParseCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Addresses to parse
    #[arg(required = true)]
    pub addresses: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Read addresses from a file
    #[clap(short = 'f', long = "input-file")]
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RenameCommand {
    /// Address to start from
    pub address: String,

    /// New resource name
    #[clap(long)]
    pub name: Option<String>,

    /// New resource type
    #[clap(long = "type")]
    pub resource_type: Option<String>,

    /// New resource index, e.g. 0 or '"key"'. Empty removes the index
    #[clap(long)]
    pub index: Option<Index>,

    /// New index of the module at a position (outer-most is 0), e.g. 1='"key"'
    #[clap(long = "module-index", value_parser = parse_module_index)]
    pub module_index: Vec<(usize, Index)>,

    /// Print a `moved` block instead of the new address
    #[clap(long)]
    pub moved: bool,
}

#[derive(Parser, Debug)]
pub struct MovedCommand {
    /// Terraform file to read
    #[clap(short = 'f', long = "input-file", required = true)]
    pub files: Vec<PathBuf>,

    /// Print the moves as hcl `moved` blocks
    #[clap(long)]
    pub hcl: bool,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

fn parse_module_index(value: &str) -> Result<(usize, Index), String> {
    let (position, index) = value
        .split_once('=')
        .ok_or_else(|| format!("expected <POSITION>=<INDEX>, got `{value}`"))?;

    let position = position
        .parse()
        .map_err(|e| format!("invalid module position `{position}`: {e}"))?;
    let index = index
        .parse()
        .map_err(|e| format!("invalid index `{index}`: {e}"))?;

    Ok((position, index))
}
