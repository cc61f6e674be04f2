mod cli;

use anyhow::Context;
use tfaddr::check::{CheckedLine, LineStatus};
use tfaddr::edit::AddressEdit;
use tfaddr::hcl_interop::MovedBlocks;
use tfaddr::{Address, ModulePath, ResourceMode, ResourceSpec};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TFADDR_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Parse(parse_cli) => parse(parse_cli),
        cli::Command::Check(check_cli) => check(check_cli),
        cli::Command::Rename(rename_cli) => rename(rename_cli),
        cli::Command::Moved(moved_cli) => moved(moved_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

/// Structure of a parsed address as printed by `tfaddr parse`
#[derive(serde::Serialize)]
struct Parsed<'a> {
    address: &'a Address,
    mode: ResourceMode,
    module_path: &'a ModulePath,
    resource: &'a ResourceSpec,
}

impl<'a> From<&'a Address> for Parsed<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            address,
            mode: address.resource.mode,
            module_path: &address.module_path,
            resource: &address.resource,
        }
    }
}

pub fn parse(cli: cli::ParseCommand) -> anyhow::Result<()> {
    let addresses = cli
        .addresses
        .iter()
        .map(|text| {
            tfaddr::parse(text).with_context(|| format!("Invalid address `{text}`"))
        })
        .collect::<anyhow::Result<Vec<Address>>>()?;

    let parsed: Vec<Parsed> = addresses.iter().map(Parsed::from).collect();
    match cli.output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &parsed)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), &parsed)?,
    };

    Ok(())
}

pub fn check(cli: cli::CheckCommand) -> anyhow::Result<()> {
    let mut failures = 0;

    if cli.files.is_empty() {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        failures += check_lines("<stdin>", &stdin);
    }

    for file_path in &cli.files {
        let contents = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        failures += check_lines(&file_path.display().to_string(), &contents);
    }

    anyhow::ensure!(failures == 0, "{failures} invalid address(es)");
    Ok(())
}

/// Prints a line for every invalid or non-canonical address, returns the number of invalid ones
fn check_lines(source: &str, contents: &str) -> usize {
    let checked = tfaddr::check::check_lines(contents);

    for line in &checked {
        let CheckedLine {
            line_number, text, ..
        } = line;
        match &line.status {
            LineStatus::Valid => {}
            LineStatus::NotCanonical { canonical } => {
                println!("{source}:{line_number}: warning: `{text}` is written as `{canonical}`")
            }
            LineStatus::Invalid(error) => println!("{source}:{line_number}: `{text}`: {error}"),
        }
    }

    let failures = checked.iter().filter(|line| line.is_failure()).count();
    tracing::info!(source, failures, "checked");
    failures
}

pub fn rename(cli: cli::RenameCommand) -> anyhow::Result<()> {
    let original: Address = cli
        .address
        .parse()
        .with_context(|| format!("Invalid address `{}`", cli.address))?;

    let edit = AddressEdit {
        name: cli.name,
        resource_type: cli.resource_type,
        index: cli.index,
        module_indices: cli.module_index,
    };
    let renamed = edit.apply(&original)?;

    if cli.moved {
        let mut moved = MovedBlocks::default();
        moved.insert(original, renamed)?;
        print!("{}", moved.to_hcl_string()?);
    } else {
        println!("{renamed}");
    }

    Ok(())
}

pub fn moved(cli: cli::MovedCommand) -> anyhow::Result<()> {
    let mut moved = MovedBlocks::default();
    for file_path in &cli.files {
        moved
            .load_file(file_path)
            .with_context(|| format!("Failed to load {}", file_path.display()))?;
    }

    if cli.hcl {
        print!("{}", moved.to_hcl_string()?);
    } else {
        for (from, to) in moved.iter() {
            println!("{from} -> {to}");
        }
    }

    Ok(())
}
