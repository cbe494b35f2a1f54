use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use module_packer::output::write_bundle;
use module_packer::{ModuleMap, PackOptions, Packer};

/// Pack a resolved module map into a single JavaScript or CSS artifact.
#[derive(Debug, Parser)]
#[command(name = "module-packer", version)]
struct Cli {
    /// JSON object mapping module ids to module records.
    map: PathBuf,

    /// Entry ids packed in order; the last one boots the bundle.
    /// Defaults to every record flagged `entry`.
    #[arg(short, long = "entry")]
    entries: Vec<String>,

    /// Destination file; standard output when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Options file; `pack.config.json` next to the map is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wrap JavaScript output in a UMD shell.
    #[arg(long)]
    umd: bool,

    /// Append an inline source map to JavaScript output.
    #[arg(long)]
    development: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.map)
        .with_context(|| format!("failed to read {}", cli.map.display()))?;
    let modules = ModuleMap::from_json(&text)
        .with_context(|| format!("failed to parse module map {}", cli.map.display()))?;

    let options = load_options(&cli)?;
    let options = options
        .with_umd(options.umd || cli.umd)
        .with_development(options.development || cli.development);

    let entries = if cli.entries.is_empty() {
        modules
            .records()
            .filter(|record| record.entry)
            .map(|record| record.id.clone())
            .collect()
    } else {
        cli.entries.clone()
    };
    let Some((last, chunks)) = entries.split_last() else {
        bail!("no entry given and no record in the map is flagged `entry`");
    };

    let mut packer = Packer::with_modules(modules, options);
    let mut bundle = String::new();
    for entry in chunks {
        let chunk = packer
            .pack_chunk(entry)
            .with_context(|| format!("failed to pack {entry}"))?;
        bundle.push_str(&chunk);
    }
    bundle.push_str(&packer.pack(last).with_context(|| format!("failed to pack {last}"))?);

    match &cli.output {
        Some(path) => {
            write_bundle(path, &bundle)?;
            info!("wrote {} bytes to {}", bundle.len(), path.display());
        }
        None => io::stdout()
            .write_all(bundle.as_bytes())
            .context("failed to write bundle to stdout")?,
    }
    Ok(())
}

fn load_options(cli: &Cli) -> Result<PackOptions> {
    match &cli.config {
        Some(path) => PackOptions::from_path(path)
            .with_context(|| format!("failed to load options from {}", path.display())),
        None => {
            let dir = cli.map.parent().unwrap_or(cli.map.as_path());
            Ok(PackOptions::discover(dir))
        }
    }
}
