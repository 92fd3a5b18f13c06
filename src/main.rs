use clap::Parser;
use std::path::PathBuf;
use std::process;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use mc_icons::config::{load_config, IconizeConfig};
use mc_icons::errors::IconizeError;
use mc_icons::session::Session;

/// Turns bracketed item mentions in Markdown into item icons.
#[derive(Parser)]
#[command(
    name = "mc-icons",
    about = "Turns [Item Name] mentions in Markdown into Minecraft item icons"
)]
struct Cli {
    /// Input file to mutate
    input: PathBuf,
    /// Levenshtein name mistake threshold
    #[arg(short, long)]
    threshold: Option<usize>,
    /// Maximum amount of icons in multiple results
    #[arg(short = 'x', long)]
    max: Option<usize>,
    /// Repository to make links to
    #[arg(short, long)]
    repo: Option<String>,
    /// Modpack shorthand to filter icons, "e2ee" for example
    #[arg(short, long)]
    modpack: Option<String>,
    /// Do not prompt
    #[arg(short, long)]
    silent: bool,
    /// Keep long links instead of shortening them with is.gd
    #[arg(long)]
    no_short: bool,
    /// Directory with the asset JSON files
    #[arg(short, long)]
    assets: Option<String>,
    /// Print the result instead of writing the input file
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> mc_icons::errors::Result<()> {
    if !cli.input.exists() {
        return Err(IconizeError::Config {
            message: format!("file {} doesn't exist", cli.input.display()),
        });
    }

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = apply_flags(load_config(&project_root)?, &cli);

    let document = std::fs::read_to_string(&cli.input)?;
    let mut session = Session::open(&project_root, config)?;

    println!("Looking for item names...");
    let result = session.run(&document)?;
    session.print_summary();

    if result.replaced == 0 {
        println!("No replaceables found.");
        return Ok(());
    }
    println!(
        "found names: {}",
        result.replaced.to_string().bold().yellow()
    );

    if cli.dry_run {
        println!("{}", result.text);
    } else {
        std::fs::write(&cli.input, &result.text)?;
        println!(
            "Replaced {} captures with {} icons in {}ms",
            result.replaced, result.icons, result.duration_ms
        );
    }
    Ok(())
}

/// Overrides file configuration with command-line flags.
fn apply_flags(mut config: IconizeConfig, cli: &Cli) -> IconizeConfig {
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(max) = cli.max {
        config.max = max;
    }
    if let Some(repo) = &cli.repo {
        config.repo = repo.clone();
    }
    if cli.modpack.is_some() {
        config.modpack = cli.modpack.clone();
    }
    if cli.assets.is_some() {
        config.assets_dir = cli.assets.clone();
    }
    config.silent |= cli.silent;
    if cli.no_short {
        config.short = false;
    }
    config
}
