use anyhow::{Context, Result};
use clap::Parser;
use perfgold::cli::{Cli, Command, OutputFormat};
use perfgold::config::HarnessConfig;
use perfgold::golden::GoldenCaseRegistry;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG
/// applies with a `warn` default
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let mut config = HarnessConfig::for_fixture_dir(&args.fixture_dir).with_context(|| {
        format!(
            "Failed to load configuration for {}",
            args.fixture_dir.display()
        )
    })?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let registry = GoldenCaseRegistry::load(config)
        .with_context(|| format!("Failed to load cases from {}", args.fixture_dir.display()))?;

    let report = match args.selected_command() {
        Command::Verify => registry.verify_all(&args.cases)?,
        Command::Generate => registry.regenerate_all(&args.cases)?,
    };

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!(
            "{}",
            report.render_json().context("Failed to serialize report")?
        ),
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
