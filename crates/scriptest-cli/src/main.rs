use anyhow::Result;
use clap::Parser;
use scriptest::{logging, HarnessConfig, Suite};
use std::path::PathBuf;
use std::time::Duration;

mod demo;

/// Run the scriptest demonstration suite.
///
/// Registers two demonstration cases and runs them, printing one line per
/// check. Failures are expected: the demo shows how they are reported.
///
/// EXAMPLES:
///     scriptest-demo                   Run with default settings
///     scriptest-demo --no-color        Plain headers
///     scriptest-demo --config ci.toml  Load markers and filters from TOML
///
/// ENVIRONMENT VARIABLES:
///     SCRIPTEST_LOG     Diagnostic log filter (e.g. 'scriptest=debug')
#[derive(Parser, Debug)]
#[command(name = "scriptest-demo")]
#[command(version)]
struct Cli {
    /// Harness configuration file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Disable colored headers
    #[arg(long)]
    no_color: bool,

    /// Use PASS/FAIL instead of emoji markers
    #[arg(long)]
    plain: bool,

    /// Diagnostic log filter, overrides the configuration
    #[arg(long, env = "SCRIPTEST_LOG")]
    log: Option<String>,
}

impl Cli {
    fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load_from_file(path)?,
            None => HarnessConfig::default(),
        };

        if self.no_color {
            config = config.with_color(false);
        }
        if self.plain {
            config = config.with_markers("PASS", "FAIL");
        }
        if let Some(filter) = &self.log {
            config.log_filter = filter.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.harness_config()?;

    logging::init(&config.log_filter);
    tracing::debug!(?config, "starting demo suite");

    let mut suite = Suite::with_config(config);
    suite
        .setup_default::<demo::Expectations>()
        .setup(|| demo::Completions::with_delay(Duration::from_millis(100)));
    suite.run();

    Ok(())
}
