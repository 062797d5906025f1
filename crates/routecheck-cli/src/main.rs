//! Routecheck CLI: smoke tests for OpenAI-compatible routers
//!
//! ## Usage
//!
//! ```bash
//! routecheck                                        # Default router on localhost:3000
//! routecheck --base-url http://10.0.0.5:3000/v1     # Another router
//! routecheck --model gpt-4 --model claude-sonnet-4  # Custom model sweep
//! routecheck --strict -q                            # CI: exit 1 on any failure
//! ```

use clap::Parser;
use routecheck::{Reporter, SuiteRunner};
use routecheck_cli::{logging, Cli, CliConfig, CliError, CliResult, ConsoleReporter};
use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.cli_config();
    let mut reporter =
        ConsoleReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    match run(&cli, &config, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_interrupt() => {
            reporter.end_fragments();
            reporter.quiet = false;
            reporter.warning("Tests interrupted by user");
            ExitCode::FAILURE
        }
        Err(e @ CliError::TestExecution { .. }) => {
            reporter.failure(&e.to_string());
            ExitCode::FAILURE
        }
        Err(e) => {
            reporter.failure(&format!("Fatal error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &CliConfig, reporter: &mut ConsoleReporter) -> CliResult<()> {
    logging::init(config.verbosity)?;

    let suite = cli.suite_config();
    debug!(?suite, ?config, "configuration");
    let runner = SuiteRunner::new(suite)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create async runtime: {e}")))?;

    let report = rt.block_on(async {
        tokio::select! {
            report = runner.run(reporter) => Ok(report),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                Err(CliError::Interrupted)
            }
        }
    })?;

    info!(
        passed = report.tally.passed,
        failed = report.tally.failed,
        duration = ?report.duration,
        "suite finished"
    );
    reporter.quiet_summary(&report.tally, report.duration);

    if config.strict && !report.tally.all_passed() {
        return Err(CliError::test_execution(format!(
            "{} test(s) failed",
            report.tally.failed
        )));
    }
    Ok(())
}
