//! Suite driver: runs every case once, in order, and tallies the results.

use super::cases::{self, CaseKind};
use super::reporter::{Reporter, Tone, RULE_WIDTH};
use super::tally::{CaseResult, SuiteReport, Tally};
use crate::config::SuiteConfig;
use crate::llm::LlmClient;
use crate::result::RoutecheckResult;
use std::time::Instant;
use tracing::{info, warn};

/// Runs the smoke suite against one router
#[derive(Debug)]
pub struct SuiteRunner {
    config: SuiteConfig,
    client: LlmClient,
}

impl SuiteRunner {
    /// Validate the configuration and build the HTTP client.
    pub fn new(config: SuiteConfig) -> RoutecheckResult<Self> {
        config.validate()?;
        let client = LlmClient::from_config(&config)?;
        Ok(Self { config, client })
    }

    /// Use an existing client; `config.base_url` and `config.timeout` are ignored.
    #[must_use]
    pub fn with_client(config: SuiteConfig, client: LlmClient) -> Self {
        Self { config, client }
    }

    /// The active configuration
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every case and return the report.
    ///
    /// Case failures never abort the run; all five cases always execute.
    pub async fn run(&self, reporter: &mut dyn Reporter) -> SuiteReport {
        let start = Instant::now();
        self.print_banner(reporter);

        if self.config.health_check {
            self.probe(reporter).await;
        }

        let mut report = SuiteReport::new();
        for kind in CaseKind::ALL {
            let case_start = Instant::now();
            let passed = self.run_case(kind, reporter).await;
            let duration = case_start.elapsed();
            info!(case = kind.name(), passed, ?duration, "case finished");
            report.record(CaseResult {
                kind,
                passed,
                duration,
            });
        }
        report.duration = start.elapsed();

        print_summary(&report.tally, reporter);
        report
    }

    /// Run a single case.
    pub async fn run_case(&self, kind: CaseKind, reporter: &mut dyn Reporter) -> bool {
        match kind {
            CaseKind::BasicCompletion => cases::basic_completion(&self.client, reporter).await,
            CaseKind::Streaming => cases::streaming_completion(&self.client, reporter).await,
            CaseKind::ModelMapping => {
                cases::model_mapping(&self.client, &self.config.models, reporter).await
            }
            CaseKind::SystemMessages => cases::system_messages(&self.client, reporter).await,
            CaseKind::UnsupportedFeature => {
                cases::unsupported_feature(&self.client, reporter).await
            }
        }
    }

    fn print_banner(&self, reporter: &mut dyn Reporter) {
        let bar = "█".repeat(RULE_WIDTH);
        reporter.line(Tone::Plain, "");
        reporter.line(Tone::Heading, &bar);
        reporter.line(Tone::Heading, "  OpenAI-Compatible Router Smoke Suite");
        reporter.line(Tone::Heading, &bar);
        reporter.line(Tone::Plain, "");

        reporter.notice("Prerequisites:");
        reporter.notice("  1. Router running with: npm run router -- --enable-openai");
        reporter.notice(&format!("  2. Router reachable at {}", self.client.base_url()));
        reporter.line(Tone::Plain, "");
    }

    async fn probe(&self, reporter: &mut dyn Reporter) {
        match self.client.health_check().await {
            Ok(_) => reporter.info(&format!("Health check passed: {}", self.client.base_url())),
            Err(e) => {
                warn!(error = %e, "health check failed");
                reporter.warning(&format!(
                    "Health check failed for {}, proceeding anyway",
                    self.client.base_url()
                ));
            }
        }
    }
}

/// Print the results section and the closing banner.
pub fn print_summary(tally: &Tally, reporter: &mut dyn Reporter) {
    reporter.section("TEST RESULTS");
    reporter.info(&format!("Total tests: {}", tally.total()));
    reporter.success(&format!("Passed: {}", tally.passed));
    let failed = format!("Failed: {}", tally.failed);
    if tally.failed > 0 {
        reporter.failure(&failed);
    } else {
        reporter.success(&failed);
    }

    reporter.line(Tone::Plain, "");
    if tally.all_passed() {
        reporter.success("All tests passed!");
    } else {
        reporter.failure(&format!("{} test(s) failed", tally.failed));
    }
    reporter.line(Tone::Plain, "");
}
