//! Display formatting for CLI output
//!
//! Renders the protection plan of one function run as a table: which
//! resource is protected, why, and by which Usage.

use console::style;
use fn_protection_core::RunFunctionResponse;
use fn_protection_engine::{Phase, ProtectionDecision, ProtectionOutcome};
use std::io::{self, Write};

/// Renders a protection plan
pub struct PlanRenderer<W: Write> {
    writer: W,
}

impl PlanRenderer<io::Stdout> {
    /// Create a new renderer that writes to stdout
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl Default for PlanRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> PlanRenderer<W> {
    /// Create a renderer that writes to a custom writer (for testing)
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Render the outcome of a run
    pub fn render(&mut self, response: &RunFunctionResponse, outcome: &ProtectionOutcome) -> io::Result<()> {
        let tag = if response.meta.tag.is_empty() {
            "-"
        } else {
            response.meta.tag.as_str()
        };
        writeln!(
            self.writer,
            "{} Protection plan (tag: {}, ttl: {})",
            style("→").blue(),
            style(tag).cyan(),
            humantime::format_duration(response.meta.ttl)
        )?;

        if outcome.decisions.is_empty() {
            writeln!(self.writer, "  {} Nothing to protect", style("✓").green())?;
            return Ok(());
        }

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "  {}",
            style(format!(
                "{:<10} {:<30} {:<26} {:<11} {}",
                "PHASE", "RESOURCE", "REASON", "SCOPE", "USAGE"
            ))
            .bold()
        )?;

        for phase in [Phase::Composed, Phase::Composite, Phase::Required] {
            for decision in outcome.decisions_for(phase) {
                self.render_decision(decision)?;
            }
        }

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} {} resource(s) protected",
            style("✓").green().bold(),
            outcome.protected_count
        )?;

        Ok(())
    }

    fn render_decision(&mut self, decision: &ProtectionDecision) -> io::Result<()> {
        let record = &decision.record;
        let target = format!("{}/{}", record.of_kind, record.of_name);
        let usage = match &record.namespace {
            Some(ns) => format!("{}/{}/{}", record.kind(), ns, record.name),
            None => format!("{}/{}", record.kind(), record.name),
        };

        writeln!(
            self.writer,
            "  {:<10} {} {:<26} {:<11} {}",
            decision.phase.to_string(),
            style(format!("{target:<30}")).yellow(),
            record.reason.as_str(),
            record.scope.to_string(),
            style(usage).dim()
        )
    }
}
