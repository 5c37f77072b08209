#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use classdown::demos::{self, Scenario, ScenarioReport};
use classdown::desugar::{DesugarOptions, render_es5};

/// Runs the class desugaring scenarios and prints what happened.
#[derive(Parser, Debug)]
#[command(name = "classdown", version, about = "Class desugaring scenarios")]
struct CliArgs {
    /// Scenario to run.
    #[arg(value_enum)]
    scenario: Selection,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Nested call limit for member bodies.
    #[arg(long = "max-call-depth")]
    max_call_depth: Option<u32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Selection {
    All,
    Greeter,
    GuardedName,
    ComputedKey,
    NamedExpression,
    DirectCall,
}

impl Selection {
    fn scenarios(self) -> Vec<Scenario> {
        match self {
            Self::All => Scenario::ALL.to_vec(),
            Self::Greeter => vec![Scenario::Greeter],
            Self::GuardedName => vec![Scenario::GuardedName],
            Self::ComputedKey => vec![Scenario::ComputedKey],
            Self::NamedExpression => vec![Scenario::NamedExpression],
            Self::DirectCall => vec![Scenario::DirectCall],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Steps and outcomes, one per line.
    Text,
    /// Reports with class layouts.
    Json,
    /// The lowered constructor function of each class.
    Es5,
}

fn main() -> Result<()> {
    // Set CLASSDOWN_LOG to see spans; CLASSDOWN_LOG_FORMAT=tree|json|text.
    classdown::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let mut options = DesugarOptions::default();
    if let Some(depth) = args.max_call_depth {
        options = options.with_max_call_depth(depth);
    }

    let mut reports = Vec::new();
    for scenario in args.scenario.scenarios() {
        let report = demos::run(scenario, options)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("scenario '{}' failed", scenario.name()))?;
        reports.push(report);
    }

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                print_text(report);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("failed to serialize scenario reports")?;
            println!("{json}");
        }
        OutputFormat::Es5 => {
            for report in &reports {
                println!("// {}", report.scenario.name());
                print!("{}", render_es5(&report.class));
            }
        }
    }
    Ok(())
}

fn print_text(report: &ScenarioReport) {
    println!(
        "{} {}",
        report.scenario.name().bold(),
        format!("({})", report.summary).dimmed()
    );
    for step in &report.steps {
        let marker = if step.ok { "ok".green() } else { "error".red() };
        println!("  {:<48} {marker:>5}  {}", step.action, step.outcome);
    }
    println!();
}
