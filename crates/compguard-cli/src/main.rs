//! CLI entry point for compguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup,
//! and exit codes. All business logic lives in the `compguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use compguard_app::{
    EvaluateInput, ExplainOutput, format_explanation, format_not_found, parse_report_json,
    render_markdown, run_evaluate, run_explain, serialize_report, to_renderable,
    verdict_exit_code,
};
use compguard_settings::Overrides;
use compguard_types::{CompguardReport, ComponentId};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "compguard",
    version,
    about = "Policy compliance engine for software components"
)]
struct Cli {
    /// Path to compguard config TOML (missing file means defaults).
    #[arg(long, default_value = "compguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (default|strict).
    #[arg(long)]
    profile: Option<String>,

    /// Override the size of the evaluator worker pool.
    #[arg(long)]
    worker_threads: Option<u32>,

    /// Override the per-policy evaluation timeout, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is unset (e.g. `info`, `compguard_domain=debug`).
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate components against policies and write artifacts.
    Evaluate {
        /// Inventory JSON: policies, projects, components, vulnerabilities, license groups.
        #[arg(long)]
        inventory: Utf8PathBuf,

        /// Violation state JSON; read before and rewritten after evaluation.
        #[arg(long)]
        state: Option<Utf8PathBuf>,

        /// Component id to evaluate (repeatable). Defaults to every component.
        #[arg(long = "component")]
        components: Vec<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/compguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/compguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/compguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a condition subject with an example condition.
    Explain {
        /// Subject name, e.g. `CPE`, `package_url`, `license-group`.
        subject: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match &cli.cmd {
        Commands::Evaluate {
            inventory,
            state,
            components,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_evaluate(
            &cli,
            inventory,
            state.as_deref(),
            components,
            report_out,
            write_markdown.then_some(markdown_out.as_path()),
        ),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Explain { subject } => cmd_explain(subject),
    }
}

/// Logs go to stderr so stdout stays clean for rendered output.
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}

fn cmd_evaluate(
    cli: &Cli,
    inventory: &Utf8Path,
    state: Option<&Utf8Path>,
    components: &[String],
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;

        let input = EvaluateInput {
            inventory,
            state,
            config_text: &cfg_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                worker_threads: cli.worker_threads,
                dispatch_timeout_secs: cli.timeout_secs,
            },
            components: components.iter().map(|c| ComponentId::new(c.as_str())).collect(),
        };

        let output = run_evaluate(input)?;

        write_report_file(report_out, &output.report).context("write report json")?;
        if let Some(path) = markdown_out {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(path, &md).context("write markdown")?;
        }
        if let Some(path) = state {
            compguard_store::save_state(path, output.violations).context("save state")?;
        }

        for request in &output.notifications {
            debug!(
                component = %request.violation.component,
                condition = %request.violation.condition,
                is_new = request.is_new,
                "notification requested"
            );
        }
        info!(
            requests = output.notifications.len(),
            "notification outbox drained"
        );

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("compguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// A missing config file is allowed (defaults apply).
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    if !path.exists() {
        debug!(path = %path, "no config file; using defaults");
        return Ok(String::new());
    }
    std::fs::read_to_string(path).with_context(|| format!("read config: {}", path))
}

fn write_report_file(path: &Utf8Path, report: &CompguardReport) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    write_bytes(path, &data).with_context(|| format!("write report: {}", path))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {}", path))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_explain(subject: &str) -> anyhow::Result<()> {
    match run_explain(subject) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_subjects,
        } => {
            eprint!("{}", format_not_found(&identifier, &available_subjects));
            std::process::exit(1);
        }
    }
}
