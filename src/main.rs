//! GrantCraft CLI
//!
//! Usage:
//!   grantcraft score draft.md                  # Markdown reviewer report
//!   grantcraft score draft.md --summary        # One line per criterion
//!   grantcraft score - --json < draft.md       # JSON report from stdin
//!   grantcraft schemes                         # Registered funding schemes
//!   grantcraft signals --criterion impact      # Signal catalogue
//!   grantcraft serve --port 3000               # HTTP API server

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

use grantcraft::config::{AppConfig, SchemeRegistry};
use grantcraft::core::{api::AppState, catalogue, run_server, ReportAssembler};
use grantcraft::error::AppError;
use grantcraft::types::CriterionId;
use grantcraft::{telemetry, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "grantcraft",
    version = VERSION,
    about = "GrantCraft - deterministic reviewer report for Horizon Europe drafts",
    long_about = "GrantCraft scores a Markdown proposal draft against the Horizon Europe\n\
                  award criteria (Excellence, Impact, Implementation) using transparent\n\
                  heuristic signals.\n\n\
                  Scores are estimates derived from textual signals only. They are not\n\
                  a prediction of the evaluation outcome."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a draft and print the reviewer report
    Score {
        /// Draft Markdown file, or '-' for stdin
        input: PathBuf,

        /// Scheme id (default: GRANTCRAFT_DEFAULT_SCHEME)
        #[arg(long)]
        scheme: Option<String>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Output a one-line-per-criterion summary
        #[arg(long, conflicts_with = "json")]
        summary: bool,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Disable colors in output
        #[arg(long)]
        no_color: bool,
    },
    /// List registered funding schemes
    Schemes,
    /// List the signal catalogue
    Signals {
        /// Only signals for this criterion (excellence, impact, implementation)
        #[arg(long)]
        criterion: Option<CriterionId>,
    },
    /// Run as HTTP API server
    Serve {
        /// Bind host (default: GRANTCRAFT_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (default: GRANTCRAFT_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let registry = SchemeRegistry::from_config(&config.review)?;

    match args.command {
        Command::Score {
            input,
            scheme,
            json,
            summary,
            out,
            no_color,
        } => {
            let draft = read_draft(&input)?;
            let scheme = registry
                .resolve(scheme.as_deref())
                .ok_or_else(|| AppError::UnknownScheme(scheme.clone().unwrap_or_default()))?;
            if no_color || out.is_some() {
                colored::control::set_override(false);
            }

            let report = ReportAssembler::new().generate(&draft, scheme)?;
            let rendered = if json {
                serde_json::to_string_pretty(&report)?
            } else if summary {
                if no_color {
                    report.to_parseable_string()
                } else {
                    report.to_terminal_string()
                }
            } else {
                report.markdown_report.clone()
            };

            match out {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    info!(path = %path.display(), "report written");
                }
                None => println!("{rendered}"),
            }
        }
        Command::Schemes => print_schemes(&registry),
        Command::Signals { criterion } => print_signals(criterion),
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.server.socket_addr()?;
            run_server(addr, AppState::new(registry, &config.review)).await?;
        }
    }
    Ok(())
}

/// Read the draft from a file, or stdin for '-'
fn read_draft(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut draft = String::new();
        io::stdin().read_to_string(&mut draft)?;
        Ok(draft)
    } else {
        fs::read_to_string(input)
    }
}

fn print_schemes(registry: &SchemeRegistry) {
    for scheme in registry.all() {
        let marker = if scheme.id == registry.default_id() { " (default)" } else { "" };
        println!("{}{}  {}", scheme.id.bold(), marker, scheme.name);
        for c in &scheme.criteria {
            println!("    {:<15} threshold {:.1}/{:.0}", c.title, c.threshold, c.max_score);
        }
        println!(
            "    {:<15} threshold {:.1}/{:.0}",
            "Overall",
            scheme.overall_threshold(),
            scheme.max_total()
        );
    }
}

fn print_signals(criterion: Option<CriterionId>) {
    let catalogue = catalogue();
    let criteria: Vec<CriterionId> = match criterion {
        Some(c) => vec![c],
        None => CriterionId::ALL.to_vec(),
    };
    for c in criteria {
        println!("{} (weights sum {:.2})", c.title().bold(), catalogue.weight_total(c));
        for signal in catalogue.for_criterion(c) {
            let flag = if signal.required_for_threshold {
                "required".yellow()
            } else {
                "recommended".dimmed()
            };
            println!(
                "  {:<28} {:.2}  {:<11}  {:>3} min  {}",
                signal.id, signal.weight, flag, signal.time_estimate_minutes, signal.label
            );
        }
        println!();
    }
}
