use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use node_crossref::analyzer::{find_missing_tickets, run_analysis, stores_with_tickets};
use node_crossref::analyzer::types::TicketStatus;
use node_crossref::config::AnalysisConfig;
use node_crossref::error::AppError;
use node_crossref::export::csv_report::export_csv_reports;
use node_crossref::export::excel_report::generate_excel_report;
use node_crossref::export::summary::render_summary;
use node_crossref::parser::parse_tickets_csv;
use node_crossref::report::parse_offline_report;

/// Cross-references a POS ticket export against the offline nodes report and
/// classifies every ticket into a disposition.
#[derive(Parser)]
#[command(name = "node-crossref", version, about)]
struct Cli {
    /// Ticket export CSV
    #[arg(long, default_value = "nodes_tickets.csv")]
    tickets: PathBuf,

    /// Offline nodes report (plain text)
    #[arg(long, default_value = "nodes_report.txt")]
    report: PathBuf,

    /// Directory to write result files into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Optional TOML file overriding the analysis thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the XLSX workbook
    #[arg(long)]
    no_xlsx: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("analysis failed: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    let parsed = parse_tickets_csv(&cli.tickets, |rows, accepted| {
        info!("parsing tickets: {rows} rows read, {accepted} accepted");
    })?;
    for w in &parsed.warnings {
        warn!("{} line {}: {}", cli.tickets.display(), w.line, w.message);
    }
    if !parsed.missing_optional_columns.is_empty() {
        info!(
            "optional columns absent: {}",
            parsed.missing_optional_columns.join(", ")
        );
    }
    info!(
        "loaded {} tickets from {} ({} rows skipped)",
        parsed.tickets.len(),
        cli.tickets.display(),
        parsed.skipped_rows
    );

    let report_text = std::fs::read_to_string(&cli.report)?;
    let index = parse_offline_report(&report_text)?;

    let now = chrono::Local::now().naive_local();
    let results = run_analysis(&parsed.tickets, &index, &config, now);
    let advisories = find_missing_tickets(&index, &stores_with_tickets(&parsed.tickets));

    println!("Analysis complete:");
    for (label, status) in [
        ("Can close", TicketStatus::CanClose),
        ("Need review", TicketStatus::NeedsReview),
        ("Suggest reopen", TicketStatus::SuggestReopen),
        ("Closed OK", TicketStatus::ClosedOk),
        ("Closed too old", TicketStatus::ClosedTooOld),
        ("Errors", TicketStatus::Error),
    ] {
        let n = results.iter().filter(|r| r.status == status).count();
        println!("  {label}: {n}");
    }
    if !advisories.is_empty() {
        println!("  Offline nodes with no ticket: {}", advisories.len());
    }

    std::fs::create_dir_all(&cli.out_dir)?;
    export_csv_reports(&results, &advisories, &cli.out_dir)?;

    if !cli.no_xlsx {
        let bytes = generate_excel_report(&results, &advisories)?;
        let name = format!(
            "node_cross_reference_results_{}.xlsx",
            now.format("%Y%m%d_%H%M%S")
        );
        let path = cli.out_dir.join(name);
        std::fs::write(&path, bytes)?;
        info!("wrote workbook {}", path.display());
    }

    let summary = render_summary(&results, &advisories, now);
    std::fs::write(cli.out_dir.join("summary_report.txt"), summary)?;

    println!("\nAnalysis complete! Check the output files for results.");
    Ok(())
}
