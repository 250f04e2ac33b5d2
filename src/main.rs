//! CLI entry point for `mboxpulse`.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use mboxpulse::config::Config;
use mboxpulse::export;
use mboxpulse::report::calendar::{self, BusinessDays, ReportMonth, WeekdayCalendar};
use mboxpulse::report::classifier::Classifier;
use mboxpulse::report::contacts::Directory;
use mboxpulse::report::sparkline::Sparkline;
use mboxpulse::store::loader::{self, LoadedMailbox};

#[derive(Parser)]
#[command(
    name = "mboxpulse",
    version,
    about = "Per-author status report activity from an MBOX archive",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// MBOX archive holding the reporting period's messages
    #[arg(value_name = "MBOX")]
    mailbox: Option<PathBuf>,

    /// Contacts file: CSV rows of a name followed by that person's addresses
    #[arg(value_name = "CONTACTS")]
    contacts: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Also write the summary to a CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Reporting month for the business-day ratio (defaults to the current month)
    #[arg(long, value_name = "YYYY-MM")]
    month: Option<String>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mboxpulse::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match &cli.command {
        Some(Commands::Completions { shell }) => cmd_completions(*shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => {
            let Some(mailbox) = cli.mailbox.as_deref() else {
                anyhow::bail!("No mbox filename given. Usage: mboxpulse <MBOX> [CONTACTS]");
            };
            cmd_report(mailbox, &cli, &config)
        }
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = mboxpulse::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mboxpulse.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mboxpulse", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::stdout().write_all(&buf)?;
    Ok(())
}

/// Load inputs, then print the per-author summary.
///
/// Input and configuration problems are fatal. Failures while building or
/// printing the summary are logged and leave already-printed output intact.
fn cmd_report(mailbox_path: &Path, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    if !mailbox_path.exists() {
        anyhow::bail!("MBOX file not found: {}", mailbox_path.display());
    }

    let directory = match cli.contacts.as_deref() {
        Some(path) => Directory::load(path, &config.contacts.encoding)?,
        None => {
            warn!("No contacts filename given - working without it");
            Directory::empty()
        }
    };

    let classifier = Classifier::from_config(&config.classifier)?;
    let sparkline = Sparkline::with_ticks(&config.output.ticks);

    let month = match cli.month.as_deref() {
        Some(m) => ReportMonth::parse(m)?,
        None => ReportMonth::containing(chrono::Local::now().date_naive()),
    };
    let business_days =
        calendar::business_days_in(&WeekdayCalendar::from_config(&config.calendar)?, month)?;
    info!(%month, business_days = business_days.get(), "Reporting month");

    let mailbox = load_with_progress(mailbox_path)?;
    if !mailbox.failures.is_empty() {
        warn!(
            failed = mailbox.failures.len(),
            total = mailbox.total(),
            "Some messages could not be decoded and were excluded"
        );
    }

    if let Err(e) = print_summary(
        &mailbox,
        &classifier,
        &directory,
        business_days,
        &sparkline,
        cli,
    ) {
        error!(error = ?e, "Failed to produce summary");
    }

    Ok(())
}

/// Split and decode the mailbox behind a progress bar.
fn load_with_progress(path: &Path) -> anyhow::Result<LoadedMailbox> {
    let file_size = std::fs::metadata(path)?.len();
    let pb = ProgressBar::new(file_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Reading mailbox [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let mailbox = loader::load_mailbox(
        path,
        Some(&|current, total| {
            pb.set_length(total);
            pb.set_position(current);
        }),
    )?;
    pb.finish_and_clear();

    use humansize::{format_size, BINARY};
    info!(
        size = %format_size(mailbox.file_size, BINARY),
        messages = mailbox.messages.len(),
        "Mailbox decoded"
    );
    Ok(mailbox)
}

fn print_summary(
    mailbox: &LoadedMailbox,
    classifier: &Classifier,
    directory: &Directory,
    business_days: BusinessDays,
    sparkline: &Sparkline,
    cli: &Cli,
) -> anyhow::Result<()> {
    let summary = mboxpulse::report::summarize(
        &mailbox.messages,
        classifier,
        directory,
        business_days,
        sparkline,
    )?;
    info!(
        authors = summary.stats.len(),
        reports = summary.verdicts.reports,
        automated = summary.verdicts.automated,
        replies = summary.verdicts.replies,
        "Summary ready"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        export::json::write_summary(&mut out, &summary, business_days.get())?;
    } else {
        export::text::write_stats(&mut out, &summary.stats)?;
    }

    if let Some(csv_path) = cli.csv.as_deref() {
        export::csv::export_csv(&summary.stats, csv_path)?;
        info!(path = %csv_path.display(), "Wrote CSV summary");
    }

    Ok(())
}
