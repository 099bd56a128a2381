use clap::{Parser, Subcommand};
use rsvp_report::types::{GuestRsvp, RenderedReport};
use rsvp_report::{config, export, output, summary};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rsvp-report")]
#[command(about = "Guest list exports for the wedding RSVP admin")]
#[command(long_about = "\
Guest list exports for the wedding RSVP admin

Reads the RSVP table as a JSON array (one object per row, newest first) and
writes the administrator downloads:

  invitados-boda.xlsx   styled spreadsheet with a summary block
  invitados-boda.pdf    A4 guest list printed by headless Chrome

Row fields: full_name, guests_count, phone, notes, attending. Extra fields
are ignored; a guest count that is not a whole number counts as unknown.

The PDF export needs Chrome. Locally it uses engine.executable_path,
CHROME_EXECUTABLE_PATH, or a standard install. On Vercel or AWS Lambda it
downloads a pinned headless shell.

Run 'rsvp-report gen-config' to generate a documented rsvp-report.toml.")]
#[command(version)]
struct Cli {
    /// Engine configuration file
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// JSON file with the RSVP rows
    #[arg(long, default_value = "rsvps.json", global = true)]
    rows: PathBuf,

    /// Directory the exports are written to
    #[arg(long, default_value = ".", global = true)]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the spreadsheet export
    Xlsx,
    /// Write the PDF export
    Pdf,
    /// Write both exports
    All,
    /// Print the summary counts
    Summary {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock rsvp-report.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Xlsx => {
            let rows = load_rows(&cli.rows)?;
            let report = export::export_spreadsheet(&rows, &now())?;
            write_report(&report, &cli.out_dir)?;
        }
        Command::Pdf => {
            let engine = config::load_config(&cli.config)?.engine;
            let rows = load_rows(&cli.rows)?;
            let report = export::export_pdf_with_chrome(&engine, &rows, &now())?;
            write_report(&report, &cli.out_dir)?;
        }
        Command::All => {
            let engine = config::load_config(&cli.config)?.engine;
            let rows = load_rows(&cli.rows)?;
            let generated_at = now();
            let (xlsx, pdf) = rayon::join(
                || export::export_spreadsheet(&rows, &generated_at),
                || export::export_pdf_with_chrome(&engine, &rows, &generated_at),
            );
            write_report(&xlsx?, &cli.out_dir)?;
            write_report(&pdf?, &cli.out_dir)?;
        }
        Command::Summary { json } => {
            let rows = load_rows(&cli.rows)?;
            let summary = summary::summarize(&rows);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_summary(&summary);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn now() -> chrono::DateTime<chrono::FixedOffset> {
    chrono::Local::now().fixed_offset()
}

/// Read the row export. Failing here means nothing is rendered.
fn load_rows(path: &Path) -> Result<Vec<GuestRsvp>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read rows from {}: {e}", path.display()))?;
    let rows: Vec<GuestRsvp> = serde_json::from_str(&content)
        .map_err(|e| format!("could not parse rows in {}: {e}", path.display()))?;
    log::debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn write_report(report: &RenderedReport, out_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(report.filename());
    std::fs::write(&path, &report.bytes)?;
    output::print_written(report, &path);
    Ok(())
}
