use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use roster_core::config_file::{self, ConfigFile};
use roster_reporting::ExportFormat;

mod output;

use output::ColorMode;

/// Roster Converter - turn a team roster PDF into a CSV sheet
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a roster PDF and save the result
    Convert {
        /// Path to the roster PDF
        pdf: PathBuf,

        /// Event option selecting the extra columns (e.g. Invitational, State)
        #[arg(short, long)]
        option: String,

        /// Directory to write the converted file to
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,

        /// Print the converted table instead of saving it
        #[arg(long)]
        stdout: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dry run: print the top line, school name and raw table of a PDF
    Inspect {
        /// Path to the roster PDF
        pdf: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the platform config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config_file::load_config();

    match cli.command {
        Command::Convert {
            pdf,
            option,
            output_dir,
            format,
            stdout,
            no_color,
        } => {
            // CLI flag > env var > config file > default
            let output_dir = output_dir
                .or_else(|| std::env::var("ROSTER_OUTPUT_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| config.output_dir());
            convert(
                &pdf,
                &option,
                &config,
                OutputTarget {
                    dir: output_dir,
                    format: format.into(),
                    stdout,
                },
                ColorMode(!no_color),
            )
        }
        Command::Inspect { pdf, no_color } => inspect(&pdf, &config, ColorMode(!no_color)),
        Command::Config { action } => show_config(action, &config),
    }
}

struct OutputTarget {
    dir: PathBuf,
    format: ExportFormat,
    stdout: bool,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn convert(
    pdf: &Path,
    option: &str,
    config: &ConfigFile,
    target: OutputTarget,
    color: ColorMode,
) -> anyhow::Result<()> {
    if !pdf.exists() {
        anyhow::bail!("File not found: {}", pdf.display());
    }

    let settings = config.convert_settings();
    let conversion = roster_ingest::convert_file(pdf, option, &settings)?;
    let file_name = display_name(pdf);

    // With --stdout the table owns stdout, so the summary moves to stderr.
    let (mut summary, color): (Box<dyn Write>, ColorMode) = if target.stdout {
        (Box::new(std::io::stderr()), ColorMode(false))
    } else {
        (Box::new(std::io::stdout()), color)
    };
    output::print_conversion_summary(&mut summary, &file_name, option, &conversion, color)?;

    let Some(table) = conversion.non_empty_table() else {
        writeln!(summary, "No table rows found; nothing written.")?;
        return Ok(());
    };

    if target.stdout {
        let mut out = std::io::stdout();
        out.write_all(roster_reporting::export(table, target.format).as_bytes())?;
        if target.format == ExportFormat::Json {
            writeln!(out)?;
        }
        return Ok(());
    }

    let name = roster_reporting::output_filename(
        &file_name,
        conversion.school_name.as_deref(),
        option,
        target.format,
    );
    let path = roster_reporting::save_export(table, target.format, &target.dir, &name)?;
    output::print_saved(&mut summary, &path, color)?;
    Ok(())
}

fn inspect(pdf: &Path, config: &ConfigFile, color: ColorMode) -> anyhow::Result<()> {
    use owo_colors::OwoColorize;

    if !pdf.exists() {
        anyhow::bail!("File not found: {}", pdf.display());
    }

    let settings = config.convert_settings();
    let doc = roster_ingest::extract_file(pdf, &settings)?;
    let top_line = roster_core::top_line(&doc.first_page_text).to_string();
    let school = roster_core::school_name(&top_line);
    let raw = roster_core::flatten_tables(&doc.tables);

    let mut w = std::io::stdout();
    let file_name = display_name(pdf);
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} pages, {} tables)\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            doc.page_count,
            doc.tables.len()
        )?;
    } else {
        writeln!(
            w,
            "DRY RUN: {} ({} pages, {} tables)\n",
            file_name,
            doc.page_count,
            doc.tables.len()
        )?;
    }
    writeln!(w, "Top line: {}", top_line)?;
    writeln!(w, "School:   {}", school.unwrap_or("(unknown)"))?;
    writeln!(w)?;
    output::print_raw_table(&mut w, &raw, color)?;
    Ok(())
}

fn show_config(action: ConfigAction, config: &ConfigFile) -> anyhow::Result<()> {
    match action {
        ConfigAction::Path => match config_file::config_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine config directory"),
        },
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}
