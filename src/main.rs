use clap::{Parser, Subcommand};
use sheetbind::cli::{self, CommandOptions, RecordKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetbind")]
#[command(about = "Move typed records in and out of Excel workbooks")]
#[command(long_about = "SheetBind - descriptor-driven Excel import/export

Each record type declares its columns once: header, width, date format,
translation expression, nested path, dropdown options and prompt.
Import coerces cells to field types; export paginates at 65 536 rows
per sheet and writes styled headers with dropdown validation.

COMMANDS:
  import    - Excel (.xls/.xlsx/.xlsb/.ods) to JSON records
  export    - JSON records to Excel (.xlsx)
  template  - Header-only workbook to fill in and import back
  columns   - Show the column map of a record type

EXAMPLES:
  sheetbind export depts.json --kind dept --sheet Departments
  sheetbind import download/<file>.xlsx --kind dept -o depts.json
  sheetbind template --kind user --sheet Users")]
#[command(version)]
struct Cli {
    /// YAML config file (download path, sheet size, coercion policy)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import records from an Excel file and print them as JSON
    Import {
        /// Path to the workbook
        input: PathBuf,

        /// Record type the rows map to
        #[arg(short, long, value_enum, default_value = "dept")]
        kind: RecordKind,

        /// Sheet to read (defaults to the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on the first cell that cannot be converted
        #[arg(long)]
        strict: bool,

        /// Show skipped blank rows
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export a JSON array of records to a new .xlsx in the download directory
    Export {
        /// JSON file holding an array of records
        input: PathBuf,

        /// Record type of the array elements
        #[arg(short, long, value_enum, default_value = "dept")]
        kind: RecordKind,

        /// Base sheet name (pages after the first get a numeric suffix)
        #[arg(short, long, default_value = "Sheet")]
        sheet: String,

        /// Directory for generated files
        #[arg(short, long, env = "SHEETBIND_DOWNLOAD_PATH")]
        download_dir: Option<PathBuf>,

        /// Show record counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write an empty import template for a record type
    Template {
        #[arg(short, long, value_enum, default_value = "dept")]
        kind: RecordKind,

        #[arg(short, long, default_value = "Sheet")]
        sheet: String,

        #[arg(short, long, env = "SHEETBIND_DOWNLOAD_PATH")]
        download_dir: Option<PathBuf>,
    },

    /// Print the column map of a record type
    Columns {
        #[arg(short, long, value_enum, default_value = "dept")]
        kind: RecordKind,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetbind=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Import {
            input,
            kind,
            sheet,
            output,
            strict,
            verbose,
        } => {
            let options = CommandOptions {
                config,
                strict,
                verbose,
                ..Default::default()
            };
            cli::import(input, kind, sheet, output, &options)
        }

        Commands::Export {
            input,
            kind,
            sheet,
            download_dir,
            verbose,
        } => {
            let options = CommandOptions {
                config,
                download_dir,
                verbose,
                ..Default::default()
            };
            cli::export(input, kind, sheet, &options)
        }

        Commands::Template {
            kind,
            sheet,
            download_dir,
        } => {
            let options = CommandOptions {
                config,
                download_dir,
                ..Default::default()
            };
            cli::template(kind, sheet, &options)
        }

        Commands::Columns { kind } => cli::columns(kind),
    }
}
