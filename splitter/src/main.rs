//! csvsplit CLI - inspect CSV columns and split one column into two
//!
//! ```bash
//! csvsplit split people.csv -c nombre_completo -d " " -n primer_nombre apellido
//! csvsplit inspect people.csv             # Column report and split candidates
//! csvsplit inspect people.csv --json      # Same report as JSON
//! csvsplit interactive                    # Ask for the parameters at a prompt
//! ```

use clap::{Parser, Subcommand};
use csv_splitter::cli::inspect::{run_inspect, InspectCommand};
use csv_splitter::cli::interactive::run_interactive;
use csv_splitter::cli::prompt::InquirePrompter;
use csv_splitter::cli::split::{run_split, SplitCommand};
use csv_splitter::logs::{log_error, log_success, log_warning, REPORTER};
use csv_splitter::{
    CliError, CliResult, CollisionPolicy, LoadOptions, PromptError, ReadPolicy, Settings,
    SplitError, SplitOptions, SplitSpec,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csvsplit")]
#[command(about = "Inspect CSV columns and split one column into two", long_about = None)]
struct Cli {
    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How the input file is read
#[derive(clap::Args)]
struct InputArgs {
    /// Input field separator (default: comma)
    #[arg(long, conflicts_with = "detect_sep")]
    sep: Option<char>,

    /// Detect the input separator from the header line
    #[arg(long)]
    detect_sep: bool,

    /// Reject rows with more fields than the header
    #[arg(long)]
    strict: bool,

    /// Keep numeric-looking values as text
    #[arg(long)]
    raw: bool,
}

impl InputArgs {
    fn load_options(&self, settings: &Settings) -> LoadOptions {
        LoadOptions {
            delimiter: if self.detect_sep {
                None
            } else {
                Some(self.sep.unwrap_or(','))
            },
            policy: if self.strict || settings.strict {
                ReadPolicy::Strict
            } else {
                ReadPolicy::Lenient
            },
            coerce_numbers: !self.raw,
            ..LoadOptions::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Split one column into two on the first occurrence of a delimiter
    Split {
        /// Input CSV file
        input: PathBuf,

        /// Column to split
        #[arg(short, long)]
        column: String,

        /// Delimiter to split on
        #[arg(short, long, default_value = ",", allow_hyphen_values = true)]
        delimiter: String,

        /// Names of the two new columns
        #[arg(
            short = 'n',
            long = "new-columns",
            num_args = 2,
            required = true,
            value_names = ["FIRST", "SECOND"]
        )]
        new_columns: Vec<String>,

        /// Output file (default: <input>_modified.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail instead of overwriting an existing column with a new name
        #[arg(long)]
        no_clobber: bool,

        #[command(flatten)]
        input_args: InputArgs,
    },

    /// Show column statistics and split candidates
    Inspect {
        /// Input CSV file
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Number of sample rows (default: CSVSPLIT_SAMPLE_ROWS or 3)
        #[arg(long)]
        rows: Option<usize>,

        #[command(flatten)]
        input_args: InputArgs,
    },

    /// Ask for the split parameters at a prompt
    Interactive,
}

fn main() {
    let settings = Settings::from_env();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    REPORTER.set_quiet(cli.quiet);
    for warning in &settings.warnings {
        log_warning(warning.as_str());
    }

    let result = match cli.command {
        Commands::Split {
            input,
            column,
            delimiter,
            new_columns,
            output,
            no_clobber,
            input_args,
        } => cmd_split(
            input,
            column,
            delimiter,
            new_columns,
            output,
            no_clobber,
            &input_args,
            &settings,
        ),

        Commands::Inspect {
            input,
            json,
            rows,
            input_args,
        } => cmd_inspect(input, json, rows, &input_args, &settings),

        Commands::Interactive => cmd_interactive(&settings),
    };

    if let Err(e) = result {
        match e {
            CliError::Prompt(PromptError::Cancelled) => log_warning("Cancelled."),
            e => log_error(format!("Error: {}", e)),
        }
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_split(
    input: PathBuf,
    column: String,
    delimiter: String,
    new_columns: Vec<String>,
    output: Option<PathBuf>,
    no_clobber: bool,
    input_args: &InputArgs,
    settings: &Settings,
) -> CliResult<()> {
    let [first, second]: [String; 2] = new_columns.try_into().map_err(|_| {
        SplitError::InvalidSpec("exactly two new column names are required".into())
    })?;

    let command = SplitCommand {
        spec: SplitSpec::new(column, delimiter, first, second)?,
        load: input_args.load_options(settings),
        split: SplitOptions {
            collision: if no_clobber {
                CollisionPolicy::Reject
            } else {
                CollisionPolicy::Overwrite
            },
        },
        input,
        output,
    };

    if let Err(e) = run_split(&command, settings) {
        log_error("The operation failed.");
        return Err(e);
    }

    log_success("Operation completed successfully!");
    Ok(())
}

/// Only a missing input file is an error; other failures are reported and
/// the command still succeeds.
fn cmd_inspect(
    input: PathBuf,
    json: bool,
    rows: Option<usize>,
    input_args: &InputArgs,
    settings: &Settings,
) -> CliResult<()> {
    let command = InspectCommand {
        input,
        load: input_args.load_options(settings),
        sample_rows: rows.unwrap_or(settings.sample_rows),
        json,
    };

    let mut stdout = std::io::stdout().lock();
    match run_inspect(&command, &mut stdout) {
        Ok(_) => Ok(()),
        Err(e) if e.is_file_not_found() => Err(e),
        Err(e) => {
            log_error(format!("Error while processing the file: {}", e));
            Ok(())
        }
    }
}

fn cmd_interactive(settings: &Settings) -> CliResult<()> {
    let mut prompter = InquirePrompter;
    let mut stdout = std::io::stdout().lock();

    run_interactive(&mut prompter, settings, &mut stdout)?;
    Ok(())
}
