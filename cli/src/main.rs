use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Args, Parser as ClapParser, Subcommand};
use command_bind_core::{DocumentError, Error, SchemaDocument, SchemaError, ValueMap};
use command_bind_parser::{
    Parser, ParserResult, ParserSettings, SettingsError, Unparser, UnparserSettings,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Exit code when the arguments could not be bound.
const NOT_PARSED_EXIT: i32 = 2;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, ClapParser)]
#[command(name = "bind-check")]
#[command(about = "Check argument schemas and bind argument lists against them")]
struct Cli {
    /// Log pipeline details to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more schema documents (JSON, or YAML by extension).
    Validate(ValidateArgs),
    /// Bind an argument list against a schema document.
    Parse(ParseArgs),
    /// Format a JSON object of member values as a command line.
    Unparse(UnparseArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema document files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema document.
    #[arg(long)]
    schema: PathBuf,
    /// Parser settings YAML file.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    /// Arguments to bind, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct UnparseArgs {
    /// Schema document.
    #[arg(long)]
    schema: PathBuf,
    /// JSON file holding an object of member name to value.
    #[arg(long)]
    values: PathBuf,
    /// Use short names where available.
    #[arg(long)]
    prefer_short_name: bool,
    /// Bundle short switches into one argument.
    #[arg(long)]
    group_switches: bool,
    /// Write `--name=value` for long names.
    #[arg(long)]
    use_equal_token: bool,
    /// Do not write `--` before positional values.
    #[arg(long)]
    no_separator: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load '{}': {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("failed to load settings '{}': {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid values: {0}")]
    Values(#[source] DocumentError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} schema document(s) failed validation")]
    Invalid(usize),
}

#[derive(Debug, Serialize)]
struct ParseReport {
    parsed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<Error>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<Error>>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Parse(args) => run_parse(args),
        Command::Unparse(args) => run_unparse(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "bind_check=debug,command_bind_parser=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_document(path: &Path) -> Result<SchemaDocument, CliError> {
    SchemaDocument::load(path).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })
}

fn run_validate(args: ValidateArgs) -> Result<i32, CliError> {
    let mut failures = 0usize;
    for path in &args.inputs {
        match load_document(path).and_then(|doc| {
            doc.into_schema().map_err(|source| CliError::Document {
                path: path.clone(),
                source,
            })
        }) {
            Ok(schema) => {
                debug!(path = %path.display(), members = schema.members().len(), "Schema is valid");
            }
            Err(err) => {
                eprintln!("{err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Invalid(failures));
    }
    println!("Validated {} schema document(s).", args.inputs.len());
    Ok(0)
}

fn run_parse(args: ParseArgs) -> Result<i32, CliError> {
    let schema = load_document(&args.schema)?
        .into_schema()
        .map_err(|source| CliError::Document {
            path: args.schema.clone(),
            source,
        })?;
    let settings = match &args.settings {
        Some(path) => ParserSettings::load(path).map_err(|source| CliError::Settings {
            path: path.clone(),
            source,
        })?,
        None => ParserSettings::default(),
    };

    let result = Parser::new(settings).parse_arguments(&schema, &args.args)?;
    let (report, code) = match result {
        ParserResult::Parsed(parsed) => (
            ParseReport {
                parsed: true,
                value: Some(parsed.value),
                warnings: Some(parsed.warnings),
                errors: None,
            },
            0,
        ),
        ParserResult::NotParsed(not_parsed) => (
            ParseReport {
                parsed: false,
                value: None,
                warnings: None,
                errors: Some(not_parsed.errors),
            },
            NOT_PARSED_EXIT,
        ),
    };

    let raw = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Yaml => serde_yaml::to_string(&report)?,
    };
    println!("{raw}");
    Ok(code)
}

fn run_unparse(args: UnparseArgs) -> Result<i32, CliError> {
    let doc = load_document(&args.schema)?;
    let file = fs::File::open(&args.values).map_err(|source| CliError::Read {
        path: args.values.clone(),
        source,
    })?;
    let raw: ValueMap = serde_json::from_reader(BufReader::new(file))?;
    let values = doc.coerce_values(raw).map_err(CliError::Values)?;
    let schema = doc.into_schema().map_err(|source| CliError::Document {
        path: args.schema.clone(),
        source,
    })?;

    let settings = UnparserSettings {
        prefer_short_name: args.prefer_short_name,
        group_switches: args.group_switches,
        use_equal_token: args.use_equal_token,
        emit_separator: !args.no_separator,
    };
    println!("{}", Unparser::new(settings).format_command_line(&schema, &values));
    Ok(0)
}
