//! mdkanban command-line filter.
//!
//! # Responsibility
//! - Expose `extract-sections` as a text-in, JSON-out filter.
//! - Expose the frontmatter gate as `is-kanban` for scripting.
//!
//! # Invariants
//! - Document text never reaches the log.
//! - Non-UTF-8 input fails with a non-zero exit code.

use clap::{Parser, Subcommand};
use log::{debug, info};
use mdkanban_core::{
    document_enables_kanban, extract_bytes, init_logging, BoardConfig, ConfigError,
    ExtractError, ExtractPolicy, Indentation, LoggingError, MarkerCase,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mdkanban")]
#[command(version, about = "Render markdown headings and checklists as board sections")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract board sections from a markdown document as JSON
    ExtractSections {
        /// Input file; reads stdin when omitted or `-`
        input: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Treat `- [X]` as checked
        #[arg(long)]
        ignore_case: bool,
        /// Accept indented checklist items
        #[arg(long)]
        allow_indent: bool,
        /// Skip a leading YAML frontmatter block
        #[arg(long)]
        strip_frontmatter: bool,
    },
    /// Print whether the document frontmatter enables the board view
    IsKanban {
        /// Input file; reads stdin when omitted or `-`
        input: Option<PathBuf>,
        /// Frontmatter key to check (defaults to the configured gate key)
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Read { source_id: String, source: std::io::Error },
    InvalidInput(ExtractError),
    Output(std::io::Error),
    Encode(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Read { source_id, source } => write!(f, "failed to read `{source_id}`: {source}"),
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
            Self::Encode(err) => write!(f, "failed to encode board: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Read { source, .. } => Some(source),
            Self::InvalidInput(err) => Some(err),
            Self::Output(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<ExtractError> for CliError {
    fn from(value: ExtractError) -> Self {
        Self::InvalidInput(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match run(cli, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mdkanban: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, stdin: &mut impl Read, stdout: &mut impl Write) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => BoardConfig::load(path).map_err(CliError::Config)?,
        None => BoardConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.logging.dir = Some(dir);
    }
    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir).map_err(CliError::Logging)?;
    }

    match cli.command {
        Commands::ExtractSections {
            input,
            pretty,
            ignore_case,
            allow_indent,
            strip_frontmatter,
        } => {
            let policy = apply_flags(config.policy, ignore_case, allow_indent, strip_frontmatter);
            let bytes = read_input(input.as_deref(), stdin)?;
            let board = extract_bytes(&bytes, &policy)?;
            info!(
                "event=cli_extract module=cli status=ok sections={} tasks={}",
                board.len(),
                board.task_count()
            );
            let encoded = if pretty {
                serde_json::to_string_pretty(&board)
            } else {
                serde_json::to_string(&board)
            }
            .map_err(CliError::Encode)?;
            writeln!(stdout, "{encoded}").map_err(CliError::Output)
        }
        Commands::IsKanban { input, key } => {
            let bytes = read_input(input.as_deref(), stdin)?;
            let document = std::str::from_utf8(&bytes).map_err(|err| {
                CliError::InvalidInput(ExtractError::InvalidInput {
                    valid_up_to: err.valid_up_to(),
                })
            })?;
            let key = key.unwrap_or(config.gate.key);
            let enabled = document_enables_kanban(document, &key);
            debug!("event=cli_gate module=cli status=ok enabled={enabled}");
            writeln!(stdout, "{enabled}").map_err(CliError::Output)
        }
    }
}

fn apply_flags(
    mut policy: ExtractPolicy,
    ignore_case: bool,
    allow_indent: bool,
    strip_frontmatter: bool,
) -> ExtractPolicy {
    if ignore_case {
        policy.checked_marker = MarkerCase::IgnoreCase;
    }
    if allow_indent {
        policy.indentation = Indentation::Allow;
    }
    if strip_frontmatter {
        policy.strip_frontmatter = true;
    }
    policy
}

fn read_input(input: Option<&Path>, stdin: &mut impl Read) -> Result<Vec<u8>, CliError> {
    let result = match input {
        Some(path) if path != Path::new("-") => std::fs::read(path),
        _ => {
            let mut bytes = Vec::new();
            stdin.read_to_end(&mut bytes).map(|_| bytes)
        }
    };
    result.map_err(|source| CliError::Read {
        source_id: input.map_or_else(|| "-".to_string(), |p| p.display().to_string()),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, CliError};
    use clap::Parser;
    use std::io::Write;

    fn run_with(args: &[&str], stdin: &[u8]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        let mut input = stdin;
        let mut output = Vec::new();
        run(cli, &mut input, &mut output)?;
        Ok(String::from_utf8(output).expect("utf-8 output"))
    }

    #[test]
    fn extract_sections_reads_stdin_and_prints_json() {
        let output = run_with(
            &["mdkanban", "extract-sections"],
            b"# To Do\n- [ ] Buy milk\n# Done",
        )
        .expect("extract");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(value[0]["heading"], "To Do");
        assert_eq!(value[0]["tasks"][0]["checked"], false);
        assert_eq!(value[1]["tasks"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn extract_sections_reads_file_argument() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"# Col\n  - [X] indented").expect("write");
        let path = file.path().to_str().expect("utf-8 path");

        let strict = run_with(&["mdkanban", "extract-sections", path], b"").expect("strict");
        assert_eq!(strict.trim(), r#"[{"heading":"Col","line":1,"tasks":[]}]"#);

        let relaxed = run_with(
            &[
                "mdkanban",
                "extract-sections",
                "--ignore-case",
                "--allow-indent",
                path,
            ],
            b"",
        )
        .expect("relaxed");
        let value: serde_json::Value = serde_json::from_str(&relaxed).expect("json output");
        assert_eq!(value[0]["tasks"][0]["checked"], true);
    }

    #[test]
    fn empty_input_prints_empty_array() {
        let output = run_with(&["mdkanban", "extract-sections", "-"], b"").expect("extract");
        assert_eq!(output, "[]\n");
    }

    #[test]
    fn invalid_utf8_input_fails() {
        let err = run_with(&["mdkanban", "extract-sections"], b"# A\n\xff").expect_err("bad input");
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(err.to_string().contains("invalid input"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = run_with(&["mdkanban", "extract-sections", "/definitely/missing.md"], b"")
            .expect_err("missing file");
        assert!(err.to_string().contains("/definitely/missing.md"));
    }

    #[test]
    fn is_kanban_prints_gate_result() {
        let enabled = run_with(&["mdkanban", "is-kanban"], b"---\nkanban: true\n---\n# A")
            .expect("gate");
        assert_eq!(enabled, "true\n");

        let custom = run_with(
            &["mdkanban", "is-kanban", "--key", "board"],
            b"---\nkanban: true\n---\n",
        )
        .expect("gate");
        assert_eq!(custom, "false\n");
    }

    #[test]
    fn config_file_sets_default_policy() {
        let mut config = tempfile::NamedTempFile::new().expect("temp config");
        write!(config, r#"{{"policy": {{"strip_frontmatter": true}}}}"#).expect("write config");
        let config_path = config.path().to_str().expect("utf-8 path");

        let output = run_with(
            &["mdkanban", "--config", config_path, "extract-sections"],
            b"---\nkanban: true\n---\n# A",
        )
        .expect("extract");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["line"], 4);
    }
}
