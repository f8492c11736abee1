use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use pnfield_core::text::layout::MAX_LINE_LENGTH;
use pnfield_core::{
    AnalysisOptions, CommentStrippingReader, DecodePlan, ETHERTYPE_PROFINET, FieldRegistry,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("PNFIELD_BUILD_COMMIT"),
    ", ",
    env!("PNFIELD_BUILD_DATE"),
    ")"
);

const PLAN_HELP: &str = "Comma-separated `[label=]shape` items. Shapes: u8 u16 u32 i16 i32 oui mac ipv4 uuid, \
pad:N align4 user:N bytes:N frag:N undecoded:N malformed:N, and a final `rest`.";

#[derive(Parser, Debug)]
#[command(name = "pnfield")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Field-level decoding of PROFINET frames and companion description files.",
    long_about = None,
    after_help = "Examples:\n  pnfield frame decode --hex 8000fe01 --plan 'frame_id=u16,rest'\n  pnfield pcap decode capture.pcapng --plan 'frame_id=u16,rest' -o report.json\n  pnfield text strip device.xml"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a single frame payload.
    Frame {
        #[command(subcommand)]
        command: FrameCommands,
    },
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Operations on description (GSDML/XML) files.
    Text {
        #[command(subcommand)]
        command: TextCommands,
    },
}

#[derive(Subcommand, Debug)]
enum FrameCommands {
    /// Apply a decode plan to hex-encoded payload bytes and print the JSON result.
    Decode {
        /// Payload bytes as hex; whitespace and ':' separators are ignored
        #[arg(long)]
        hex: String,

        #[arg(long, env = "PNFIELD_PLAN", help = PLAN_HELP)]
        plan: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every frame of one EtherType in a capture and write a JSON report.
    #[command(
        after_help = "Examples:\n  pnfield pcap decode capture.pcapng --plan 'frame_id=u16,rest' -o report.json\n  pnfield pcap decode 'captures/*.pcap' --plan rest --stdout --pretty"
    )]
    Decode {
        /// Path or glob pattern resolving to one .pcap or .pcapng file
        input: PathBuf,

        #[arg(long, env = "PNFIELD_PLAN", help = PLAN_HELP)]
        plan: String,

        /// EtherType selecting decoded frames (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0x8892", value_parser = parse_ether_type)]
        ethertype: u16,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TextCommands {
    /// Print a file with `<!-- -->` comments removed.
    Strip {
        /// Description file to read
        input: PathBuf,

        /// Maximum bytes returned per line
        #[arg(long, default_value_t = MAX_LINE_LENGTH)]
        capacity: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Frame { command } => match command {
            FrameCommands::Decode { hex, plan, pretty } => cmd_frame_decode(&hex, &plan, pretty),
        },
        Commands::Pcap { command } => match command {
            PcapCommands::Decode {
                input,
                plan,
                ethertype,
                report,
                stdout,
                pretty,
                quiet,
            } => cmd_pcap_decode(PcapDecodeArgs {
                input,
                plan,
                ether_type: ethertype,
                report,
                stdout,
                pretty,
                quiet,
            }),
        },
        Commands::Text { command } => match command {
            TextCommands::Strip { input, capacity } => cmd_text_strip(&input, capacity),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn parse_ether_type(value: &str) -> Result<u16, String> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse::<u16>(),
    };
    parsed.map_err(|err| format!("invalid EtherType '{value}': {err}"))
}

fn load_plan(plan: &str) -> Result<(DecodePlan, FieldRegistry), CliError> {
    let mut registry = FieldRegistry::new();
    let plan = DecodePlan::parse(plan, &mut registry).map_err(|err| {
        CliError::new(
            format!("invalid decode plan: {err}"),
            Some("example: --plan 'frame_id=u16,cycle=u16,rest'".to_string()),
        )
    })?;
    debug!(steps = plan.steps().len(), fields = registry.len(), "plan loaded");
    Ok((plan, registry))
}

fn cmd_frame_decode(hex_input: &str, plan: &str, pretty: bool) -> Result<(), CliError> {
    let (plan, registry) = load_plan(plan)?;
    let cleaned: String = hex_input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let data = hex::decode(&cleaned).map_err(|err| {
        CliError::new(
            format!("invalid hex payload: {err}"),
            Some("pass an even number of hex digits, e.g. --hex 8000fe01".to_string()),
        )
    })?;

    let report = pnfield_core::decode_frame(&data, &plan, &registry);
    println!("{}", serialize_json(&report, pretty)?);
    Ok(())
}

struct PcapDecodeArgs {
    input: PathBuf,
    plan: String,
    ether_type: u16,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    quiet: bool,
}

fn cmd_pcap_decode(args: PcapDecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let (plan, registry) = load_plan(&args.plan)?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&resolved_input, &path)?;
        Some(path)
    };

    if args.ether_type != ETHERTYPE_PROFINET {
        info!(ether_type = format!("0x{:04x}", args.ether_type), "custom EtherType");
    }
    let options = AnalysisOptions {
        ether_type: args.ether_type,
    };
    let rep = pnfield_core::analyze_pcap_file(&resolved_input, &plan, &registry, options)
        .context("PCAP/PCAPNG decoding failed")?;
    let json = serialize_json(&rep, args.pretty)?;

    let Some(report_path) = report_path else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if !args.quiet {
        eprintln!(
            "OK: {} frames decoded -> {}",
            rep.frames.len(),
            report_path.display()
        );
    }
    Ok(())
}

fn cmd_text_strip(input: &Path, capacity: usize) -> Result<(), CliError> {
    if capacity == 0 {
        return Err(CliError::new(
            "capacity must be at least 1",
            Some(format!("the default is {MAX_LINE_LENGTH}")),
        ));
    }
    let file = File::open(input).map_err(|err| {
        CliError::new(
            format!("cannot open {}: {err}", input.display()),
            Some("pass a readable GSDML/XML file".to_string()),
        )
    })?;

    let mut reader = CommentStrippingReader::new(BufReader::new(file));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    while let Some(line) = reader.read_line(capacity) {
        out.write_all(&line).context("Failed to write output")?;
    }
    out.flush().context("Failed to write output")?;
    Ok(())
}

fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn ensure_distinct_output(input: &Path, report_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory cannot contain the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| CliError::new("invalid report path", None))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!("multiple files match pattern '{pattern}' ({count} matches); matches: {listed}"),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
