// Command-line interface for preflight
//
// This binary works with Preflight spec files: Markdown documents that describe one integration
// test each (query, stubbed data sources, expected result).
//
// The core capabilities use the preflight-spec crate. This binary is only the shell around it:
// argument parsing, configuration, logging setup, file IO and exit codes.
//
// Usage:
//  preflight check [<path>...]                                 - Validate specs (defaults to every spec under specs.root)
//  preflight format <input> [--check]                          - Print the canonical rendition of a spec
//  preflight convert <input> --to <format> [--from <format>] [--output <file>]
//  preflight list [<root>]                                     - List discovered specs
//  preflight plan <input>                                      - Show which stub answers which operation
//
// Logging goes to stderr. --verbose forces debug, otherwise RUST_LOG, otherwise log.filter from the
// configuration.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use preflight_config::{Loader, PreflightConfig};
use preflight_spec::{
    check_payloads, discover_specs, read_spec_file, read_spec_with_filename, write_spec,
    FormatRegistry, OperationPlan, Spec, StubPlan,
};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "preflight.toml";

// The formats registered by FormatRegistry::with_defaults(), as clap needs them before any registry
// exists. build.rs keeps its own copy for the completions.
const AVAILABLE_FORMATS: &[&str] = &["json", "markdown"];

fn build_cli() -> Command {
    Command::new("preflight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for checking and converting Preflight test specs")
        .long_about(
            "preflight is a command-line tool for working with Preflight spec files.\n\n\
            Commands:\n  \
            - check:   Validate specs (structure, JSON payloads, stub plan)\n  \
            - format:  Rewrite a spec in canonical layout\n  \
            - convert: Convert between markdown and json\n  \
            - list:    List discovered specs\n  \
            - plan:    Show how stubs answer each operation\n\n\
            Examples:\n  \
            preflight check                              # Check every spec under specs.root\n  \
            preflight check orders.spec.md               # Check one file\n  \
            preflight format orders.spec.md --check      # Fail if not canonical\n  \
            preflight convert orders.spec.md --to json   # JSON on stdout",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a preflight.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Enable debug logging on stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("check")
                .about("Validate spec files")
                .long_about(
                    "Parse each spec and report the first error per file.\n\n\
                    With check.validate_json enabled (the default), fenced payloads must be\n\
                    valid JSON and the stubs must form a usable plan.\n\n\
                    Without paths, every spec under specs.root is checked.",
                )
                .arg(
                    Arg::new("paths")
                        .help("Spec files to check")
                        .num_args(0..)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Format a spec file")
                .long_about(
                    "Parse the spec and write it back in canonical layout.\n\n\
                    Output is always written to stdout. With --check nothing is printed and the\n\
                    exit status tells whether the file is already canonical.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help("Exit with status 1 if the file is not canonically formatted")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between spec formats")
                .long_about(
                    "Convert specs between formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Preflight Markdown (.md)\n  \
                    - json:     JSON rendition of the spec model (.json)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List discovered specs with their name and stub count")
                .arg(
                    Arg::new("root")
                        .help("Directory to search (defaults to specs.root)")
                        .index(1)
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the stub plan of a spec")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_tracing(matches.get_flag("verbose"), &config);

    match matches.subcommand() {
        Some(("check", sub_matches)) => {
            let paths: Vec<PathBuf> = sub_matches
                .get_many::<String>("paths")
                .map(|values| values.map(PathBuf::from).collect())
                .unwrap_or_default();
            handle_check_command(paths, &config);
        }
        Some(("format", sub_matches)) => {
            let input = required(sub_matches, "input");
            handle_format_command(Path::new(input), sub_matches.get_flag("check"));
        }
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let from_arg = sub_matches.get_one::<String>("from");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());

            let registry = FormatRegistry::default();
            // Auto-detect --from if not provided
            let from = match from_arg {
                Some(f) => f.to_string(),
                None => registry
                    .detect_format_from_filename(input)
                    .unwrap_or_else(|| {
                        exit_with(format!(
                            "Could not detect format from filename '{input}'. Please specify --from explicitly"
                        ))
                    }),
            };
            handle_convert_command(&registry, Path::new(input), &from, to, output);
        }
        Some(("list", sub_matches)) => {
            let root = sub_matches
                .get_one::<String>("root")
                .map(PathBuf::from)
                .unwrap_or_else(|| config.specs.root.clone());
            handle_list_command(&root, &config);
        }
        Some(("plan", sub_matches)) => {
            let input = required(sub_matches, "input");
            handle_plan_command(Path::new(input));
        }
        _ => exit_with("Unknown subcommand. Use --help for usage information."),
    }
}

/// Handle the check command
fn handle_check_command(paths: Vec<PathBuf>, config: &PreflightConfig) {
    let paths = if paths.is_empty() {
        discover_or_exit(&config.specs.root, &config.specs.suffix)
    } else {
        paths
    };

    if paths.is_empty() {
        eprintln!("No specs found under {}", config.specs.root.display());
        return;
    }

    let mut failures = 0;
    for path in &paths {
        match check_file(path, config.check.validate_json) {
            Ok(()) => println!("ok {}", path.display()),
            Err(problems) => {
                failures += 1;
                for problem in problems {
                    eprintln!("error {}: {problem}", path.display());
                }
            }
        }
    }

    tracing::debug!(checked = paths.len(), failures, "check finished");
    if failures > 0 {
        eprintln!("{failures} of {} specs failed", paths.len());
        std::process::exit(1);
    }
}

fn check_file(path: &Path, validate_json: bool) -> Result<(), Vec<String>> {
    let spec = read_spec_file(path).map_err(|err| vec![err.to_string()])?;
    if !validate_json {
        return Ok(());
    }

    let mut problems: Vec<String> = check_payloads(&spec)
        .iter()
        .map(|issue| issue.to_string())
        .collect();
    if let Err(err) = StubPlan::from_spec(&spec) {
        problems.push(err.to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Handle the format command
fn handle_format_command(input: &Path, check: bool) {
    let source = read_or_exit(input);
    let filename = input.file_name().unwrap_or(input.as_os_str()).to_string_lossy();
    let spec = read_spec_with_filename(&source, &filename).unwrap_or_else(|e| exit_with(e));
    let formatted = write_spec(&spec);

    if check {
        if formatted != source {
            exit_with(format!("{} is not canonically formatted", input.display()));
        }
        return;
    }
    print!("{formatted}");
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &Path,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    // Validate formats exist
    if let Err(e) = registry.get(from) {
        exit_with(e);
    }
    if let Err(e) = registry.get(to) {
        exit_with(e);
    }

    let source = read_or_exit(input);
    let filename = input.file_name().map(|name| name.to_string_lossy());

    let spec = registry
        .parse(&source, from, filename.as_deref())
        .unwrap_or_else(|e| exit_with(format!("Parse error: {e}")));
    let result = registry
        .serialize(&spec, to)
        .unwrap_or_else(|e| exit_with(format!("Serialization error: {e}")));

    match output {
        Some(path) => fs::write(path, result)
            .unwrap_or_else(|e| exit_with(format!("Error writing file '{path}': {e}"))),
        None => print!("{result}"),
    }
}

/// Handle the list command
fn handle_list_command(root: &Path, config: &PreflightConfig) {
    let mut failures = 0;
    for path in discover_or_exit(root, &config.specs.suffix) {
        match read_spec_file(&path) {
            Ok(spec) => println!(
                "{}\t{}\t{}",
                path.display(),
                spec.name,
                stub_count(&spec)
            ),
            Err(err) => {
                failures += 1;
                eprintln!("error {}: {err}", path.display());
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}

fn stub_count(spec: &Spec) -> String {
    match spec.data_sources.len() {
        1 => "1 stub".to_string(),
        n => format!("{n} stubs"),
    }
}

/// Handle the plan command
fn handle_plan_command(input: &Path) {
    let spec = load_or_exit(input);
    let plan = StubPlan::from_spec(&spec).unwrap_or_else(|e| exit_with(e));

    for (operation, operation_plan) in plan.operations() {
        println!("{operation} ({})", operation_plan.mode());
        match operation_plan {
            OperationPlan::RequestResponse(calls) => {
                for call in calls {
                    if call.parameters.is_empty() {
                        println!("  - {}", call.label);
                    } else {
                        println!("  - {} when {}", call.label, call.parameters_json());
                    }
                }
            }
            OperationPlan::Stream { label, messages } => {
                println!("  - {label} emits {} messages", messages.len());
            }
        }
    }
    if spec.expects_collection() {
        println!("expects a collection");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> PreflightConfig {
    let loader = Loader::new().with_optional_file(DEFAULT_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| exit_with(format!("Failed to load configuration: {err}")))
}

/// --verbose enables DEBUG, otherwise use RUST_LOG, otherwise log.filter from the config
fn init_tracing(verbose: bool, config: &PreflightConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_else(|| exit_with(format!("Missing required argument '{id}'")))
}

fn read_or_exit(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with(format!("Error reading file '{}': {e}", path.display())))
}

fn load_or_exit(path: &Path) -> Spec {
    read_spec_file(path).unwrap_or_else(|e| exit_with(e))
}

fn discover_or_exit(root: &Path, suffix: &str) -> Vec<PathBuf> {
    discover_specs(root, suffix).unwrap_or_else(|e| exit_with(e))
}

fn exit_with(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}
