use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by FormatRegistry::with_defaults()
// We need to duplicate this here since build scripts can't access the library
const AVAILABLE_FORMATS: &[&str] = &["json", "markdown"];

fn format_arg(id: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
        .value_hint(ValueHint::Other)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("preflight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for checking and converting Preflight test specs")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("check").arg(
                Arg::new("paths")
                    .num_args(0..)
                    .index(1)
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            Command::new("format")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("check").long("check").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("convert")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg("from"))
                .arg(format_arg("to").required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("list").arg(
                Arg::new("root")
                    .index(1)
                    .value_hint(ValueHint::DirPath),
            ),
        )
        .subcommand(
            Command::new("plan").arg(
                Arg::new("input")
                    .required(true)
                    .index(1)
                    .value_hint(ValueHint::FilePath),
            ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "preflight", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "preflight", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "preflight", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
