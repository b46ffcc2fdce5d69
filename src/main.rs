use std::io::{self, BufRead, IsTerminal, Write};

use rogerian::{ReplyOutcome, Responder, Script};
use tracing_subscriber::EnvFilter;

const DEFAULT_SCRIPT: &str = "scripts/doctor.txt";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    script: String,
    input: Option<String>,
}

fn run(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let script = Script::load(&config.script)?;
    let mut session = Responder::from_script(script);

    // One-shot mode: a single exchange, no greeting or prompt.
    if let Some(input) = &config.input {
        match session.respond(input)? {
            ReplyOutcome::Reply(reply) => println!("{reply}"),
            ReplyOutcome::SessionEnded => println!("{}", session.final_statement()?),
        }
        return Ok(());
    }

    let interactive = io::stdin().is_terminal();
    println!("{}", session.initial_greeting()?);

    let stdin = io::stdin();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF ends the conversation like a quit phrase
        }
        let line = line.trim_end_matches(['\r', '\n']);
        match session.respond(line)? {
            ReplyOutcome::Reply(reply) => println!("{reply}"),
            ReplyOutcome::SessionEnded => break,
        }
    }

    println!("{}", session.final_statement()?);
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut script: Option<String> = None;
    let mut input: Option<String> = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("rogerian {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--script" | "-s" => {
                let value = args.next().ok_or_else(|| "error: --script expects a path".to_string())?;
                script = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--script=") => {
                script = Some(arg.trim_start_matches("--script=").to_string());
            }
            _ if arg.starts_with("--input=") => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg.trim_start_matches("--input=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    Ok(CliConfig { script: script.unwrap_or_else(|| DEFAULT_SCRIPT.to_string()), input })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "rogerian {version}

Script-driven conversational responder CLI.

Usage:
  rogerian [OPTIONS]                 Interactive conversation (greeting, prompt, farewell).
  rogerian [OPTIONS] [--] <input...> One reply for <input>, then exit.
  rogerian [OPTIONS] --input <text>  Same as above.

Options:
  -s, --script <path>        Rule script to load.
                             Default: {default_script}
  -i, --input <text>         Produce a single reply for <text> and exit.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Script or engine error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        default_script = DEFAULT_SCRIPT
    )
}
