mod ast;
mod builtins;
mod chain_parser;
mod config;
mod error;
mod jobs;
mod pipeline;
mod reaper;
mod shell;
mod status;
mod supervisor;
mod tokenizer;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use crossterm::tty::IsTty;

use crate::config::Cli;
use crate::shell::{Flow, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        let _ = io::stdout().flush();
    }) {
        tracing::warn!("failed to set Ctrl-C handler: {e}");
    }

    let shell = match Shell::new(cli.limits()) {
        Ok(shell) => shell,
        Err(e) => {
            e.report();
            return ExitCode::FAILURE;
        }
    };

    if let Some(line) = &cli.command {
        shell.run_line(line);
        return ExitCode::SUCCESS;
    }

    let show_prompt = !cli.no_prompt && io::stdin().is_tty();
    let code = read_eval_loop(&shell, show_prompt);
    tracing::debug!(target: "jobs", pending = shell.pending_background(), "shutting down");
    code
}

/// Read one line at a time until `exit` or end-of-input. Bytes that are not
/// valid UTF-8 are replaced rather than ending the loop.
fn read_eval_loop(shell: &Shell, show_prompt: bool) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = Vec::new();

    loop {
        if show_prompt {
            print_prompt(&mut stdout);
        }

        input.clear();
        match stdin.lock().read_until(b'\n', &mut input) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {
                let line = String::from_utf8_lossy(&input);
                if let Flow::Exit = shell.run_line(line.trim_end_matches(['\n', '\r'])) {
                    return ExitCode::SUCCESS;
                }
            }
            Err(e) => {
                eprintln!("mysh: error reading input: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
}

fn print_prompt(stdout: &mut io::Stdout) {
    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "?".to_string());
    let _ = write!(stdout, "mysh:{cwd}> ");
    let _ = stdout.flush();
}

fn init_tracing(level: tracing::Level) {
    if tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .try_init()
        .is_err()
    {
        eprintln!("warning: failed to initialize tracing.");
    }
}
