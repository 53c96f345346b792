use std::io::Write;
use std::path::PathBuf;

use crate::ast::Command;
use crate::error::ShellError;
use crate::status::ExitStatus;

/// The list of all builtin command names.
const BUILTINS: &[&str] = &["cd", "pwd", "exit"];

/// Printed by `exit` before the interpreter terminates.
pub const FAREWELL: &str = "Bye!";

#[derive(Debug, PartialEq)]
pub enum BuiltinAction {
    Continue(ExitStatus),
    Exit,
}

/// Returns true if the command name is a shell builtin.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Run a builtin in the interpreter's own process, writing output to the
/// provided streams.
pub fn run_builtin(
    command: &Command,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> BuiltinAction {
    let args = command.args();
    match command.program() {
        "cd" => BuiltinAction::Continue(report(builtin_cd(args), stderr)),
        "pwd" => BuiltinAction::Continue(builtin_pwd(stdout, stderr)),
        "exit" => {
            let _ = writeln!(stdout, "{FAREWELL}");
            let _ = stdout.flush();
            BuiltinAction::Exit
        }
        program => {
            let _ = writeln!(stderr, "mysh: unknown builtin: {program}");
            BuiltinAction::Continue(ExitStatus::FAILURE)
        }
    }
}

fn report(result: Result<(), ShellError>, stderr: &mut dyn Write) -> ExitStatus {
    match result {
        Ok(()) => ExitStatus::SUCCESS,
        Err(e) => {
            let _ = writeln!(stderr, "mysh: {e}");
            e.status()
        }
    }
}

fn builtin_cd(args: &[String]) -> Result<(), ShellError> {
    let target = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or(ShellError::HomeNotSet)?,
    };

    std::env::set_current_dir(&target).map_err(|e| ShellError::NoSuchPath(target.clone(), e))?;
    tracing::debug!(target: "commands", dir = %target.display(), "changed directory");
    Ok(())
}

fn builtin_pwd(stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitStatus {
    match std::env::current_dir() {
        Ok(path) => {
            let _ = writeln!(stdout, "{}", path.display());
            ExitStatus::SUCCESS
        }
        Err(e) => {
            let _ = writeln!(stderr, "mysh: pwd: {e}");
            ExitStatus::FAILURE
        }
    }
}
