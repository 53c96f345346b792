use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_shell_in(lines: &[&str], dir: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mysh"));
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env_remove("MYSH_LOG");
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    let mut child = command.spawn().expect("spawn mysh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        for line in lines {
            writeln!(stdin, "{line}").expect("write line");
        }
        writeln!(stdin, "exit").expect("write exit");
    }

    child.wait_with_output().expect("wait output")
}

fn run_shell(lines: &[&str]) -> Output {
    run_shell_in(lines, None)
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn pipe_transforms_output() {
    let output = run_shell(&["echo hi | tr h H"]);
    assert_eq!(stdout_of(&output), "Hi\nBye!\n");
    assert!(output.status.success());
}

#[test]
fn and_short_circuits_after_failure() {
    let output = run_shell(&["false && echo no"]);
    assert_eq!(stdout_of(&output), "Bye!\n");
}

#[test]
fn or_runs_after_failure() {
    let output = run_shell(&["false || echo yes"]);
    assert_eq!(stdout_of(&output), "yes\nBye!\n");
}

#[test]
fn skipped_command_does_not_reset_status() {
    let output = run_shell(&["false && echo skipped || echo recovered"]);
    assert_eq!(stdout_of(&output), "recovered\nBye!\n");
}

#[test]
fn operators_need_no_whitespace() {
    let output = run_shell(&["true&&echo a||echo b"]);
    assert_eq!(stdout_of(&output), "a\nBye!\n");
}

#[test]
fn sequence_runs_left_to_right_regardless_of_status() {
    let output = run_shell(&["echo a ; false ; echo b;echo c ; ; "]);
    assert_eq!(stdout_of(&output), "a\nb\nc\nBye!\n");
}

#[test]
fn cd_to_missing_directory_reports_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().canonicalize().unwrap();
    let output = run_shell_in(&["cd /nonexistent", "pwd"], Some(&cwd));

    assert!(
        stderr_of(&output).contains("mysh: cd: /nonexistent"),
        "stderr was: {}",
        stderr_of(&output)
    );
    assert_eq!(stdout_of(&output), format!("{}\nBye!\n", cwd.display()));
}

#[test]
fn cd_changes_directory_for_later_commands() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().canonicalize().unwrap();
    let cd = format!("cd {}", target.display());
    let output = run_shell(&[cd.as_str(), "pwd"]);
    assert_eq!(stdout_of(&output), format!("{}\nBye!\n", target.display()));
}

#[test]
fn bare_cd_goes_home() {
    let home = tempfile::tempdir().unwrap();
    let home_path = home.path().canonicalize().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(["-c", "cd; pwd"])
        .env("HOME", &home_path)
        .env_remove("MYSH_LOG")
        .output()
        .expect("run mysh");
    assert_eq!(stdout_of(&output), format!("{}\n", home_path.display()));
    assert!(output.stderr.is_empty(), "stderr was: {}", stderr_of(&output));
}

#[test]
fn bare_cd_without_home_reports_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().canonicalize().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(["-c", "cd || echo failed; pwd"])
        .env_remove("HOME")
        .current_dir(&cwd)
        .output()
        .expect("run mysh");
    assert!(
        stderr_of(&output).contains("mysh: cd: HOME not set"),
        "stderr was: {}",
        stderr_of(&output)
    );
    assert_eq!(stdout_of(&output), format!("failed\n{}\n", cwd.display()));
}

#[test]
fn missing_program_reports_and_continues() {
    let output = run_shell(&["mysh-definitely-missing arg", "echo still-alive"]);
    assert!(
        stderr_of(&output).contains("mysh: exec: mysh-definitely-missing"),
        "stderr was: {}",
        stderr_of(&output)
    );
    assert_eq!(stdout_of(&output), "still-alive\nBye!\n");
}

#[test]
fn missing_program_status_feeds_chain() {
    let output = run_shell(&["mysh-definitely-missing || echo fallback"]);
    assert_eq!(stdout_of(&output), "fallback\nBye!\n");
}

#[test]
fn failed_command_does_not_become_shell_exit_code() {
    let output = run_shell(&["false"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn end_of_input_exits_cleanly() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .stdin(Stdio::null())
        .output()
        .expect("run mysh");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn exit_ignores_remaining_segments() {
    let output = run_shell(&["echo before ; exit ; echo after"]);
    assert_eq!(stdout_of(&output), "before\nBye!\n");
}

#[test]
fn bytes_pass_unchanged_through_long_pipeline() {
    let output = run_shell(&[
        "head -c 100000 /dev/zero | cat | cat | cat | cat | cat | cat | cat | cat | wc -c",
    ]);
    let stdout = stdout_of(&output);
    assert_eq!(stdout.lines().next().map(str::trim), Some("100000"), "stdout was: {stdout}");
}

#[test]
fn stage_limit_is_reported() {
    let output = run_shell(&[
        "echo x | cat | cat | cat | cat | cat | cat | cat | cat | cat | cat",
        "echo next",
    ]);
    assert!(
        stderr_of(&output).contains("too many pipeline stages: 11 (limit 10)"),
        "stderr was: {}",
        stderr_of(&output)
    );
    assert_eq!(stdout_of(&output), "next\nBye!\n");
}

#[test]
fn syntax_errors_skip_segment_only() {
    let output = run_shell(&["echo hi && ; echo after", "| cat"]);
    let stderr = stderr_of(&output);
    assert!(stderr.contains("syntax error near unexpected token `&&'"), "stderr was: {stderr}");
    assert!(stderr.contains("syntax error near unexpected token `|'"), "stderr was: {stderr}");
    assert_eq!(stdout_of(&output), "after\nBye!\n");
}

#[test]
fn argument_limit_rejects_long_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(["--max-args", "3", "-c", "echo a b c; echo ok"])
        .output()
        .expect("run mysh");
    assert!(String::from_utf8_lossy(&output.stderr).contains("too many arguments: 4 (limit 3)"));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ok\n");
}

#[test]
fn command_flag_runs_one_line() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(["-c", "echo one; false && echo no; echo two"])
        .output()
        .expect("run mysh");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "one\ntwo\n");
}

#[cfg(unix)]
#[test]
fn reader_exiting_early_does_not_hang_pipeline() {
    let output = run_shell(&["yes | head -n 2", "echo ALIVE"]);
    assert_eq!(stdout_of(&output), "y\ny\nALIVE\nBye!\n");
}
