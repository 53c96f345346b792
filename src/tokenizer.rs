use crate::ast::Command;
use crate::error::ShellError;

/// Literal token that marks a command as background when it comes last.
const BACKGROUND_MARKER: &str = "&";

/// Split one command's text into a [`Command`].
///
/// Tokens are separated by runs of whitespace; there is no quoting or
/// escaping. A final standalone `&` is removed and recorded as the
/// background flag. Text with no tokens yields [`ShellError::EmptyInput`].
///
/// `max_args` bounds the number of remaining tokens (program name included);
/// a longer command is rejected rather than truncated.
pub fn tokenize(text: &str, max_args: usize) -> Result<Command, ShellError> {
    let mut argv: Vec<String> = text.split_whitespace().map(str::to_string).collect();

    let background = argv.last().is_some_and(|last| last == BACKGROUND_MARKER);
    if background {
        argv.pop();
    }

    if argv.is_empty() {
        return Err(ShellError::EmptyInput);
    }

    if argv.len() > max_args {
        return Err(ShellError::TooManyArguments {
            count: argv.len(),
            limit: max_args,
        });
    }

    tracing::trace!(target: "parse", ?argv, background, "tokenized command");
    Ok(Command { argv, background })
}
