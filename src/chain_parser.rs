use crate::ast::{ChainEntry, Command, ConditionalChain, Connector, Pipeline};
use crate::config::Limits;
use crate::error::ShellError;
use crate::tokenizer;

/// Operators recognized inside a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operator {
    /// `|`
    Pipe,
    /// `&&`
    AndIf,
    /// `||`
    OrIf,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Pipe => "|",
            Operator::AndIf => "&&",
            Operator::OrIf => "||",
        }
    }
}

/// Output of the first scanning pass: command text between operators.
#[derive(Debug, PartialEq)]
enum Lexeme<'a> {
    Text(&'a str),
    Op(Operator),
}

/// Split a full input line on `;` into trimmed, non-empty segments.
pub fn split_segments(line: &str) -> Vec<&str> {
    line.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// First pass: cut the segment at every `&&`, `||` and `|`.
///
/// Two-character operators are matched before the single `|`, and operators
/// are recognized with or without surrounding whitespace. A lone `&` is not an
/// operator here; it stays in the text for the tokenizer.
fn scan(segment: &str) -> Vec<Lexeme<'_>> {
    let bytes = segment.as_bytes();
    let mut lexemes = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let (op, width) = match (bytes[i], bytes.get(i + 1)) {
            (b'&', Some(b'&')) => (Operator::AndIf, 2),
            (b'|', Some(b'|')) => (Operator::OrIf, 2),
            (b'|', _) => (Operator::Pipe, 1),
            _ => {
                i += 1;
                continue;
            }
        };

        lexemes.push(Lexeme::Text(&segment[text_start..i]));
        lexemes.push(Lexeme::Op(op));
        i += width;
        text_start = i;
    }

    lexemes.push(Lexeme::Text(&segment[text_start..]));
    lexemes
}

/// Parse one segment into a typed [`ConditionalChain`] before anything runs.
///
/// Each chain element is a pipeline. Errors:
/// - [`ShellError::EmptyInput`] when the whole segment is blank;
/// - [`ShellError::Syntax`] when an operator has no command on one side, or a
///   non-final pipeline stage carries `&`;
/// - limit errors from the tokenizer or the stage count.
pub fn parse_chain(segment: &str, limits: &Limits) -> Result<ConditionalChain, ShellError> {
    if segment.trim().is_empty() {
        return Err(ShellError::EmptyInput);
    }

    let lexemes = scan(segment);
    let mut entries = Vec::new();
    let mut stages: Vec<Command> = Vec::new();
    let mut connector = Connector::First;
    // Operator seen just before the current text, for error messages.
    let mut previous_op: Option<Operator> = None;

    let mut iter = lexemes.into_iter().peekable();
    while let Some(lexeme) = iter.next() {
        let Lexeme::Text(text) = lexeme else {
            continue;
        };
        let next_op = match iter.peek() {
            Some(Lexeme::Op(op)) => Some(*op),
            _ => None,
        };

        let command = match tokenizer::tokenize(text, limits.max_args) {
            Ok(command) => command,
            Err(ShellError::EmptyInput) => {
                let culprit = next_op.or(previous_op).unwrap_or(Operator::Pipe);
                return Err(ShellError::Syntax(culprit.as_str().to_string()));
            }
            Err(e) => return Err(e),
        };

        if command.background && next_op == Some(Operator::Pipe) {
            return Err(ShellError::Syntax("&".to_string()));
        }
        stages.push(command);

        match next_op {
            Some(Operator::Pipe) => {}
            Some(op @ (Operator::AndIf | Operator::OrIf)) => {
                entries.push(finish_pipeline(connector, std::mem::take(&mut stages), limits)?);
                connector = if op == Operator::AndIf {
                    Connector::And
                } else {
                    Connector::Or
                };
            }
            None => {
                entries.push(finish_pipeline(connector, std::mem::take(&mut stages), limits)?);
            }
        }
        previous_op = next_op;
    }

    tracing::debug!(target: "parse", entries = entries.len(), "parsed conditional chain");
    Ok(ConditionalChain { entries })
}

fn finish_pipeline(
    connector: Connector,
    stages: Vec<Command>,
    limits: &Limits,
) -> Result<ChainEntry, ShellError> {
    if stages.len() > limits.max_stages {
        return Err(ShellError::TooManyStages {
            count: stages.len(),
            limit: limits.max_stages,
        });
    }
    Ok(ChainEntry {
        connector,
        pipeline: Pipeline { stages },
    })
}
