/// A single command: a non-empty argument vector and a background flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// `argv[0]` is the program or builtin name. Never empty.
    pub argv: Vec<String>,
    /// Set when the segment ended with a standalone `&`.
    pub background: bool,
}

impl Command {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// One or more commands joined by `|`.
///
/// Only the last stage may carry the background flag; it applies to the
/// whole pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<Command>,
}

impl Pipeline {
    pub fn is_background(&self) -> bool {
        self.stages.last().is_some_and(|cmd| cmd.background)
    }
}

/// Controls whether a chained pipeline runs based on the previous exit status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connector {
    /// The head of a chain: always runs.
    First,
    /// `&&`: run only if the previous status was 0.
    And,
    /// `||`: run only if the previous status was non-zero.
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::First => "",
            Connector::And => "&&",
            Connector::Or => "||",
        }
    }
}

/// One pipeline annotated with the connector that gates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEntry {
    pub connector: Connector,
    pub pipeline: Pipeline,
}

/// Pipelines separated by `&&`/`||`, evaluated strictly left to right.
///
/// The first entry always uses [`Connector::First`]; every later entry uses
/// `And` or `Or`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalChain {
    pub entries: Vec<ChainEntry>,
}
