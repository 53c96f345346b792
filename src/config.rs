use clap::Parser;
use clap::builder::TypedValueParser;

/// Default bound on arguments per command, program name included.
pub const DEFAULT_MAX_ARGS: usize = 63;
/// Default bound on stages per pipeline.
pub const DEFAULT_MAX_STAGES: usize = 10;
/// Default bound on the length of one input line, in bytes.
pub const DEFAULT_MAX_LINE: usize = 4096;

/// A minimal interactive command interpreter.
#[derive(Parser, Debug)]
#[command(name = "mysh", version, about)]
pub struct Cli {
    /// Evaluate LINE and exit instead of reading from standard input.
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Option<String>,

    /// Maximum number of arguments per command (longer commands are rejected).
    #[arg(long, default_value_t = DEFAULT_MAX_ARGS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub max_args: usize,

    /// Maximum number of stages per pipeline.
    #[arg(long, default_value_t = DEFAULT_MAX_STAGES, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub max_stages: usize,

    /// Maximum length of one input line in bytes (longer lines are rejected).
    #[arg(long, default_value_t = DEFAULT_MAX_LINE, value_parser = clap::value_parser!(u32).range(1..).map(|n| n as usize))]
    pub max_line: usize,

    /// Log verbosity for internal tracing (error, warn, info, debug, trace).
    #[arg(long, env = "MYSH_LOG", default_value = "warn")]
    pub log_level: tracing::Level,

    /// Never print the prompt.
    #[arg(long)]
    pub no_prompt: bool,
}

impl Cli {
    pub fn limits(&self) -> Limits {
        Limits {
            max_args: self.max_args,
            max_stages: self.max_stages,
            max_line: self.max_line,
        }
    }
}

/// Configured bounds on parsed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_args: usize,
    pub max_stages: usize,
    pub max_line: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_args: DEFAULT_MAX_ARGS,
            max_stages: DEFAULT_MAX_STAGES,
            max_line: DEFAULT_MAX_LINE,
        }
    }
}
