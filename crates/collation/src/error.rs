use thiserror::Error;

/// Errors raised while compiling collation rules into an engine.
///
/// Positions are character indices into the rule text that was compiled,
/// which for an extended engine is the base rules followed by the extension.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollationError {
    #[error("relation at {position} has no preceding reset")]
    RelationWithoutReset { position: usize },
    #[error("expected text after {after} at {position}")]
    MissingText { after: &'static str, position: usize },
    #[error("text at {position} does not follow a reset or relation")]
    UnexpectedText { position: usize },
    #[error("unterminated quote starting at {position}")]
    UnterminatedQuote { position: usize },
    #[error("unterminated bracket starting at {position}")]
    UnterminatedBracket { position: usize },
    #[error("invalid escape at {position}: {reason}")]
    InvalidEscape { position: usize, reason: String },
    #[error("unknown setting or reset position [{0}]")]
    UnknownOption(String),
    #[error("unsupported rule syntax '{symbol}' at {position}")]
    UnsupportedSyntax { symbol: char, position: usize },
    #[error("tailoring exhausted the primary weight space")]
    WeightOverflow,
}
