use crate::error::{CompileErrorExt, Level};
use crate::location::{Location, Span};

/// Raised when the source contains a character no token can start with, or
/// ends inside a string literal.
#[derive(Debug, Clone)]
pub struct LexError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl LexError {
    pub fn with(level: Level, message: String, issuer: String, location: Option<Location>, span: Option<Span>) -> Self {
        LexError {
            level,
            message,
            issuer,
            location,
            span,
        }
    }

    /// Build a lex error from a failed run of the token grammar.
    pub(crate) fn from_pest<R: pest::RuleType>(file: &str, source: &str, error: &pest::error::Error<R>) -> Self {
        let offset = match error.location {
            pest::error::InputLocation::Pos(p) => p,
            pest::error::InputLocation::Span((p, _)) => p,
        };
        let message = match source.get(offset..).and_then(|rest| rest.chars().next()) {
            Some(ch) => format!("Unexpected character {:?}.", ch),
            None => "Unexpected end of input.".to_string(),
        };
        let location = Location::from_offset(file, source, offset);
        LexError::with(
            Level::Error,
            message,
            "ssalang.token.tokenize".into(),
            Some(location.clone()),
            Some(Span::new(location.clone(), location)),
        )
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for LexError {}

impl CompileErrorExt for LexError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
