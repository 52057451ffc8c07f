use crate::error::{CompileErrorExt, Level};
use crate::location::{Location, Span};

/// Terminal parse failure. It carries the furthest token position any
/// alternative reached; there is no recovery and no caret diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    level: Level,
    message: String,
    issuer: String,
    position: usize,
    location: Option<Location>,
}

impl SyntaxError {
    pub fn at(position: usize, message: impl Into<String>, issuer: &str) -> Self {
        SyntaxError {
            level: Level::Error,
            message: message.into(),
            issuer: issuer.to_string(),
            position,
            location: None,
        }
    }

    pub fn no_alternative(position: usize) -> Self {
        Self::at(position, "No alternative matched.", "ssalang.parse.select")
    }

    pub fn unexpected_end(position: usize) -> Self {
        Self::at(position, "Unexpected end of input.", "ssalang.parse.root")
    }

    pub fn trailing_tokens(position: usize) -> Self {
        Self::at(position, "Trailing tokens after a complete parse.", "ssalang.parse.root")
    }

    pub fn too_deep(position: usize) -> Self {
        Self::at(position, "Program nested too deeply.", "ssalang.parse.depth")
    }

    /// A merge received children of the wrong shape. Only a grammar table
    /// bug can cause this.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::at(0, message, "ssalang.parse.merge")
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Index of the token the parser had reached.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (token {}, at {})", self.message, self.position, loc),
            None => write!(f, "{} (token {})", self.message, self.position),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl CompileErrorExt for SyntaxError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        format!("{} (token {})", self.message, self.position)
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
