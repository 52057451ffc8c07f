use std::path::PathBuf;

use crate::error::{CompileErrorExt, Level, boxed};
use crate::location::{Location, Span};

/// A unit of source text handed to the compiler.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn CompileErrorExt>> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path)
            .map_err(|_| boxed(MissingScriptError { path: path.clone() }))?;
        Ok(Script {
            name,
            path,
            content,
        })
    }

    /// Wrap in-memory source (stdin, tests) as a script.
    pub fn from_source(name: &str, content: impl Into<String>) -> Self {
        Script {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.into(),
        }
    }

    /// Location of a byte offset inside this script.
    pub fn location_of(&self, offset: usize) -> Location {
        Location::from_offset(&self.name, &self.content, offset)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing script at {:?}", self.path)
    }
}

impl std::error::Error for MissingScriptError {}

impl CompileErrorExt for MissingScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        format!("Missing script at {:?}", self.path)
    }

    fn issuer(&self) -> String {
        "ssalang.script".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
