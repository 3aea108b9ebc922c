//! Entry - One stored alias
//!
//! An entry is either a command (its first token is a program on `PATH`)
//! or a piece of text. The type is fixed when the entry is created.

use colored::{Color, Colorize};
use rqs_core::process::shell_quote;
use rqs_core::{Probe, Runner};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RqsError};
use crate::store::validate_key;

/// What an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A shell command, replayed on lookup
    Command,
    /// Opaque text, printed on lookup
    Text,
}

impl EntryType {
    /// Classify content tokens: a command if the first token is runnable
    pub fn classify<S: AsRef<str>>(tokens: &[S], probe: &dyn Probe) -> Self {
        match tokens.first() {
            Some(program) if probe.is_executable(program.as_ref()) => EntryType::Command,
            _ => EntryType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Command => "command",
            EntryType::Text => "text",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EntryType::Command => "🔮",
            EntryType::Text => "🔑",
        }
    }

    fn connector(&self) -> &'static str {
        match self {
            EntryType::Command => "->",
            EntryType::Text => "=",
        }
    }

    fn color(&self) -> Color {
        match self {
            EntryType::Command => Color::Green,
            EntryType::Text => Color::Yellow,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub alias: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// The original tokens joined by single spaces
    pub content: String,
}

impl Entry {
    /// Build an entry from an alias and its content tokens
    pub fn new<S: AsRef<str>>(alias: &str, tokens: &[S], probe: &dyn Probe) -> Result<Self> {
        validate_key(alias)?;
        if tokens.is_empty() {
            return Err(RqsError::EmptyContent);
        }

        let kind = EntryType::classify(tokens, probe);
        let content = tokens
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!(alias, kind = kind.as_str(), "classified entry");

        Ok(Self {
            alias: alias.to_string(),
            kind,
            content,
        })
    }

    /// The shell command line to run, with `extra_args` quoted and appended
    pub fn command_line(&self, extra_args: &[String]) -> String {
        let mut line = self.content.clone();
        for arg in extra_args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }

    /// Run a command entry and return its exit code
    pub fn execute(&self, extra_args: &[String], runner: &dyn Runner) -> Result<i32> {
        if self.kind != EntryType::Command {
            return Err(RqsError::InvalidOperation(
                "text entries are not executable".to_string(),
            ));
        }

        tracing::debug!(alias = %self.alias, extra = extra_args.len(), "executing entry");
        Ok(runner.run(&self.command_line(extra_args))?)
    }

    /// Serialize to the stored record format
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|source| RqsError::Codec {
            key: self.alias.clone(),
            source,
        })
    }

    /// Deserialize a stored record read from `key`
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self> {
        let entry: Entry = serde_json::from_slice(bytes).map_err(|source| RqsError::Codec {
            key: key.to_string(),
            source,
        })?;

        if entry.alias != key {
            tracing::warn!(key, alias = %entry.alias, "stored alias differs from its key");
        }

        Ok(entry)
    }
}

impl fmt::Display for Entry {
    /// `alias -> content` for commands, `alias = content` for text
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.kind.color();
        write!(
            f,
            "{} {} {}",
            self.alias.color(color).bold(),
            self.kind.connector().color(color),
            self.content
        )
    }
}
