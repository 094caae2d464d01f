// src/exec/command.rs

//! Command-line parsing for the build and run commands.
//!
//! Known limitation: a command string is split on whitespace into a program
//! and its arguments. There is no shell interpretation, no quoting and no
//! escaping, so `echo "a b"` runs `echo` with the two arguments `"a` and
//! `b"`. Wrap anything fancier in a script.

use std::fmt;
use std::str::FromStr;

use tokio::process::Command;

use crate::errors::{DevloopError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| DevloopError::EmptyCommand(s.to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build a fresh `tokio::process::Command` for this command line.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl FromStr for CommandLine {
    type Err = DevloopError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
