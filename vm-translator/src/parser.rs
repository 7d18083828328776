use std::io::BufRead;

use crate::errors::VmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

pub struct Parser {
    lines: Vec<String>,
    current_line: usize,
    current_command: String,
    /// Cached parts of the current command to avoid repeated parsing
    cached_parts: Vec<String>,
}

impl Parser {
    /// Builds a parser over already-stripped source lines (comments and
    /// blank lines removed, matching [`strip_source`]).
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Parser {
            lines,
            current_line: 0,
            current_command: String::new(),
            cached_parts: Vec::new(),
        }
    }

    pub fn from_reader(reader: impl BufRead) -> std::io::Result<Self> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = strip_comment(&line);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        Ok(Parser::from_lines(lines))
    }

    #[inline]
    #[must_use]
    pub fn has_more_commands(&self) -> bool {
        self.current_line < self.lines.len()
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.has_more_commands() {
            // Use swap to avoid allocation
            std::mem::swap(
                &mut self.current_command,
                &mut self.lines[self.current_line],
            );

            // Parse and cache command parts once
            self.cached_parts.clear();
            self.cached_parts.extend(
                self.current_command
                    .split_whitespace()
                    .map(|s| s.to_string()),
            );

            self.current_line += 1;
        }
    }

    #[inline]
    #[must_use]
    pub fn command_type(&self) -> CommandType {
        debug_assert!(!self.cached_parts.is_empty(), "empty command");

        match self.cached_parts[0].as_str() {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::If,
            "function" => CommandType::Function,
            "return" => CommandType::Return,
            "call" => CommandType::Call,
            _ => CommandType::Arithmetic,
        }
    }

    #[inline]
    pub fn arg1(&self) -> Result<&str, VmError> {
        match self.command_type() {
            CommandType::Arithmetic => Ok(&self.cached_parts[0]),
            CommandType::Return => {
                unreachable!("arg1 is never called for CommandType::Return")
            }
            other => self.require_part(1, other),
        }
    }

    #[inline]
    pub fn arg2(&self) -> Result<i32, VmError> {
        let cmd_type = self.command_type();
        let raw = self.require_part(2, cmd_type)?;
        raw.parse()
            .map_err(|_| VmError::UnparsableArg(raw.to_string()))
    }

    fn require_part(&self, index: usize, cmd_type: CommandType) -> Result<&str, VmError> {
        self.cached_parts
            .get(index)
            .map(String::as_str)
            .ok_or(VmError::WrongArgCount {
                command: format!("{cmd_type:?}"),
                expected: index + 1,
                found: self.cached_parts.len(),
            })
    }
}

/// Strips a trailing `//` line comment, matching the VM language's comment
/// syntax.
fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}
