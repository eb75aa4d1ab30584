#![forbid(unsafe_code)]

//! Line protocol parsing.

use std::fmt;

/// One harness command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print phase and fields.
    Show,
    /// Turn the edit lock on.
    Edit,
    /// Feed raw input to a field.
    Set { field: String, raw: String },
    /// Submit the draft.
    Save,
    /// Delete the record.
    Delete,
    /// Initialize again from the store.
    Reload,
    /// Print the record key table.
    Keys,
    /// Print the command list.
    Help,
    /// Exit.
    Quit,
}

/// A line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
commands:
  show                 print phase and fields
  edit                 enable editing
  set <field> <text>   type <text> into <field> (text may be empty)
  save                 validate and store
  delete               remove the stored record
  reload               read the record again
  keys                 print the record key table
  help                 this list
  quit                 exit";

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match trimmed.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };
        let command = match word {
            "show" => Self::Show,
            "edit" => Self::Edit,
            "save" => Self::Save,
            "delete" => Self::Delete,
            "reload" => Self::Reload,
            "keys" => Self::Keys,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "set" => {
                let rest = rest.trim_start();
                let (field, raw) = rest.split_once(' ').unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(ParseError("usage: set <field> <text>".into()));
                }
                Self::Set {
                    field: field.to_string(),
                    raw: raw.to_string(),
                }
            }
            other => return Err(ParseError(format!("unknown command {other:?}; try help"))),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_commands() {
        assert_eq!(Command::parse("show\n"), Ok(Some(Command::Show)));
        assert_eq!(Command::parse("  edit"), Ok(Some(Command::Edit)));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn set_keeps_the_raw_text() {
        assert_eq!(
            Command::parse("set nomeCartao Maria  da Silva"),
            Ok(Some(Command::Set {
                field: "nomeCartao".into(),
                raw: "Maria  da Silva".into(),
            }))
        );
        assert_eq!(
            Command::parse("set cvv"),
            Ok(Some(Command::Set {
                field: "cvv".into(),
                raw: String::new(),
            }))
        );
    }

    #[test]
    fn errors() {
        assert!(Command::parse("set").is_err());
        assert!(Command::parse("launch").unwrap_err().0.contains("launch"));
    }
}
