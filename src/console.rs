//! Line-oriented console over a [`SessionManager`].
//!
//! Each input line is one command. Values given to `set` are parsed as JSON;
//! anything that is not valid JSON is stored as a plain string.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::SessionError;
use crate::session::{OsRandom, RandomSource, SessionId, SessionManager};

const HELP: &str = "\
commands:
    new                      create a session and print its id
    set <id> <key> <value>   bind a JSON value (bare words are strings)
    get <id> <key>           print the value bound to key
    del <id> <key>           remove key (no error if absent)
    keys <id>                list keys in a session
    show <id>                print the whole session as JSON
    drop <id>                remove a session
    list                     list session ids
    help                     show this message
    quit                     exit";

/// Console errors.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Command is missing arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// First word is not a known command.
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// Session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Value could not be rendered.
    #[error("could not render value: {0}")]
    Render(#[from] serde_json::Error),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    Set {
        id: SessionId,
        key: String,
        value: Value,
    },
    Get {
        id: SessionId,
        key: String,
    },
    Delete {
        id: SessionId,
        key: String,
    },
    Keys(SessionId),
    Show(SessionId),
    Drop(SessionId),
    List,
    Help,
    Quit,
}

/// Split off the first whitespace-delimited word.
fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((s, "")),
    }
}

/// Split off a session id argument.
fn id_arg<'a>(rest: &'a str, usage: &'static str) -> Result<(SessionId, &'a str), ConsoleError> {
    let (id, rest) = next_word(rest).ok_or(ConsoleError::Usage(usage))?;
    Ok((id.parse()?, rest))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, rest) = next_word(line).ok_or(ConsoleError::Usage("help"))?;

        let cmd = match name {
            "new" => Command::New,
            "list" => Command::List,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "keys" => Command::Keys(id_arg(rest, "keys <id>")?.0),
            "show" => Command::Show(id_arg(rest, "show <id>")?.0),
            "drop" => Command::Drop(id_arg(rest, "drop <id>")?.0),
            "get" | "del" => {
                let usage = if name == "get" {
                    "get <id> <key>"
                } else {
                    "del <id> <key>"
                };
                let (id, rest) = id_arg(rest, usage)?;
                let (key, _) = next_word(rest).ok_or(ConsoleError::Usage(usage))?;
                let key = key.to_string();
                if name == "get" {
                    Command::Get { id, key }
                } else {
                    Command::Delete { id, key }
                }
            }
            "set" => {
                const USAGE: &str = "set <id> <key> <value>";
                let (id, rest) = id_arg(rest, USAGE)?;
                let (key, raw) = next_word(rest).ok_or(ConsoleError::Usage(USAGE))?;
                let raw = raw.trim_end();
                if raw.is_empty() {
                    return Err(ConsoleError::Usage(USAGE));
                }
                Command::Set {
                    id,
                    key: key.to_string(),
                    value: parse_value(raw),
                }
            }
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };

        Ok(cmd)
    }
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Text to print.
    Text(String),
    /// Stop reading input.
    Quit,
}

/// Console driving a single session manager.
pub struct Console<R: RandomSource = OsRandom> {
    manager: SessionManager<R>,
}

impl<R: RandomSource> Console<R> {
    /// Create a console over `manager`.
    pub fn new(manager: SessionManager<R>) -> Self {
        Self { manager }
    }

    /// The underlying manager.
    pub fn manager(&self) -> &SessionManager<R> {
        &self.manager
    }

    /// Execute one command.
    pub fn execute(&self, cmd: Command) -> Result<Reply, ConsoleError> {
        let text = match cmd {
            Command::New => self.manager.new_session()?.session_id().to_string(),
            Command::Set { id, key, value } => {
                self.manager.session(id.as_str())?.set(key, value)?;
                "ok".to_string()
            }
            Command::Get { id, key } => {
                let value = self.manager.session(id.as_str())?.get(&key)?;
                serde_json::to_string(&value)?
            }
            Command::Delete { id, key } => {
                self.manager.session(id.as_str())?.delete(&key)?;
                "ok".to_string()
            }
            Command::Keys(id) => {
                let keys = self.manager.session(id.as_str())?.keys()?;
                if keys.is_empty() {
                    "(empty)".to_string()
                } else {
                    keys.join("\n")
                }
            }
            Command::Show(id) => {
                let snapshot = self.manager.session(id.as_str())?.snapshot()?;
                serde_json::to_string_pretty(&snapshot)?
            }
            Command::Drop(id) => {
                let removed = self.manager.remove_session(id.as_str())?;
                format!("removed {}", removed.session_id().short())
            }
            Command::List => {
                let mut ids = self.manager.list_ids()?;
                if ids.is_empty() {
                    "(no sessions)".to_string()
                } else {
                    ids.sort();
                    ids.iter()
                        .map(SessionId::as_str)
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Text(text))
    }

    /// Parse and execute one input line.
    ///
    /// Blank lines and `#` comments produce no reply.
    pub fn execute_line(&self, line: &str) -> Result<Option<Reply>, ConsoleError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let cmd: Command = line.parse()?;
        self.execute(cmd).map(Some)
    }

    /// Read commands from `input` until EOF or `quit`, writing replies to
    /// `output`. Command errors are reported inline and do not stop the loop.
    pub fn run<I: BufRead, O: Write>(&self, input: I, mut output: O) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            match self.execute_line(&line) {
                Ok(Some(Reply::Text(text))) => writeln!(output, "{}", text)?,
                Ok(Some(Reply::Quit)) => break,
                Ok(None) => {}
                Err(e) => {
                    debug!("command failed: {}", e);
                    writeln!(output, "error: {}", e)?;
                }
            }
            output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn console() -> Console {
        Console::new(SessionManager::new())
    }

    fn text(reply: Option<Reply>) -> String {
        match reply {
            Some(Reply::Text(t)) => t,
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    #[test]
    fn test_next_word() {
        assert_eq!(next_word("  set a b"), Some(("set", "a b")));
        assert_eq!(next_word("list"), Some(("list", "")));
        assert_eq!(next_word("   "), None);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_value("{\"a\": [1, 2]}"), json!({"a": [1, 2]}));
        assert_eq!(parse_value("alice"), json!("alice"));
        assert_eq!(parse_value("two words"), json!("two words"));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("new".parse::<Command>().unwrap(), Command::New);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!(
            "set ab user {\"name\": \"alice\"}".parse::<Command>().unwrap(),
            Command::Set {
                id: "ab".parse().unwrap(),
                key: "user".into(),
                value: json!({"name": "alice"}),
            }
        );
        assert_eq!(
            "del ab user".parse::<Command>().unwrap(),
            Command::Delete {
                id: "ab".parse().unwrap(),
                key: "user".into(),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "fly".parse::<Command>(),
            Err(ConsoleError::UnknownCommand(ref c)) if c == "fly"
        ));
        assert!(matches!(
            "get ab".parse::<Command>(),
            Err(ConsoleError::Usage("get <id> <key>"))
        ));
        assert!(matches!(
            "set ab key".parse::<Command>(),
            Err(ConsoleError::Usage(_))
        ));
        assert!(matches!(
            "show not-hex".parse::<Command>(),
            Err(ConsoleError::Session(SessionError::InvalidSessionId(_)))
        ));
    }

    #[test]
    fn test_session_flow() {
        let console = console();
        let id = text(console.execute_line("new").unwrap());
        assert_eq!(id.len(), 128);

        let set = format!("set {id} user alice");
        assert_eq!(text(console.execute_line(&set).unwrap()), "ok");

        let get = format!("get {id} user");
        assert_eq!(text(console.execute_line(&get).unwrap()), "\"alice\"");

        let keys = format!("keys {id}");
        assert_eq!(text(console.execute_line(&keys).unwrap()), "user");

        let del = format!("del {id} user");
        assert_eq!(text(console.execute_line(&del).unwrap()), "ok");
        assert!(matches!(
            console.execute_line(&get),
            Err(ConsoleError::Session(SessionError::KeyNotFound { .. }))
        ));
        assert_eq!(text(console.execute_line(&keys).unwrap()), "(empty)");

        let drop = format!("drop {id}");
        assert!(text(console.execute_line(&drop).unwrap()).starts_with("removed "));
        assert_eq!(console.manager().count(), 0);
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let console = console();
        assert!(console.execute_line("").unwrap().is_none());
        assert!(console.execute_line("   # note").unwrap().is_none());
    }

    #[test]
    fn test_run_reports_errors_and_stops_on_quit() {
        let console = console();
        let input = "list\nget 00ff k\nbogus\nquit\nnew\n";
        let mut out = Vec::new();

        console.run(input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "(no sessions)");
        assert!(lines[1].starts_with("error: session not found"));
        assert!(lines[2].starts_with("error: unknown command"));
        assert_eq!(lines.len(), 3);

        // `new` after `quit` never ran
        assert_eq!(console.manager().count(), 0);
    }
}
