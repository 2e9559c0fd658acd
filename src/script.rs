//! Trace files: scripted sequences of list operations.
//!
//! One command per line, fields separated by commas:
//!
//! ```text
//! # comments and blank lines are skipped
//! initialize,2
//! insert,5,five,0
//! insert,9,nine,1
//! search,9
//! delete,5
//! dump
//! pretty
//! ```
//!
//! Keys are `i64` and values are strings. `search`, `dump` and `pretty`
//! produce output; the rest only change the list.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;
use crate::render;
use crate::skip_list::SkipList;

/// A single parsed trace-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Initialize { max_level: usize },
    Insert { key: i64, value: String, toplevel: usize },
    Delete { key: i64 },
    Search { key: i64 },
    Dump,
    Pretty,
}

impl Command {
    /// Parse one line. Blank lines and `#` comments give `None`.
    pub fn parse(line: &str, line_no: usize) -> Result<Option<Command>, Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let bad = |message: String| Error::Parse {
            line: line_no,
            message,
        };
        let arity = |expected: usize| {
            if fields.len() != expected {
                return Err(bad(format!(
                    "{} takes {} field(s), got {}",
                    fields[0],
                    expected - 1,
                    fields.len() - 1
                )));
            }
            return Ok(());
        };
        let int = |field: &str, what: &str| -> Result<i64, Error> {
            return field
                .parse()
                .map_err(|_| bad(format!("invalid {}: {:?}", what, field)));
        };
        let level = |field: &str, what: &str| -> Result<usize, Error> {
            return field
                .parse()
                .map_err(|_| bad(format!("invalid {}: {:?}", what, field)));
        };

        let command = match fields[0] {
            "initialize" => {
                arity(2)?;
                Command::Initialize {
                    max_level: level(fields[1], "max level")?,
                }
            }
            "insert" => {
                arity(4)?;
                Command::Insert {
                    key: int(fields[1], "key")?,
                    value: fields[2].to_string(),
                    toplevel: level(fields[3], "toplevel")?,
                }
            }
            "delete" => {
                arity(2)?;
                Command::Delete {
                    key: int(fields[1], "key")?,
                }
            }
            "search" => {
                arity(2)?;
                Command::Search {
                    key: int(fields[1], "key")?,
                }
            }
            "dump" => {
                arity(1)?;
                Command::Dump
            }
            "pretty" => {
                arity(1)?;
                Command::Pretty
            }
            other => return Err(bad(format!("unknown command {:?}", other))),
        };
        return Ok(Some(command));
    }
}

/// A list plus the options new lists are created with.
pub struct Session {
    config: Config,
    list: SkipList<i64, String>,
}

impl Session {
    pub fn new(config: Config) -> Session {
        return Session {
            config,
            list: SkipList::with_config(config),
        };
    }

    pub fn list(&self) -> &SkipList<i64, String> {
        return &self.list;
    }

    /// Apply one command, returning its output if it has any.
    pub fn run(&mut self, command: &Command) -> Result<Option<String>, Error> {
        tracing::trace!(?command, "running");
        return match command {
            Command::Initialize { max_level } => {
                self.list = SkipList::with_config(Config {
                    max_level: *max_level,
                    ..self.config
                });
                Ok(None)
            }
            Command::Insert {
                key,
                value,
                toplevel,
            } => {
                self.list.try_insert(*key, value.clone(), *toplevel)?;
                Ok(None)
            }
            Command::Delete { key } => {
                self.list.try_delete(key)?;
                Ok(None)
            }
            Command::Search { key } => Ok(Some(self.list.search(key).to_json()?)),
            Command::Dump => Ok(Some(render::dump(&self.list)?)),
            Command::Pretty => Ok(Some(render::pretty(&self.list))),
        };
    }
}

/// Run a whole trace file, collecting the output of each command that has
/// one. Stops at the first error, tagged with its line number.
pub fn run_script(text: &str, config: Config) -> Result<Vec<String>, Error> {
    let mut session = Session::new(config);
    let mut outputs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let Some(command) = Command::parse(line, line_no)? else {
            continue;
        };
        match session.run(&command) {
            Ok(Some(output)) => outputs.push(output),
            Ok(None) => {}
            Err(err) => {
                return Err(Error::Script {
                    line: line_no,
                    source: Box::new(err),
                });
            }
        }
    }
    tracing::debug!(
        commands = text.lines().count(),
        outputs = outputs.len(),
        len = session.list().len(),
        "script finished"
    );
    return Ok(outputs);
}

/// Read and run a trace file from disk.
pub fn run_file(path: &Path, config: Config) -> Result<Vec<String>, Error> {
    let text = std::fs::read_to_string(path)?;
    return run_script(&text, config);
}
