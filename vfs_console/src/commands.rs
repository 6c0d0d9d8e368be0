//! # Console Commands
//!
//! One command per input line. Arguments are separated by whitespace; an
//! argument containing spaces is wrapped in double quotes.
//!
//! ## Command Set
//!
//! - `register <name>` - Create a user and select it
//! - `use <name>` - Select an existing user
//! - `delete-user <name>` - Delete a user and all its data
//! - `cd <path>` - Change the current folder
//! - `ls [path] [--sort-name|--sort-created] [asc|desc]` - List a folder
//! - `create-folder <name>` / `delete-folder <name>` / `rename-folder <old> <new>`
//! - `create-file <name> <description>` / `delete-file <name>`
//! - `rename-file <old> <new> <description>` / `update-file <name> <description>`
//! - `stat <name>` - Show a file's stored header
//! - `pwd`, `help`, `exit`
//!
//! Argument counts are checked strictly: a command with too few or too many
//! arguments is rejected with its usage line.

use namespace_view::{ListOptions, SortField, SortOrder, CURRENT_DIR};
use thiserror::Error;

/// Usage line and summary of every command, in `help` order
pub const COMMAND_USAGE: &[(&str, &str)] = &[
    ("register <name>", "create a user and select it"),
    ("use <name>", "select an existing user"),
    ("delete-user <name>", "delete a user and all its data"),
    ("cd <path>", "change the current folder"),
    (
        "ls [path] [--sort-name|--sort-created] [asc|desc]",
        "list a folder",
    ),
    ("create-folder <name>", "create a folder"),
    ("delete-folder <name>", "delete a folder and everything in it"),
    ("rename-folder <old> <new>", "rename a folder"),
    ("create-file <name> <description>", "create an empty file"),
    ("delete-file <name>", "delete a file"),
    (
        "rename-file <old> <new> <description>",
        "rename a file and replace its description",
    ),
    ("update-file <name> <description>", "replace a file's description"),
    ("stat <name>", "show a file's stored header"),
    ("pwd", "print the current folder"),
    ("help", "show this help"),
    ("exit", "leave the console"),
];

/// Command parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(String),

    #[error("Unterminated quote in: {0}")]
    UnterminatedQuote(String),
}

/// Console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Register { name: String },
    Use { name: String },
    DeleteUser { name: String },
    Cd { path: String },
    Ls { path: String, options: ListOptions },
    CreateFolder { name: String },
    DeleteFolder { name: String },
    RenameFolder { old_name: String, new_name: String },
    CreateFile { name: String, description: String },
    DeleteFile { name: String },
    RenameFile {
        old_name: String,
        new_name: String,
        description: String,
    },
    UpdateFile { name: String, description: String },
    Stat { name: String },
    Pwd,
    Help,
    Exit,
}

/// Console command parser
pub struct CommandParser;

impl CommandParser {
    /// Parses one input line
    pub fn parse(input: &str) -> Result<ConsoleCommand, CommandError> {
        let parts = Self::tokenize(input)?;
        let Some((first, args)) = parts.split_first() else {
            return Err(CommandError::EmptyCommand);
        };
        let cmd = first.to_lowercase();

        match cmd.as_str() {
            "register" => {
                let [name] = Self::exact::<1>(args, "register")?;
                Ok(ConsoleCommand::Register { name })
            }
            "use" => {
                let [name] = Self::exact::<1>(args, "use")?;
                Ok(ConsoleCommand::Use { name })
            }
            "delete-user" => {
                let [name] = Self::exact::<1>(args, "delete-user")?;
                Ok(ConsoleCommand::DeleteUser { name })
            }
            "cd" => {
                let [path] = Self::exact::<1>(args, "cd")?;
                Ok(ConsoleCommand::Cd { path })
            }
            "ls" => Self::parse_ls(args),
            "create-folder" => {
                let [name] = Self::exact::<1>(args, "create-folder")?;
                Ok(ConsoleCommand::CreateFolder { name })
            }
            "delete-folder" => {
                let [name] = Self::exact::<1>(args, "delete-folder")?;
                Ok(ConsoleCommand::DeleteFolder { name })
            }
            "rename-folder" => {
                let [old_name, new_name] = Self::exact::<2>(args, "rename-folder")?;
                Ok(ConsoleCommand::RenameFolder { old_name, new_name })
            }
            "create-file" => {
                let [name, description] = Self::exact::<2>(args, "create-file")?;
                Ok(ConsoleCommand::CreateFile { name, description })
            }
            "delete-file" => {
                let [name] = Self::exact::<1>(args, "delete-file")?;
                Ok(ConsoleCommand::DeleteFile { name })
            }
            "rename-file" => {
                let [old_name, new_name, description] = Self::exact::<3>(args, "rename-file")?;
                Ok(ConsoleCommand::RenameFile {
                    old_name,
                    new_name,
                    description,
                })
            }
            "update-file" => {
                let [name, description] = Self::exact::<2>(args, "update-file")?;
                Ok(ConsoleCommand::UpdateFile { name, description })
            }
            "stat" => {
                let [name] = Self::exact::<1>(args, "stat")?;
                Ok(ConsoleCommand::Stat { name })
            }
            "pwd" => {
                Self::exact::<0>(args, "pwd")?;
                Ok(ConsoleCommand::Pwd)
            }
            "help" => {
                Self::exact::<0>(args, "help")?;
                Ok(ConsoleCommand::Help)
            }
            "exit" | "quit" => {
                Self::exact::<0>(args, "exit")?;
                Ok(ConsoleCommand::Exit)
            }
            _ => Err(CommandError::UnknownCommand(cmd)),
        }
    }

    /// Returns the usage line of a command
    pub fn usage(command: &str) -> &'static str {
        COMMAND_USAGE
            .iter()
            .map(|(usage, _)| *usage)
            .find(|usage| usage.split_whitespace().next() == Some(command))
            .unwrap_or("help")
    }

    /// Splits a line into arguments, honouring double quotes
    ///
    /// `""` yields an empty argument.
    pub fn tokenize(input: &str) -> Result<Vec<String>, CommandError> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_token = false;
        let mut in_quotes = false;

        for c in input.trim().chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    in_token = true;
                }
                c if c.is_whitespace() && !in_quotes => {
                    if in_token {
                        parts.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            }
        }

        if in_quotes {
            return Err(CommandError::UnterminatedQuote(input.trim().to_string()));
        }
        if in_token {
            parts.push(current);
        }
        Ok(parts)
    }

    /// Parses the "ls" command
    fn parse_ls(args: &[String]) -> Result<ConsoleCommand, CommandError> {
        let (path, rest) = match args.split_first() {
            Some((first, rest)) if !first.starts_with("--") => (first.clone(), rest),
            _ => (CURRENT_DIR.to_string(), args),
        };

        let options = match rest {
            [] => ListOptions::default(),
            [flag, order] => {
                let field = match flag.as_str() {
                    "--sort-name" => SortField::Name,
                    "--sort-created" => SortField::CreatedTime,
                    _ => return Err(Self::usage_error("ls")),
                };
                let order = match order.to_lowercase().as_str() {
                    "asc" => SortOrder::Asc,
                    "desc" => SortOrder::Desc,
                    _ => return Err(Self::usage_error("ls")),
                };
                ListOptions::sorted(field, order)
            }
            _ => return Err(Self::usage_error("ls")),
        };

        Ok(ConsoleCommand::Ls { path, options })
    }

    /// Takes exactly `N` arguments
    fn exact<const N: usize>(args: &[String], command: &str) -> Result<[String; N], CommandError> {
        <[String; N]>::try_from(args.to_vec()).map_err(|_| Self::usage_error(command))
    }

    fn usage_error(command: &str) -> CommandError {
        CommandError::Usage(Self::usage(command).to_string())
    }
}
