//! Command execution against a namespace service

use crate::commands::{CommandParser, ConsoleCommand, COMMAND_USAGE};
use block_store::EntryHeader;
use log::debug;
use services_namespace::{NamespaceError, NamespaceOperations, NamespaceService, Session};

/// Result of one console command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// Lines to print
    pub lines: Vec<String>,
    /// True if the console should stop
    pub exit: bool,
}

impl CommandOutcome {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, exit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }

    fn exit() -> Self {
        Self {
            lines: Vec::new(),
            exit: true,
        }
    }
}

/// Interactive console
///
/// Owns the service and the caller's session. A failed command prints an
/// error and leaves the session where it was.
pub struct Console<S: NamespaceOperations = NamespaceService> {
    service: S,
    session: Session,
}

impl<S: NamespaceOperations> Console<S> {
    /// Creates a console with no user selected
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: Session::NoUser,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Prompt showing the selected user and folder
    pub fn prompt(&self) -> String {
        match self.session.user() {
            None => "vfs> ".to_string(),
            Some(user) => match self.service.current_path(&self.session) {
                Ok(path) => format!("{}:{}> ", user, path),
                Err(_) => format!("{}:?> ", user),
            },
        }
    }

    /// Parses and executes one input line
    ///
    /// Blank lines produce no output.
    pub fn execute_line(&mut self, line: &str) -> CommandOutcome {
        if line.trim().is_empty() {
            return CommandOutcome::default();
        }

        match CommandParser::parse(line) {
            Ok(command) => self.execute(command),
            Err(err) => CommandOutcome::line(format!("Error: {}", err)),
        }
    }

    /// Executes a parsed command
    pub fn execute(&mut self, command: ConsoleCommand) -> CommandOutcome {
        debug!("executing {:?}", command);
        match self.run(command) {
            Ok(outcome) => outcome,
            Err(err) => CommandOutcome::line(format!("Error: {}", err)),
        }
    }

    fn run(&mut self, command: ConsoleCommand) -> Result<CommandOutcome, NamespaceError> {
        let outcome = match command {
            ConsoleCommand::Register { name } => {
                self.session = self.service.register(&name)?;
                CommandOutcome::line(format!("Registered user '{}'", name))
            }
            ConsoleCommand::Use { name } => {
                self.session = self.service.use_user(&name)?;
                CommandOutcome::line(format!("Using user '{}'", name))
            }
            ConsoleCommand::DeleteUser { name } => {
                self.session = self.service.delete_user(&self.session, &name)?;
                CommandOutcome::line(format!("Deleted user '{}'", name))
            }
            ConsoleCommand::Cd { path } => {
                self.session = self.service.change_folder(&self.session, &path)?;
                CommandOutcome::default()
            }
            ConsoleCommand::Ls { path, options } => {
                CommandOutcome::lines(self.service.list(&self.session, &path, options)?)
            }
            ConsoleCommand::CreateFolder { name } => {
                self.service.create_folder(&self.session, &name, "")?;
                CommandOutcome::line(format!("Created folder '{}'", name))
            }
            ConsoleCommand::DeleteFolder { name } => {
                self.service.delete_folder(&self.session, &name)?;
                CommandOutcome::line(format!("Deleted folder '{}'", name))
            }
            ConsoleCommand::RenameFolder { old_name, new_name } => {
                self.service
                    .rename_folder(&self.session, &old_name, &new_name)?;
                CommandOutcome::line(format!("Renamed folder '{}' to '{}'", old_name, new_name))
            }
            ConsoleCommand::CreateFile { name, description } => {
                self.service
                    .create_file(&self.session, &name, &description)?;
                CommandOutcome::line(format!("Created file '{}'", name))
            }
            ConsoleCommand::DeleteFile { name } => {
                self.service.delete_file(&self.session, &name)?;
                CommandOutcome::line(format!("Deleted file '{}'", name))
            }
            ConsoleCommand::RenameFile {
                old_name,
                new_name,
                description,
            } => {
                self.service
                    .rename_file(&self.session, &old_name, &new_name, &description)?;
                CommandOutcome::line(format!("Renamed file '{}' to '{}'", old_name, new_name))
            }
            ConsoleCommand::UpdateFile { name, description } => {
                self.service
                    .update_file(&self.session, &name, &description)?;
                CommandOutcome::line(format!("Updated file '{}'", name))
            }
            ConsoleCommand::Stat { name } => {
                let header = self.service.file_info(&self.session, &name)?;
                CommandOutcome::lines(describe(&header))
            }
            ConsoleCommand::Pwd => CommandOutcome::line(self.service.current_path(&self.session)?),
            ConsoleCommand::Help => CommandOutcome::lines(help_lines()),
            ConsoleCommand::Exit => CommandOutcome::exit(),
        };
        Ok(outcome)
    }
}

fn describe(header: &EntryHeader) -> Vec<String> {
    let mut lines = vec![
        format!("name: {}", header.name),
        format!("description: {}", header.description),
    ];
    if let Some(content_id) = header.content_id() {
        lines.push(format!("content: {}", content_id));
    }
    lines.push(format!("created: {}", header.created_time.to_rfc3339()));
    lines.push(format!("modified: {}", header.modified_time.to_rfc3339()));
    lines
}

fn help_lines() -> Vec<String> {
    let width = COMMAND_USAGE
        .iter()
        .map(|(usage, _)| usage.len())
        .max()
        .unwrap_or(0);
    COMMAND_USAGE
        .iter()
        .map(|(usage, summary)| format!("  {:width$}  {}", usage, summary, width = width))
        .collect()
}
