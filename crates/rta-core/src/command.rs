use std::borrow::Cow;
use std::collections::HashMap;

use tracing::debug;

use crate::area::RichTextArea;
use crate::dom_utils::DomUtils;
use crate::executable::{CommandError, CreateLinkExecutable, Executable, InsertHtmlExecutable};

/// Name a toolbar or shortcut uses to refer to an executable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command(Cow<'static, str>);

impl Command {
    pub const INSERT_HTML: Command = Command(Cow::Borrowed("inserthtml"));
    pub const CREATE_LINK: Command = Command(Cow::Borrowed("createlink"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Dispatches commands to the executables registered for them.
#[derive(Default)]
pub struct CommandManager {
    executables: HashMap<Command, Box<dyn Executable>>,
}

impl CommandManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager with the insertion commands registered, sharing `dom`.
    pub fn with_defaults(dom: DomUtils) -> Result<Self, CommandError> {
        let mut manager = Self::new();
        manager.register(Command::INSERT_HTML, Box::new(InsertHtmlExecutable::new()))?;
        manager.register(
            Command::CREATE_LINK,
            Box::new(CreateLinkExecutable::new(InsertHtmlExecutable::new(), dom)),
        )?;
        Ok(manager)
    }

    pub fn register(
        &mut self,
        command: Command,
        executable: Box<dyn Executable>,
    ) -> Result<(), CommandError> {
        if self.executables.contains_key(&command) {
            return Err(CommandError::new(format!(
                "Duplicate command: {}",
                command.name()
            )));
        }
        self.executables.insert(command, executable);
        Ok(())
    }

    pub fn is_supported(&self, command: &Command) -> bool {
        self.executables.contains_key(command)
    }

    /// Unknown commands are reported as disabled.
    pub fn is_enabled(&self, area: &RichTextArea, command: &Command) -> bool {
        self.executables
            .get(command)
            .is_some_and(|executable| executable.is_enabled(area))
    }

    pub fn is_executed(&self, area: &RichTextArea, command: &Command) -> bool {
        self.executables
            .get(command)
            .is_some_and(|executable| executable.is_executed(area))
    }

    pub fn parameter(&self, area: &RichTextArea, command: &Command) -> Option<String> {
        self.executables.get(command)?.parameter(area)
    }

    pub fn execute(
        &self,
        area: &mut RichTextArea,
        command: &Command,
        param: Option<&str>,
    ) -> Result<(), CommandError> {
        let Some(executable) = self.executables.get(command) else {
            return Err(CommandError::new(format!(
                "Unknown command: {}",
                command.name()
            )));
        };
        debug!(command = command.name(), has_param = param.is_some(), "executing command");
        executable.execute(area, param)
    }
}
