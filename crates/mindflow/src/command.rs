//! Keyboard bindings for structural commands.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Enter,
    Backspace,
    Delete,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Structural edits that act on the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    AddChild,
    AddSibling,
    DeleteSelected,
    ToggleExpand,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::AddChild => "add_child",
            Command::AddSibling => "add_sibling",
            Command::DeleteSelected => "delete_selected",
            Command::ToggleExpand => "toggle_expand",
        }
    }

    /// Commands that would detach or duplicate the root.
    pub fn forbidden_on_root(self) -> bool {
        matches!(self, Command::AddSibling | Command::DeleteSelected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a binding does while a text draft is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhileEditing {
    /// Commit the draft, then run the command.
    CommitFirst,
    /// Leave the key to the text field.
    Ignore,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    key: Key,
    /// `None` matches either state.
    shift: Option<bool>,
    editing: WhileEditing,
    command: Command,
}

const BINDINGS: &[Binding] = &[
    Binding {
        key: Key::Tab,
        shift: None,
        editing: WhileEditing::CommitFirst,
        command: Command::AddChild,
    },
    // Shift+Enter is a newline inside the text and has no binding.
    Binding {
        key: Key::Enter,
        shift: Some(false),
        editing: WhileEditing::CommitFirst,
        command: Command::AddSibling,
    },
    Binding {
        key: Key::Backspace,
        shift: None,
        editing: WhileEditing::Ignore,
        command: Command::DeleteSelected,
    },
    Binding {
        key: Key::Delete,
        shift: None,
        editing: WhileEditing::Ignore,
        command: Command::DeleteSelected,
    },
];

/// A resolved key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub command: Command,
    pub commit_draft: bool,
}

pub fn resolve(press: KeyPress, editing: bool) -> Option<Dispatch> {
    let binding = BINDINGS
        .iter()
        .find(|b| b.key == press.key && b.shift.is_none_or(|s| s == press.shift))?;
    match (editing, binding.editing) {
        (true, WhileEditing::Ignore) => None,
        (true, WhileEditing::CommitFirst) => Some(Dispatch {
            command: binding.command,
            commit_draft: true,
        }),
        (false, _) => Some(Dispatch {
            command: binding.command,
            commit_draft: false,
        }),
    }
}
