#![forbid(unsafe_code)]

//! `mindflow` is a headless mind-map editor core.
//!
//! - [`mindflow_core`]: the document tree, immutable mutations, projects and config
//! - [`mindflow_layout`]: node sizing and the depth-column tidy-tree layout
//! - this crate: the [`EditSession`] that ties them to selection, text drafts, keyboard
//!   commands, persistence and AI expansion
//!
//! ```
//! use mindflow::{EditSession, Key, KeyPress, MemoryPersistence, Node, SequentialIds};
//!
//! let store = MemoryPersistence::new();
//! let mut session = EditSession::new(Node::initial())
//!     .with_persistence(store.clone())
//!     .with_ids(SequentialIds::default());
//! session.select("root");
//! assert!(session.handle_key(KeyPress::new(Key::Tab)));
//! assert_eq!(session.layout().nodes.len(), 2);
//! assert_eq!(store.save_count(), 1);
//! ```

pub use mindflow_core::*;

pub mod layout {
    pub use mindflow_layout::*;
}

pub mod collab;
pub mod command;
pub mod session;
pub mod suggest;

pub use collab::{MemoryPersistence, NullPersistence, Persistence, ProjectPersistence};
pub use command::{Command, Dispatch, Key, KeyPress, WhileEditing, resolve};
pub use mindflow_layout::{LayoutOptions, MindmapLayout, layout_mindmap};
pub use session::{EditSession, TextDraft};
pub use suggest::{
    Expansion, ExpansionRequest, OfflineSuggester, SuggestError, Suggester, Suggestion,
    fetch_suggestions, parse_suggestion_payload,
};
