#![forbid(unsafe_code)]

//! Mind-map document model + tree mutations (headless).
//!
//! Design goals:
//! - the [`Node`] tree is the single source of truth; everything else is derived from it
//! - mutations never edit a tree in place: they return a new root and leave the input untouched
//! - stale or forbidden targets are no-ops, never errors

pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod mutate;
pub mod project;

pub use config::MindflowConfig;
pub use error::{Error, Result};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use model::{
    FONT_SIZE_MAX, FONT_SIZE_MIN, NEW_NODE_FONT_SIZE, Node, NodeStyle, ROOT_ID, Shape, StylePatch,
};
pub use project::{Project, ProjectLibrary, UNTITLED_PROJECT_NAME};
