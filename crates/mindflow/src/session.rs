use mindflow_core::mutate;
use mindflow_core::{IdGenerator, MindflowConfig, Node, ROOT_ID, StylePatch, UuidIds};
use mindflow_layout::{ExportFrame, LayoutOptions, MindmapLayout, layout_mindmap};
use tracing::{debug, trace};

use crate::collab::{NullPersistence, Persistence};
use crate::command::{Command, KeyPress, resolve};
use crate::suggest::{Expansion, ExpansionRequest};

/// Text being typed into a node, not yet part of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDraft {
    pub node_id: String,
    pub text: String,
}

/// One open document: the tree, what is selected and edited, and the last computed layout.
///
/// Every change to the tree goes through a mutator from [`mindflow_core::mutate`]. When the
/// result differs from the current tree it replaces it, the cached layout is dropped and the
/// tree is handed to the [`Persistence`] sink. No-ops touch none of that.
pub struct EditSession {
    tree: Node,
    selected: Option<String>,
    draft: Option<TextDraft>,
    layout: Option<MindmapLayout>,
    options: LayoutOptions,
    persistence: Box<dyn Persistence>,
    ids: Box<dyn IdGenerator>,
    expansion_in_flight: bool,
}

impl EditSession {
    pub fn new(tree: Node) -> Self {
        Self {
            tree,
            selected: None,
            draft: None,
            layout: None,
            options: LayoutOptions::default(),
            persistence: Box::new(NullPersistence),
            ids: Box::new(UuidIds),
            expansion_in_flight: false,
        }
    }

    pub fn from_config(tree: Node, config: &MindflowConfig) -> Self {
        Self::new(tree).with_layout_options(LayoutOptions::from_config(config))
    }

    pub fn with_persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Box::new(persistence);
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self.layout = None;
        self
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn into_tree(self) -> Node {
        self.tree
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.tree.find(self.selected.as_deref()?)
    }

    /// Moves the selection. A draft open on another node is committed, the way a text field
    /// commits when it loses focus.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.draft.as_ref().is_some_and(|d| d.node_id != id) {
            self.commit_text();
        }
        trace!(id = %id, "select");
        self.selected = Some(id);
    }

    /// Clears the selection, committing any open draft.
    pub fn clear_selection(&mut self) {
        self.commit_text();
        self.selected = None;
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&TextDraft> {
        self.draft.as_ref()
    }

    pub fn is_expanding(&self) -> bool {
        self.expansion_in_flight
    }

    fn apply(&mut self, op: &'static str, next: Node) -> bool {
        if next == self.tree {
            trace!(op, "tree unchanged");
            return false;
        }
        self.tree = next;
        self.layout = None;
        self.persistence.save(&self.tree);
        debug!(op, nodes = self.tree.node_count(), "tree updated");
        true
    }

    pub fn update_text(&mut self, id: &str, text: &str) -> bool {
        let next = mutate::update_text(&self.tree, id, text);
        self.apply("update_text", next)
    }

    pub fn toggle_expand(&mut self, id: &str) -> bool {
        let next = mutate::toggle_expand(&self.tree, id);
        self.apply("toggle_expand", next)
    }

    /// Restyles the selected node, or every node when `apply_to_all`.
    pub fn restyle(&mut self, patch: &StylePatch, apply_to_all: bool) -> bool {
        let next = mutate::restyle(&self.tree, self.selected.as_deref(), patch, apply_to_all);
        self.apply("restyle", next)
    }

    pub fn add_child(&mut self) -> bool {
        self.execute(Command::AddChild)
    }

    pub fn add_sibling(&mut self) -> bool {
        self.execute(Command::AddSibling)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.execute(Command::DeleteSelected)
    }

    /// Runs a structural command against the selection. Returns whether the tree changed.
    pub fn execute(&mut self, command: Command) -> bool {
        let Some(selected) = self.selected.clone() else {
            trace!(%command, "no selection; ignored");
            return false;
        };
        if selected == ROOT_ID && command.forbidden_on_root() {
            trace!(%command, "not allowed on the root; ignored");
            return false;
        }
        debug!(%command, selected = %selected, "execute");

        let next = match command {
            Command::AddChild => mutate::add_child(&self.tree, &selected, &mut self.ids),
            Command::AddSibling => mutate::add_sibling(&self.tree, &selected, &mut self.ids),
            Command::DeleteSelected => {
                self.selected = None;
                mutate::delete_node(&self.tree, &selected)
            }
            Command::ToggleExpand => mutate::toggle_expand(&self.tree, &selected),
        };
        self.apply(command.as_str(), next)
    }

    /// Dispatches a key press through the binding table. Returns whether the tree changed.
    pub fn handle_key(&mut self, press: KeyPress) -> bool {
        if self.selected.is_none() {
            return false;
        }
        let Some(dispatch) = resolve(press, self.is_editing()) else {
            return false;
        };
        let committed = dispatch.commit_draft && self.commit_text();
        self.execute(dispatch.command) || committed
    }

    /// Opens a draft holding the node's current text. An open draft on another node is
    /// committed first.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        if self.draft.as_ref().is_some_and(|d| d.node_id == id) {
            return true;
        }
        self.commit_text();
        let Some(node) = self.tree.find(id) else {
            trace!(id, "begin_edit: node not found");
            return false;
        };
        self.draft = Some(TextDraft {
            node_id: id.to_string(),
            text: node.text.clone(),
        });
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.text = text.into();
        }
    }

    /// Writes the open draft into the tree and closes it.
    pub fn commit_text(&mut self) -> bool {
        let Some(draft) = self.draft.take() else {
            return false;
        };
        self.update_text(&draft.node_id, &draft.text)
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    /// Snapshots the selection for an AI expansion. `None` without a selection or while another
    /// expansion is pending.
    pub fn begin_expansion(&mut self) -> Option<ExpansionRequest> {
        if self.expansion_in_flight {
            debug!("expansion already in flight; ignored");
            return None;
        }
        let node = self.selected_node()?;
        let request = ExpansionRequest {
            target_id: node.id.clone(),
            topic: node.text.clone(),
        };
        self.expansion_in_flight = true;
        debug!(target_id = %request.target_id, "expansion started");
        Some(request)
    }

    /// Grafts the suggestions under their target, unless the target was deleted meanwhile.
    pub fn apply_expansion(&mut self, expansion: Expansion) -> bool {
        self.expansion_in_flight = false;
        if !self.tree.contains(&expansion.target_id) {
            debug!(target_id = %expansion.target_id, "expansion target is gone; dropped");
            return false;
        }
        let texts = expansion.texts();
        let next = mutate::graft_suggestions(
            &self.tree,
            &expansion.target_id,
            &texts[..],
            &mut self.ids,
        );
        self.apply("apply_expansion", next)
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.options
    }

    /// The layout of the current tree, recomputed only after a change.
    pub fn layout(&mut self) -> &MindmapLayout {
        self.layout
            .get_or_insert_with(|| layout_mindmap(&self.tree, &self.options))
    }

    pub fn export_frame(&mut self) -> Option<ExportFrame> {
        let padding = self.options.config.export_padding;
        self.layout().export_frame(padding)
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("selected", &self.selected)
            .field("draft", &self.draft)
            .field("nodes", &self.tree.node_count())
            .field("layout_cached", &self.layout.is_some())
            .field("expansion_in_flight", &self.expansion_in_flight)
            .finish_non_exhaustive()
    }
}
