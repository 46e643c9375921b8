//! Where the session sends the tree after every applied mutation.

use std::cell::RefCell;
use std::rc::Rc;

use mindflow_core::{Node, ProjectLibrary};
use tracing::debug;

/// Fire-and-forget sink for the current tree. Called once per mutation that changed the tree.
pub trait Persistence {
    fn save(&self, tree: &Node);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullPersistence;

impl Persistence for NullPersistence {
    fn save(&self, _tree: &Node) {}
}

/// Keeps every saved snapshot. Cloning shares the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    snapshots: Rc<RefCell<Vec<Node>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.snapshots.borrow().len()
    }

    pub fn last(&self) -> Option<Node> {
        self.snapshots.borrow().last().cloned()
    }

    pub fn snapshots(&self) -> Vec<Node> {
        self.snapshots.borrow().clone()
    }
}

impl Persistence for MemoryPersistence {
    fn save(&self, tree: &Node) {
        self.snapshots.borrow_mut().push(tree.clone());
    }
}

/// Writes the tree into one entry of a shared [`ProjectLibrary`], bumping its timestamp.
#[derive(Debug, Clone)]
pub struct ProjectPersistence {
    library: Rc<RefCell<ProjectLibrary>>,
    project_id: String,
}

impl ProjectPersistence {
    pub fn new(library: Rc<RefCell<ProjectLibrary>>, project_id: impl Into<String>) -> Self {
        Self {
            library,
            project_id: project_id.into(),
        }
    }
}

impl Persistence for ProjectPersistence {
    fn save(&self, tree: &Node) {
        let mut library = self.library.borrow_mut();
        match library.get_mut(&self.project_id) {
            Some(project) => project.set_data(tree.clone()),
            None => debug!(project = %self.project_id, "project no longer exists; save dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindflow_core::Project;

    #[test]
    fn memory_clones_share_snapshots() {
        let store = MemoryPersistence::new();
        let handle = store.clone();
        store.save(&Node::initial());
        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.last(), Some(Node::initial()));
    }

    #[test]
    fn project_persistence_updates_the_entry() {
        let mut project = Project::new();
        project.last_modified = 0;
        let id = project.id.clone();
        let library = Rc::new(RefCell::new(ProjectLibrary::new()));
        library.borrow_mut().upsert(project);

        let sink = ProjectPersistence::new(library.clone(), id.clone());
        let tree = Node::new("root", "Saved");
        sink.save(&tree);

        let library = library.borrow();
        let saved = library.get(&id).unwrap();
        assert_eq!(saved.data, tree);
        assert!(saved.last_modified > 0);
    }

    #[test]
    fn saving_into_a_removed_project_is_ignored() {
        let library = Rc::new(RefCell::new(ProjectLibrary::new()));
        ProjectPersistence::new(library.clone(), "gone").save(&Node::initial());
        assert!(library.borrow().is_empty());
    }
}
