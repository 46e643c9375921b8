use serde::{Deserialize, Serialize};

use crate::model::Node;

pub const UNTITLED_PROJECT_NAME: &str = "Untitled Mind Map";

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn normalized_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        UNTITLED_PROJECT_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// A named, saved mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
    pub data: Node,
}

impl Project {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: UNTITLED_PROJECT_NAME.to_string(),
            last_modified: now_millis(),
            data: Node::initial(),
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = normalized_name(name);
        self.last_modified = now_millis();
    }

    pub fn set_data(&mut self, data: Node) {
        self.data = data;
        self.last_modified = now_millis();
    }

    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.data.text.to_lowercase().contains(query)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

/// All saved projects, as listed on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectLibrary {
    projects: Vec<Project>,
}

impl ProjectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        let mut library: Self = serde_json::from_str(text)?;
        library.sort_recent_first();
        Ok(library)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Starts a new project and lists it first.
    pub fn create(&mut self) -> &Project {
        self.projects.insert(0, Project::new());
        &self.projects[0]
    }

    /// Replaces the project with the same id, or appends it.
    pub fn upsert(&mut self, project: Project) {
        match self.get_mut(&project.id) {
            Some(slot) => *slot = project,
            None => self.projects.push(project),
        }
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        let Some(project) = self.get_mut(id) else {
            return false;
        };
        project.rename(name);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Project> {
        let pos = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(pos))
    }

    pub fn sort_recent_first(&mut self) {
        self.projects
            .sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    }

    /// Case-insensitive match on the project name or the root idea's text.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Project> {
        let query = query.trim().to_lowercase();
        self.projects
            .iter()
            .filter(|p| query.is_empty() || p.matches(&query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutate::update_text;

    fn project(id: &str, name: &str, last_modified: i64) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            last_modified,
            data: Node::initial(),
        }
    }

    #[test]
    fn new_projects_start_from_the_initial_document() {
        let p = Project::new();
        assert_eq!(p.name, UNTITLED_PROJECT_NAME);
        assert_eq!(p.data, Node::initial());
    }

    #[test]
    fn blank_rename_falls_back_to_untitled() {
        let mut lib = ProjectLibrary::new();
        let id = lib.create().id.clone();
        assert!(lib.rename(&id, "  Roadmap  "));
        assert_eq!(lib.get(&id).unwrap().name, "Roadmap");
        assert!(lib.rename(&id, "   "));
        assert_eq!(lib.get(&id).unwrap().name, UNTITLED_PROJECT_NAME);
        assert!(!lib.rename("missing", "x"));
    }

    #[test]
    fn search_matches_name_or_root_text() {
        let mut lib = ProjectLibrary::new();
        lib.upsert(project("1", "Quarterly Plan", 1));
        let mut other = project("2", "Notes", 2);
        other.data = update_text(&other.data, "root", "Garden PLAN");
        lib.upsert(other);
        lib.upsert(project("3", "Misc", 3));

        let hits: Vec<&str> = lib.search(" plan ").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(hits, ["1", "2"]);
        assert_eq!(lib.search("").len(), 3);
    }

    #[test]
    fn loading_orders_most_recent_first() {
        let mut lib = ProjectLibrary::new();
        lib.upsert(project("old", "Old", 10));
        lib.upsert(project("new", "New", 20));
        let loaded = ProjectLibrary::from_json(&lib.to_json().unwrap()).unwrap();
        assert_eq!(loaded.projects()[0].id, "new");
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut lib = ProjectLibrary::new();
        lib.upsert(project("1", "A", 1));
        lib.upsert(project("1", "B", 2));
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.get("1").unwrap().name, "B");
        assert!(lib.remove("1").is_some());
        assert!(lib.is_empty());
    }
}
