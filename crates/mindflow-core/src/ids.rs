//! Fresh node ids.

/// Source of candidate ids for newly created nodes.
///
/// Candidates are not required to be globally unique: the mutator skips any candidate that is
/// already present in the tree.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs (the default for interactive sessions).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... for reproducible documents and tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up_from_one() {
        let mut ids = SequentialIds::new("n");
        assert_eq!(ids.next_id(), "n-1");
        assert_eq!(ids.next_id(), "n-2");
    }

    #[test]
    fn uuid_ids_do_not_repeat() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
