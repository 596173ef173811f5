use crate::term::{TermId, TermIds};

#[derive(Debug, Clone)]
pub(crate) struct GoTermInternal {
    id: TermId,
    parents: TermIds,
    children: TermIds,
}

impl GoTermInternal {
    pub fn new(id: TermId) -> GoTermInternal {
        GoTermInternal {
            id,
            parents: TermIds::new(),
            children: TermIds::new(),
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn parents(&self) -> &TermIds {
        &self.parents
    }

    pub fn children(&self) -> &TermIds {
        &self.children
    }

    /// Adds `parent_id`, unless it is already a parent
    ///
    /// Returns whether the parent was newly added
    pub fn add_parent(&mut self, parent_id: TermId) -> bool {
        add_unique(&mut self.parents, parent_id)
    }

    /// Adds `child_id`, unless it is already a child
    pub fn add_child(&mut self, child_id: TermId) -> bool {
        add_unique(&mut self.children, child_id)
    }
}

fn add_unique(ids: &mut TermIds, id: TermId) -> bool {
    if ids.contains(&id) {
        false
    } else {
        ids.push(id);
        true
    }
}

impl PartialEq for GoTermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTermInternal {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parents_are_unique_and_ordered() {
        let mut term = GoTermInternal::new("GO:1".into());
        assert!(term.add_parent("GO:3".into()));
        assert!(term.add_parent("GO:2".into()));
        assert!(!term.add_parent("GO:3".into()));
        let parents: Vec<&str> = term.parents().iter().map(TermId::as_str).collect();
        assert_eq!(parents, vec!["GO:3", "GO:2"]);
        assert!(term.children().is_empty());
    }
}
