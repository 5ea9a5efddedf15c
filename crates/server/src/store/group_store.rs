use dashmap::DashMap;
use monitor_common::ResourceGroup;
use std::sync::Arc;

use super::ScopeKey;

#[derive(Clone)]
pub struct GroupStore {
    groups: Arc<DashMap<ScopeKey, ResourceGroup>>,
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStore {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(DashMap::new()),
        }
    }

    /// Returns `true` when the group did not exist.
    pub fn upsert(&self, scope: ScopeKey, group: ResourceGroup) -> bool {
        self.groups.insert(scope, group).is_none()
    }

    pub fn get(&self, scope: &ScopeKey) -> Option<ResourceGroup> {
        self.groups.get(scope).map(|g| g.clone())
    }

    pub fn contains(&self, scope: &ScopeKey) -> bool {
        self.groups.contains_key(scope)
    }

    pub fn delete(&self, scope: &ScopeKey) -> bool {
        self.groups.remove(scope).is_some()
    }

    pub fn count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> ResourceGroup {
        ResourceGroup {
            id: None,
            name: name.into(),
            resource_type: None,
            location: "westus".into(),
            tags: Default::default(),
        }
    }

    #[test]
    fn upsert_get_delete() {
        let store = GroupStore::new();
        assert!(store.upsert(ScopeKey::new("s", "Rg1"), group("Rg1")));
        assert!(!store.upsert(ScopeKey::new("s", "rg1"), group("Rg1")));
        assert!(store.contains(&ScopeKey::new("S", "RG1")));
        assert_eq!(store.get(&ScopeKey::new("s", "rg1")).unwrap().location, "westus");
        assert!(store.delete(&ScopeKey::new("s", "rg1")));
        assert_eq!(store.count(), 0);
    }
}
