// vetting-core/src/domain/rules/catalog.rs

use std::collections::BTreeMap;

use crate::domain::rules::builtin;
use crate::domain::rules::definition::RuleLogic;

/// Logic bindings that configuration files may refer to by name.
///
/// A rule file declares `logic: integer`; the loader looks `integer` up here.
/// Applications add their own entries next to the built-in ones.
#[derive(Debug, Clone, Default)]
pub struct LogicCatalog {
    entries: BTreeMap<String, RuleLogic>,
}

impl LogicCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in leaves.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        builtin::install(&mut catalog);
        catalog
    }

    pub fn register(&mut self, name: impl Into<String>, logic: RuleLogic) -> &mut Self {
        self.entries.insert(name.into(), logic);
        self
    }

    pub fn with(mut self, name: impl Into<String>, logic: RuleLogic) -> Self {
        self.register(name, logic);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RuleLogic> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::definition::InvocationKind;

    #[test]
    fn test_builtin_catalog_kinds() {
        let catalog = LogicCatalog::builtin();
        assert_eq!(catalog.get("required").map(RuleLogic::kind), Some(InvocationKind::Predicate));
        assert_eq!(catalog.get("integer").map(RuleLogic::kind), Some(InvocationKind::Producer));
        assert_eq!(catalog.get("int").map(RuleLogic::kind), Some(InvocationKind::Producer));
        assert!(catalog.get("positive").is_none());
    }

    #[test]
    fn test_custom_entries_extend_builtin() {
        let catalog = LogicCatalog::builtin().with("positive", RuleLogic::predicate(|_| Ok(true)));
        assert!(catalog.names().any(|n| n == "positive"));
        assert!(catalog.names().any(|n| n == "creditCard"));
    }
}
