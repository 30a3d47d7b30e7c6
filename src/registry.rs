//! Process-wide test registry.
//!
//! Tests are kept as an explicit list of groups, each holding its entries in
//! registration order. Groups sit in ascending lexicographic order of their
//! name. The order of [`Registry::entries_in_order`] therefore depends only on
//! the sequence of `register` calls.
//!
//! Cases declared with [`unit_test!`](crate::unit_test) or
//! [`fixture_test!`](crate::fixture_test) submit a [`Registration`] that
//! [`Registry::discover`] picks up at first access of the global registry.

use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::case::TestCase;

/// Non-owning reference to one registered test.
#[derive(Clone, Copy)]
pub struct Entry {
    pub group: &'static str,
    pub name: &'static str,
    pub case: &'static dyn TestCase,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Entries sharing one group name, in registration order.
#[derive(Debug, Clone)]
pub struct Group {
    name: &'static str,
    entries: Vec<Entry>,
}

impl Group {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// Discovery record submitted by the declaration macros.
pub struct Registration {
    pub group: &'static str,
    pub name: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub make: fn() -> Box<dyn TestCase>,
}

impl Registration {
    pub const fn new(
        group: &'static str,
        name: &'static str,
        file: &'static str,
        line: u32,
        make: fn() -> Box<dyn TestCase>,
    ) -> Self {
        Self {
            group,
            name,
            file,
            line,
            make,
        }
    }
}

inventory::collect!(Registration);

#[derive(Debug, Clone, Default)]
pub struct Registry {
    groups: Vec<Group>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every submitted [`Registration`].
    ///
    /// Submissions are registered in source order (`file`, then `line`),
    /// which keeps discovery independent of link order. Each case is
    /// constructed once and lives until the process exits.
    pub fn discover() -> Self {
        let mut registrations: Vec<&'static Registration> =
            inventory::iter::<Registration>.into_iter().collect();
        registrations.sort_by(|a, b| a.file.cmp(b.file).then(a.line.cmp(&b.line)));

        let mut registry = Self::new();
        for registration in registrations {
            let case: &'static dyn TestCase = Box::leak((registration.make)());
            registry.register(registration.group, registration.name, case);
        }
        debug!(tests = registry.len(), "Discovered registered tests");
        registry
    }

    /// Append a test under `group`. Duplicate names are kept and both run.
    pub fn register(
        &mut self,
        group: &'static str,
        name: &'static str,
        case: &'static dyn TestCase,
    ) {
        let index = match self.groups.binary_search_by(|g| g.name.cmp(group)) {
            Ok(index) => index,
            Err(index) => {
                self.groups.insert(
                    index,
                    Group {
                        name: group,
                        entries: Vec::new(),
                    },
                );
                index
            }
        };

        let entries = &mut self.groups[index].entries;
        if entries.iter().any(|entry| entry.name == name) {
            warn!(group, name, "Duplicate test registration");
        }
        entries.push(Entry { group, name, case });
        debug!(group, name, "Found test");
    }

    /// Every entry: groups ascending, registration order within a group.
    pub fn entries_in_order(&self) -> Vec<Entry> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter().copied())
            .collect()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Global registry shared across the process, seeded by discovery.
static GLOBAL: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::discover()));

/// Access the global registry.
///
/// The registry is append-only, so a poisoned lock is recovered rather
/// than propagated.
pub fn global() -> MutexGuard<'static, Registry> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register a test with the global registry.
pub fn register(group: &'static str, name: &'static str, case: &'static dyn TestCase) {
    global().register(group, name, case);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{Context, Outcome};
    use crate::case::FnCase;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn noop(_cx: &mut Context<'_>) -> Outcome {
        Ok(())
    }

    fn leaked() -> &'static dyn TestCase {
        Box::leak(Box::new(FnCase::new(noop)))
    }

    fn names(registry: &Registry) -> Vec<(&'static str, &'static str)> {
        registry
            .entries_in_order()
            .iter()
            .map(|entry| (entry.group, entry.name))
            .collect()
    }

    #[test]
    fn test_groups_sorted_and_insertion_order_kept() {
        let mut registry = Registry::new();
        registry.register("Strings", "Trims", leaked());
        registry.register("Math", "Subtracts", leaked());
        registry.register("Strings", "Splits", leaked());
        registry.register("Math", "Adds", leaked());

        assert_eq!(
            names(&registry),
            vec![
                ("Math", "Subtracts"),
                ("Math", "Adds"),
                ("Strings", "Trims"),
                ("Strings", "Splits"),
            ]
        );
        assert_eq!(registry.groups().len(), 2);
        assert_eq!(registry.groups()[0].name(), "Math");
        let strings: Vec<_> = registry.groups()[1]
            .entries()
            .iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(strings, vec!["Trims", "Splits"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut registry = Registry::new();
        registry.register("Math", "Adds", leaked());
        registry.register("Math", "Adds", leaked());

        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), vec![("Math", "Adds"), ("Math", "Adds")]);
    }

    #[test]
    fn test_group_order_is_bytewise() {
        let mut registry = Registry::new();
        for group in ["beta", "Beta", "alpha", "Alpha", "_x"] {
            registry.register(group, "T", leaked());
        }

        let groups: Vec<_> = registry.groups().iter().map(Group::name).collect();
        assert_eq!(groups, vec!["Alpha", "Beta", "_x", "alpha", "beta"]);
    }

    #[test]
    fn test_order_matches_stable_sort_by_group() {
        const GROUPS: [&str; 5] = ["Io", "Math", "Net", "Parse", "Zip"];
        const NAMES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

        for seed in 0..32u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let count = rng.gen_range(0..40);
            let sequence: Vec<(&'static str, &'static str)> = (0..count)
                .map(|_| {
                    (
                        GROUPS[rng.gen_range(0..GROUPS.len())],
                        NAMES[rng.gen_range(0..NAMES.len())],
                    )
                })
                .collect();

            let mut registry = Registry::new();
            for &(group, name) in &sequence {
                registry.register(group, name, leaked());
            }

            let mut expected = sequence.clone();
            expected.sort_by_key(|(group, _)| *group);
            assert_eq!(names(&registry), expected, "seed {seed}");
        }
    }

    #[test]
    fn test_same_history_same_order() {
        let history = [("B", "one"), ("A", "two"), ("B", "three"), ("A", "four")];
        let build = || {
            let mut registry = Registry::new();
            for (group, name) in history {
                registry.register(group, name, leaked());
            }
            names(&registry)
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.entries_in_order().is_empty());
    }
}
