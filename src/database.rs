//! The tensor database.
//!
//! A [`Database`] holds every named tensor and scalar that is available while the equations
//! of one equation system are specified. It is populated in three stages:
//!
//! 1. the defaults of the base equation system,
//! 2. domain-specific entry sets loaded from descriptor files, merged with
//!    [`Database::merge`], including clone expansion through [`CloneGroups`],
//! 3. memory layout binding with [`Database::apply_memory_layout`].
//!
//! After that the database is only read.
use crate::entry::{Entry, EntrySet, ScalarDef, TensorDef};
use crate::error::{Error, Result};
use crate::layout::MemoryLayout;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A set of names that share the shape of one canonical definition.
///
/// Merging an entry set containing the canonical definition instantiates one entry per
/// member instead of the canonical entry itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneGroup {
    canonical: String,
    members: Vec<String>,
}

impl CloneGroup {
    pub fn new<S: Into<String>>(canonical: impl Into<String>, members: impl IntoIterator<Item = S>) -> Self {
        Self {
            canonical: canonical.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// The clone group `name(0)`, ..., `name(count - 1)`.
    pub fn indexed(canonical: &str, count: usize) -> Self {
        Self::new(canonical, (0..count).map(|i| format!("{}({})", canonical, i)))
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// Clone groups keyed by their canonical name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloneGroups {
    groups: IndexMap<String, CloneGroup>,
}

impl CloneGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: CloneGroup) -> Self {
        self.insert(group);
        self
    }

    pub fn insert(&mut self, group: CloneGroup) {
        self.groups.insert(group.canonical.clone(), group);
    }

    pub fn get(&self, canonical: &str) -> Option<&CloneGroup> {
        self.groups.get(canonical)
    }

    /// Returns the group the given member name belongs to, if any.
    pub fn group_of(&self, member: &str) -> Option<&CloneGroup> {
        self.groups
            .values()
            .find(|group| group.members.iter().any(|m| m == member))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CloneGroup> {
        self.groups.values()
    }
}

/// Name-keyed, insertion-ordered collection of tensor and scalar definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    entries: IndexMap<String, Entry>,
    clone_groups: CloneGroups,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entry.
    ///
    /// Unlike [`merge`](Self::merge) this is a strict union: any existing entry of the same
    /// name is a [`Error::DefinitionConflict`].
    pub fn insert(&mut self, entry: impl Into<Entry>) -> Result<()> {
        let entry = entry.into();
        if let Some(existing) = self.entries.get(entry.name()) {
            return Err(Error::DefinitionConflict {
                name: entry.name().to_string(),
                existing: existing.shape(),
                incoming: entry.shape(),
            });
        }
        self.entries.insert(entry.name().to_string(), entry);
        Ok(())
    }

    /// Merges an entry set into the database, expanding the given clone groups.
    ///
    /// For every clone group whose canonical name is defined in `entries`, the canonical
    /// definition is replaced by one entry per member, all with the canonical shape. The
    /// resulting entries then replace existing entries of the same name.
    ///
    /// Fails with [`Error::DefinitionConflict`] if an incoming entry disagrees in shape with
    /// an existing entry of the same name, or if `entries` defines a clone member with a
    /// shape that differs from its canonical definition. The database is left unchanged on
    /// failure.
    pub fn merge(&mut self, entries: EntrySet, clones: &CloneGroups) -> Result<()> {
        let entries = expand_clones(entries, clones)?;

        for entry in entries.iter() {
            if let Some(existing) = self.entries.get(entry.name()) {
                if !existing.is_compatible_with(entry) {
                    return Err(Error::DefinitionConflict {
                        name: entry.name().to_string(),
                        existing: existing.shape(),
                        incoming: entry.shape(),
                    });
                }
            }
        }

        debug!("Merging {} entries into tensor database", entries.len());
        for entry in entries {
            self.entries.insert(entry.name().to_string(), entry);
        }
        for group in clones.iter() {
            self.clone_groups.insert(group.clone());
        }
        Ok(())
    }

    /// Merges an entry set, allowing entries to be replaced by definitions of a different shape.
    ///
    /// This is the explicit replacement used when a derived equation system redefines an
    /// operator of its base system. Clone groups are expanded as in [`merge`](Self::merge).
    pub fn update(&mut self, entries: EntrySet, clones: &CloneGroups) -> Result<()> {
        let entries = expand_clones(entries, clones)?;
        for entry in entries {
            if let Some(existing) = self.entries.get(entry.name()) {
                if !existing.is_compatible_with(&entry) {
                    warn!(
                        "Replacing '{}' of shape {} with a definition of shape {}",
                        entry.name(),
                        existing.shape(),
                        entry.shape()
                    );
                }
            }
            self.entries.insert(entry.name().to_string(), entry);
        }
        for group in clones.iter() {
            self.clone_groups.insert(group.clone());
        }
        Ok(())
    }

    /// Binds storage hints from a layout descriptor to the entries it names.
    ///
    /// A layout entry keyed by the canonical name of a known clone group is bound to every
    /// member of the group. Fails with [`Error::UnknownTensorReference`] if the descriptor
    /// names an entry that is not in the database, and with [`Error::InvalidLayout`] if a
    /// hint does not fit the entry. Nothing is bound unless every layout entry is valid.
    pub fn apply_memory_layout(&mut self, layout: &MemoryLayout) -> Result<()> {
        let mut bindings = Vec::new();
        for (name, spec) in layout.iter() {
            let targets: Vec<&str> = if self.entries.contains_key(name) {
                vec![name]
            } else if let Some(group) = self.clone_groups.get(name) {
                group.members().iter().map(String::as_str).collect()
            } else {
                return Err(Error::UnknownTensorReference {
                    name: name.to_string(),
                    context: "memory layout",
                });
            };

            for target in targets {
                match self.entries.get(target) {
                    Some(Entry::Tensor(tensor)) => {
                        spec.check_against(&tensor.shape_with_layout(spec))
                            .map_err(|reason| Error::InvalidLayout {
                                name: target.to_string(),
                                reason,
                            })?;
                    }
                    Some(Entry::Scalar(_)) => {
                        return Err(Error::InvalidLayout {
                            name: target.to_string(),
                            reason: "scalars have no memory layout".to_string(),
                        });
                    }
                    None => {
                        return Err(Error::UnknownTensorReference {
                            name: target.to_string(),
                            context: "memory layout",
                        });
                    }
                }
                if spec.is_trivial() {
                    warn!("Memory layout entry for '{}' carries no hints", target);
                }
                bindings.push((target.to_string(), spec.clone()));
            }
        }

        debug!("Binding memory layout to {} entries", bindings.len());
        for (name, spec) in bindings {
            if let Some(Entry::Tensor(tensor)) = self.entries.get_mut(&name) {
                tensor.bind_layout(spec);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks up a tensor definition.
    pub fn tensor(&self, name: &str) -> Result<&TensorDef> {
        self.entries
            .get(name)
            .and_then(Entry::as_tensor)
            .ok_or_else(|| Error::UnknownTensorReference {
                name: name.to_string(),
                context: "tensor lookup",
            })
    }

    /// Looks up a scalar definition.
    pub fn scalar(&self, name: &str) -> Result<&ScalarDef> {
        self.entries
            .get(name)
            .and_then(Entry::as_scalar)
            .ok_or_else(|| Error::UnknownTensorReference {
                name: name.to_string(),
                context: "scalar lookup",
            })
    }

    /// Returns the member definitions of the clone group with the given canonical name, in
    /// member order.
    pub fn clones(&self, canonical: &str) -> Result<Vec<&TensorDef>> {
        let group = self
            .clone_groups
            .get(canonical)
            .ok_or_else(|| Error::UnknownTensorReference {
                name: canonical.to_string(),
                context: "clone group lookup",
            })?;
        group
            .members()
            .iter()
            .map(|member| self.tensor(member))
            .collect()
    }

    pub fn clone_groups(&self) -> &CloneGroups {
        &self.clone_groups
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns all entries as an entry set, e.g. for merging into another database.
    pub fn to_entry_set(&self) -> EntrySet {
        EntrySet::from_entries(self.entries.values().cloned())
            .expect("Internal error: database entries always have unique names")
    }
}

/// Replaces canonical definitions by their clone members.
fn expand_clones(mut entries: EntrySet, clones: &CloneGroups) -> Result<EntrySet> {
    for group in clones.iter() {
        let Some(canonical) = entries.remove(group.canonical()) else {
            debug!(
                "Clone group '{}' has no canonical definition in this entry set",
                group.canonical()
            );
            continue;
        };

        debug!(
            "Expanding '{}' of shape {} into {} clones",
            group.canonical(),
            canonical.shape(),
            group.members().len()
        );
        for member in group.members() {
            let clone = canonical.renamed(member.as_str());
            if let Some(explicit) = entries.get(member) {
                if !explicit.is_compatible_with(&clone) {
                    return Err(Error::DefinitionConflict {
                        name: member.clone(),
                        existing: clone.shape(),
                        incoming: explicit.shape(),
                    });
                }
            }
            entries.insert(clone)?;
        }
    }
    Ok(entries)
}
