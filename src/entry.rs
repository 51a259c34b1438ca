//! Database entries: tensor and scalar definitions.
use crate::config::NamePatterns;
use crate::error::{Error, Result};
use crate::layout::LayoutSpec;
use crate::shape::Shape;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Hints forwarded to the kernel generator for one entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationHints {
    /// The entry is stored transposed.
    pub transpose: bool,
    /// The leading stride of the entry is padded to the architecture's alignment.
    pub align_stride: bool,
}

/// Name-based rules that decide which [`GenerationHints`] an entry receives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRules {
    pub transpose: NamePatterns,
    pub align_stride: NamePatterns,
}

impl HintRules {
    /// Rules that leave every entry untouched.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn hints_for(&self, name: &str) -> GenerationHints {
        GenerationHints {
            transpose: self.transpose.matches(name),
            align_stride: self.align_stride.matches(name),
        }
    }
}

/// A named tensor definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDef {
    name: String,
    shape: Shape,
    #[serde(default)]
    hints: GenerationHints,
    #[serde(default)]
    layout: Option<LayoutSpec>,
}

impl TensorDef {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
            hints: GenerationHints::default(),
            layout: None,
        }
    }

    pub fn with_hints(mut self, hints: GenerationHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn hints(&self) -> GenerationHints {
        self.hints
    }

    pub fn layout(&self) -> Option<&LayoutSpec> {
        self.layout.as_ref()
    }

    /// Returns a copy of this definition under a different name.
    pub(crate) fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Applies the given hints. A transposed tensor stores its axes in reverse order.
    pub(crate) fn apply_hints(&mut self, hints: GenerationHints) {
        if hints.transpose && !self.hints.transpose {
            self.shape = self.shape.reversed();
        }
        self.hints.transpose |= hints.transpose;
        self.hints.align_stride |= hints.align_stride;
    }

    /// The shape of this tensor once the given layout is bound.
    ///
    /// A layout that changes the transposition hint reverses the shape.
    pub(crate) fn shape_with_layout(&self, layout: &LayoutSpec) -> Shape {
        match layout.transpose {
            Some(transpose) if transpose != self.hints.transpose => self.shape.reversed(),
            _ => self.shape.clone(),
        }
    }

    pub(crate) fn bind_layout(&mut self, layout: LayoutSpec) {
        self.shape = self.shape_with_layout(&layout);
        if let Some(transpose) = layout.transpose {
            self.hints.transpose = transpose;
        }
        if let Some(align_stride) = layout.align_stride {
            self.hints.align_stride = align_stride;
        }
        self.layout = Some(layout);
    }
}

/// A named zero-rank value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarDef {
    name: String,
}

impl ScalarDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    Tensor(TensorDef),
    Scalar(ScalarDef),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Tensor(tensor) => tensor.name(),
            Entry::Scalar(scalar) => scalar.name(),
        }
    }

    /// The shape of the entry. Scalars have the empty shape.
    pub fn shape(&self) -> Shape {
        match self {
            Entry::Tensor(tensor) => tensor.shape().clone(),
            Entry::Scalar(_) => Shape::scalar(),
        }
    }

    pub fn as_tensor(&self) -> Option<&TensorDef> {
        match self {
            Entry::Tensor(tensor) => Some(tensor),
            Entry::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarDef> {
        match self {
            Entry::Tensor(_) => None,
            Entry::Scalar(scalar) => Some(scalar),
        }
    }

    pub(crate) fn renamed(&self, name: impl Into<String>) -> Self {
        match self {
            Entry::Tensor(tensor) => Entry::Tensor(tensor.renamed(name)),
            Entry::Scalar(_) => Entry::Scalar(ScalarDef::new(name)),
        }
    }

    /// Returns `true` if both entries define the same kind of value with the same shape.
    pub fn is_compatible_with(&self, other: &Entry) -> bool {
        match (self, other) {
            (Entry::Tensor(a), Entry::Tensor(b)) => a.shape() == b.shape(),
            (Entry::Scalar(_), Entry::Scalar(_)) => true,
            _ => false,
        }
    }
}

impl From<TensorDef> for Entry {
    fn from(tensor: TensorDef) -> Self {
        Entry::Tensor(tensor)
    }
}

impl From<ScalarDef> for Entry {
    fn from(scalar: ScalarDef) -> Self {
        Entry::Scalar(scalar)
    }
}

/// An ordered set of entries as delivered by a descriptor file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntrySet {
    entries: IndexMap<String, Entry>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an entry set from the given entries.
    ///
    /// Fails with [`Error::DefinitionConflict`] if a name occurs twice with incompatible shapes.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let mut set = Self::new();
        for entry in entries {
            set.insert(entry)?;
        }
        Ok(set)
    }

    /// Inserts an entry, replacing a compatible entry of the same name.
    pub fn insert(&mut self, entry: impl Into<Entry>) -> Result<()> {
        let entry = entry.into();
        if let Some(existing) = self.entries.get(entry.name()) {
            if !existing.is_compatible_with(&entry) {
                return Err(Error::DefinitionConflict {
                    name: entry.name().to_string(),
                    existing: existing.shape(),
                    incoming: entry.shape(),
                });
            }
        }
        self.entries.insert(entry.name().to_string(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
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

    /// Applies the hints selected by `rules` to every tensor in the set.
    pub fn apply_hint_rules(&mut self, rules: &HintRules) {
        for entry in self.entries.values_mut() {
            if let Entry::Tensor(tensor) = entry {
                let hints = rules.hints_for(tensor.name());
                tensor.apply_hints(hints);
            }
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.shift_remove(name)
    }
}

impl IntoIterator for EntrySet {
    type Item = Entry;
    type IntoIter = indexmap::map::IntoValues<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
