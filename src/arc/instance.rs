//! Per-arc instance storage.

use crate::data::CitationPair;

/// One per-arc record: the two endpoint values and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcInstance {
    /// Value the arc starts from.
    pub source: f32,
    /// Value the arc ends at.
    pub target: f32,
}

impl ArcInstance {
    /// Create an instance.
    #[must_use]
    pub const fn new(source: f32, target: f32) -> Self {
        Self { source, target }
    }

    /// Absolute value difference between the endpoints.
    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.source - self.target).abs()
    }
}

impl From<CitationPair> for ArcInstance {
    fn from(pair: CitationPair) -> Self {
        Self::new(pair.source, pair.target)
    }
}

/// Write-once instance storage, laid out as two parallel columns.
///
/// Populated once from the flattened pairs and read every frame. There is
/// no per-instance mutation; reloading data means building a new buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBuffer {
    source: Vec<f32>,
    target: Vec<f32>,
}

impl InstanceBuffer {
    /// Build the buffer from flattened pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[CitationPair]) -> Self {
        let (source, target) = pairs.iter().map(|p| (p.source, p.target)).unzip();
        Self { source, target }
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether the buffer holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Instance at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ArcInstance> {
        Some(ArcInstance::new(*self.source.get(index)?, *self.target.get(index)?))
    }

    /// Source column.
    #[must_use]
    pub fn sources(&self) -> &[f32] {
        &self.source
    }

    /// Target column.
    #[must_use]
    pub fn targets(&self) -> &[f32] {
        &self.target
    }

    /// Iterate instances in upload order.
    pub fn iter(&self) -> impl Iterator<Item = ArcInstance> + '_ {
        self.source.iter().zip(&self.target).map(|(&s, &t)| ArcInstance::new(s, t))
    }
}
