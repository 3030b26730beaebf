/// A grouping of whole or partial atoms treated as one unit for descriptor computation.
///
/// `indexes[i]` is a zero-based atom index and `weights[i]` the share of that atom assigned to
/// this bead. An atom may appear in several beads with complementary weights (e.g. half of a
/// bridging carbon in each of two beads).
#[derive(Debug, Clone, PartialEq)]
pub struct Bead {
    indexes: Vec<usize>,
    weights: Vec<f64>,
}

impl Bead {
    /// Builds a bead from parallel index/weight sequences.
    ///
    /// # Panics
    ///
    /// Panics if `indexes` and `weights` differ in length; the parser always produces
    /// them pairwise, so a mismatch is a programming error.
    pub fn new(indexes: Vec<usize>, weights: Vec<f64>) -> Self {
        assert_eq!(
            indexes.len(),
            weights.len(),
            "Bead indexes and weights must have the same length"
        );
        Self { indexes, weights }
    }

    /// A single bead containing every atom of an `atom_count`-atom molecule with full weight.
    pub fn whole_molecule(atom_count: usize) -> Self {
        Self {
            indexes: (0..atom_count).collect(),
            weights: vec![1.0; atom_count],
        }
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Iterates over `(atom index, weight)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indexes.iter().copied().zip(self.weights.iter().copied())
    }

    /// Sum of the weights, i.e. how many atoms' worth of matter the bead holds.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}
