use itertools::iproduct;
use std::fmt::{self, Display};

/// A single (k-mer length, subsampling rate) combination under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub kmer_size: u32,
    pub scaled: u64,
}

impl Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={}, scaled={}", self.kmer_size, self.scaled)
    }
}

/// Cross product of the two sweep axes.
///
/// Iteration yields `scaled` as the outer and `kmer_size` as the inner loop. The grid is plain
/// data and can be walked any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGrid {
    scaled: Vec<u64>,
    kmer_sizes: Vec<u32>,
}

impl ParameterGrid {
    pub fn new(scaled: Vec<u64>, kmer_sizes: Vec<u32>) -> Self {
        Self { scaled, kmer_sizes }
    }

    pub fn iter(&self) -> impl Iterator<Item = GridPoint> + '_ {
        iproduct!(self.scaled.iter(), self.kmer_sizes.iter()).map(|(&scaled, &kmer_size)| {
            GridPoint { kmer_size, scaled }
        })
    }

    pub fn len(&self) -> usize {
        self.scaled.len() * self.kmer_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> IntoIterator for &'a ParameterGrid {
    type Item = GridPoint;
    type IntoIter = Box<dyn Iterator<Item = GridPoint> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
