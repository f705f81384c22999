use super::{Coordinate, Dim};
use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;

/// Comparison used by [`CoordTerm::filter`] and [`CoordEq::filter`](super::CoordEq::filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Remove coordinates ordered before the reference.
    Less,
    /// Remove coordinates ordered after the reference.
    Greater,
    /// Remove coordinates equal to the reference.
    Equal,
}

impl FilterOp {
    fn matches(self, candidate: &Coordinate, reference: &Coordinate) -> bool {
        match self {
            FilterOp::Less => candidate < reference,
            FilterOp::Greater => candidate > reference,
            FilterOp::Equal => candidate == reference,
        }
    }
}

/// The set of coordinate bits XORed together to form one address bit.
///
/// Kept sorted from smallest to largest coordinate, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CoordTerm {
    coords: Vec<Coordinate>,
}

impl CoordTerm {
    /// Creates an empty term.
    pub const fn new() -> Self {
        Self { coords: Vec::new() }
    }

    /// Removes every coordinate.
    pub fn clear(&mut self) {
        self.coords.clear();
    }

    /// Inserts `co` at its ordered position. Adding a coordinate that is
    /// already present leaves the term unchanged.
    pub fn add(&mut self, co: Coordinate) {
        match self.coords.binary_search(&co) {
            Ok(_) => {}
            Err(pos) => self.coords.insert(pos, co),
        }
    }

    /// Inserts every coordinate of `other`.
    pub fn add_term(&mut self, other: &CoordTerm) {
        for co in &other.coords {
            self.add(*co);
        }
    }

    /// Removes `co`, returning whether it was present.
    pub fn remove(&mut self, co: &Coordinate) -> bool {
        match self.coords.iter().position(|c| c == co) {
            Some(pos) => {
                self.coords.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns whether `co` is part of this term.
    pub fn exists(&self, co: &Coordinate) -> bool {
        self.coords.contains(co)
    }

    /// Number of coordinates in the term.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns whether the term has no coordinates. An empty term evaluates to 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterates the coordinates from smallest to largest.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coords.iter()
    }

    /// Evaluates the term: XOR of every referenced coordinate bit.
    pub fn getxor(&self, coords: &[u32; Dim::COUNT]) -> u32 {
        self.coords.iter().fold(0, |acc, c| acc ^ c.ison(coords))
    }

    /// Removes the coordinates at index `start` and above that compare to
    /// `co` as `op` says, optionally restricted to one `axis`.
    ///
    /// Returns the number of coordinates left in the term.
    pub fn filter(
        &mut self,
        op: FilterOp,
        co: &Coordinate,
        start: usize,
        axis: Option<Dim>,
    ) -> usize {
        let mut i = start;
        while i < self.coords.len() {
            let candidate = &self.coords[i];
            let axis_matches = axis.is_none_or(|a| a == candidate.dim());
            if axis_matches && op.matches(candidate, co) {
                self.coords.remove(i);
            } else {
                i += 1;
            }
        }
        self.coords.len()
    }
}

impl Index<usize> for CoordTerm {
    type Output = Coordinate;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl fmt::Display for CoordTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coords.is_empty() {
            return f.write_str("0");
        }
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                f.write_str("^")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use alloc::string::ToString;

    fn term(items: &[(Dim, u32)]) -> CoordTerm {
        let mut t = CoordTerm::new();
        for &(dim, ord) in items {
            t.add(Coordinate::new(dim, ord));
        }
        t
    }

    #[test]
    fn add_sorts_and_deduplicates() {
        let t = term(&[(Dim::Y, 2), (Dim::X, 4), (Dim::S, 0), (Dim::Y, 2), (Dim::X, 1)]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.to_string(), "s0^x1^y2^x4");
    }

    #[test]
    fn remove_reports_presence() {
        let mut t = term(&[(Dim::X, 0), (Dim::Y, 0)]);
        assert!(t.remove(&Coordinate::new(Dim::X, 0)));
        assert!(!t.remove(&Coordinate::new(Dim::X, 0)));
        assert!(t.exists(&Coordinate::new(Dim::Y, 0)));
        assert_eq!(t.len(), 1);
    }

    #[rstest]
    #[case(coords(0b1, 0, 0, 0, 0), 1)]
    #[case(coords(0b1, 0b10, 0, 0, 0), 0)]
    #[case(coords(0, 0b10, 0, 0, 0), 1)]
    #[case(coords(0, 0, 0, 0, 0), 0)]
    fn getxor_evaluates(#[case] c: [u32; Dim::COUNT], #[case] expected: u32) {
        let t = term(&[(Dim::X, 0), (Dim::Y, 1)]);
        assert_eq!(t.getxor(&c), expected);
    }

    #[rstest]
    #[case(FilterOp::Less, None, "x3^y3^x5")]
    #[case(FilterOp::Greater, None, "x1^y2^x3")]
    #[case(FilterOp::Equal, None, "x1^y2^y3^x5")]
    #[case(FilterOp::Less, Some(Dim::Y), "x1^x3^y3^x5")]
    fn filter_removes_matches(
        #[case] op: FilterOp,
        #[case] axis: Option<Dim>,
        #[case] expected: &str,
    ) {
        let mut t = term(&[(Dim::X, 1), (Dim::Y, 2), (Dim::X, 3), (Dim::Y, 3), (Dim::X, 5)]);
        let left = t.filter(op, &Coordinate::new(Dim::X, 3), 0, axis);
        assert_eq!(t.to_string(), expected);
        assert_eq!(left, t.len());
    }

    #[test]
    fn filter_respects_start() {
        let mut t = term(&[(Dim::X, 1), (Dim::X, 2), (Dim::X, 3)]);
        t.filter(FilterOp::Less, &Coordinate::new(Dim::X, 9), 1, None);
        assert_eq!(t.to_string(), "x1");
    }
}
