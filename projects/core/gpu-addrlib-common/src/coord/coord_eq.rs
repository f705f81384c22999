use super::{CoordTerm, Coordinate, Dim, FilterOp};
use alloc::vec::Vec;
use core::fmt;
use core::ops::{BitXorAssign, Index, IndexMut};

/// A full address equation: one [`CoordTerm`] per address bit, bit 0 first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CoordEq {
    bits: Vec<CoordTerm>,
}

impl CoordEq {
    /// Creates an equation with no bits.
    pub const fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Creates an equation of `num_bits` empty bits.
    pub fn with_bits(num_bits: usize) -> Self {
        let mut eq = Self::new();
        eq.resize(num_bits);
        eq
    }

    /// Number of address bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns whether the equation has no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Grows or shrinks the equation. New bits start empty.
    pub fn resize(&mut self, num_bits: usize) {
        self.bits.resize_with(num_bits, CoordTerm::new);
    }

    /// Removes `co` from every bit.
    pub fn remove(&mut self, co: &Coordinate) {
        for term in &mut self.bits {
            term.remove(co);
        }
    }

    /// Returns whether any bit references `co`.
    pub fn exists(&self, co: &Coordinate) -> bool {
        self.bits.iter().any(|term| term.exists(co))
    }

    /// Evaluates the equation for concrete coordinates.
    pub fn solve(&self, coords: &[u32; Dim::COUNT]) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .take(u64::BITS as usize)
            .fold(0u64, |acc, (i, term)| acc | ((term.getxor(coords) as u64) << i))
    }

    /// Recovers coordinates from an address value.
    ///
    /// Bits with a single coordinate are resolved directly. When bits with
    /// several coordinates remain, `z` is first seeded from `m / slice_in_m`
    /// (if `slice_in_m` is non-zero), then the remaining bits are resolved by
    /// substituting already known coordinate bits until a pass makes no
    /// progress.
    pub fn solve_addr(&self, addr: u64, slice_in_m: u64) -> [u32; Dim::COUNT] {
        let mut coords = [0u32; Dim::COUNT];
        let mut known = [0u32; Dim::COUNT];
        let mut addr = addr;
        let mut pending = self.clone();

        let mut bits_left = 0;
        for i in 0..pending.len() {
            match pending.bits[i].len() {
                1 => resolve_single(&mut pending.bits[i], i, addr, &mut coords, &mut known),
                0 => {}
                _ => bits_left += 1,
            }
        }

        if bits_left == 0 {
            return coords;
        }

        if slice_in_m != 0 {
            coords[Dim::Z as usize] = (coords[Dim::M as usize] as u64 / slice_in_m) as u32;
            known[Dim::Z as usize] = u32::MAX;
        }

        loop {
            let mut progress = false;
            bits_left = 0;

            for i in 0..pending.len() {
                let term = &mut pending.bits[i];
                if term.len() > 1 {
                    let resolved: Vec<Coordinate> = term
                        .iter()
                        .filter(|c| is_known(&known, c))
                        .copied()
                        .collect();
                    for c in resolved {
                        addr ^= (c.ison(&coords) as u64) << i;
                        term.remove(&c);
                        progress = true;
                    }
                }

                match term.len() {
                    0 => {}
                    1 => {
                        if !is_known(&known, &term[0]) {
                            resolve_single(term, i, addr, &mut coords, &mut known);
                            progress = true;
                        }
                    }
                    _ => bits_left += 1,
                }
            }

            if bits_left == 0 || !progress {
                break;
            }
        }

        coords
    }

    /// Returns bits `start..start + num` as a new equation. `None` copies
    /// through the last bit.
    pub fn copy(&self, start: usize, num: Option<usize>) -> CoordEq {
        let end = match num {
            Some(n) => (start + n).min(self.len()),
            None => self.len(),
        };
        CoordEq {
            bits: self.bits[start.min(end)..end].to_vec(),
        }
    }

    /// Reverses the order of bits `start..start + num`. `None` reverses
    /// through the last bit.
    pub fn reverse(&mut self, start: usize, num: Option<usize>) {
        let end = match num {
            Some(n) => (start + n).min(self.len()),
            None => self.len(),
        };
        if start < end {
            self.bits[start..end].reverse();
        }
    }

    /// XORs `other` into this equation, bit 0 of `other` landing on bit
    /// `start`. Bits of `other` past the end of this equation are dropped.
    pub fn xorin(&mut self, other: &CoordEq, start: usize) {
        for (dst, src) in self.bits.iter_mut().skip(start).zip(other.bits.iter()) {
            dst.add_term(src);
        }
    }

    /// Filters every bit from `start` upwards, then deletes the bits whose
    /// term became empty. Returns the new number of bits.
    pub fn filter(
        &mut self,
        op: FilterOp,
        co: &Coordinate,
        start: usize,
        axis: Option<Dim>,
    ) -> usize {
        let mut i = start;
        while i < self.bits.len() {
            if self.bits[i].filter(op, co, 0, axis) == 0 {
                self.bits.remove(i);
            } else {
                i += 1;
            }
        }
        self.bits.len()
    }

    /// Moves the bits at and above `start` up by `amount` positions (down
    /// for negative amounts). Vacated bits become empty; bits moved past
    /// either end are dropped.
    pub fn shift(&mut self, amount: i32, start: usize) {
        if amount == 0 {
            return;
        }

        let num_bits = self.bits.len() as i64;
        let start = start as i64;
        let source_delta = -(amount as i64);
        let source = |i: i64| -> Option<usize> {
            let from = i + source_delta;
            (from >= start && from < num_bits).then_some(from as usize)
        };

        if source_delta < 0 {
            let mut i = num_bits - 1;
            while i >= start {
                self.bits[i as usize] = match source(i) {
                    Some(from) => self.bits[from].clone(),
                    None => CoordTerm::new(),
                };
                i -= 1;
            }
        } else {
            for i in start..num_bits {
                self.bits[i as usize] = match source(i) {
                    Some(from) => self.bits[from].clone(),
                    None => CoordTerm::new(),
                };
            }
        }
    }

    /// Adds a 2D Morton interleave of `c0` and `c1` to bits `start..=end`.
    /// An `end` of 0 means the last bit. Both coordinates are advanced as
    /// they are consumed, so consecutive calls continue the interleave.
    pub fn mort2d(&mut self, c0: &mut Coordinate, c1: &mut Coordinate, start: usize, end: usize) {
        let end = self.resolve_end(end);
        for i in start..=end {
            let c = if (i - start) % 2 == 0 { &mut *c0 } else { &mut *c1 };
            self.bits[i].add(*c);
            c.increment();
        }
    }

    /// Adds a 3D Morton interleave of `c0`, `c1` and `c2` to bits
    /// `start..=end`. An `end` of 0 means the last bit.
    pub fn mort3d(
        &mut self,
        c0: &mut Coordinate,
        c1: &mut Coordinate,
        c2: &mut Coordinate,
        start: usize,
        end: usize,
    ) {
        let end = self.resolve_end(end);
        for i in start..=end {
            let c = match (i - start) % 3 {
                0 => &mut *c0,
                1 => &mut *c1,
                _ => &mut *c2,
            };
            self.bits[i].add(*c);
            c.increment();
        }
    }

    /// Iterates the per-bit terms, bit 0 first.
    pub fn iter(&self) -> impl Iterator<Item = &CoordTerm> {
        self.bits.iter()
    }

    fn resolve_end(&self, end: usize) -> usize {
        if end == 0 {
            debug_assert!(!self.bits.is_empty());
            self.bits.len().saturating_sub(1)
        } else {
            end
        }
    }
}

#[inline]
fn is_known(known: &[u32; Dim::COUNT], c: &Coordinate) -> bool {
    c.ord() < u32::BITS && (known[c.dim() as usize] >> c.ord()) & 1 != 0
}

#[inline]
fn resolve_single(
    term: &mut CoordTerm,
    bit: usize,
    addr: u64,
    coords: &mut [u32; Dim::COUNT],
    known: &mut [u32; Dim::COUNT],
) {
    let c = term[0];
    if c.ord() < u32::BITS && bit < u64::BITS as usize {
        let value = ((addr >> bit) & 1) as u32;
        coords[c.dim() as usize] |= value << c.ord();
        known[c.dim() as usize] |= 1 << c.ord();
    }
    term.clear();
}

impl Index<usize> for CoordEq {
    type Output = CoordTerm;

    fn index(&self, bit: usize) -> &Self::Output {
        &self.bits[bit]
    }
}

impl IndexMut<usize> for CoordEq {
    fn index_mut(&mut self, bit: usize) -> &mut Self::Output {
        &mut self.bits[bit]
    }
}

impl BitXorAssign<&CoordEq> for CoordEq {
    fn bitxor_assign(&mut self, rhs: &CoordEq) {
        self.xorin(rhs, 0);
    }
}

impl fmt::Display for CoordEq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.bits.iter().enumerate().rev() {
            if i + 1 != self.bits.len() {
                f.write_str(" ")?;
            }
            write!(f, "[{i}]={term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn x(ord: u32) -> Coordinate {
        Coordinate::new(Dim::X, ord)
    }

    fn y(ord: u32) -> Coordinate {
        Coordinate::new(Dim::Y, ord)
    }

    /// 8 bit Morton equation `y3 x3 y2 x2 y1 x1 y0 x0` with a xor on bit 7.
    fn morton_with_xor() -> CoordEq {
        let mut eq = CoordEq::with_bits(8);
        eq.mort2d(&mut x(0), &mut y(0), 0, 0);
        eq[7].add(x(0));
        eq
    }

    #[test]
    fn mort2d_interleaves_and_advances() {
        let mut eq = CoordEq::with_bits(6);
        let mut cx = x(0);
        let mut cy = y(0);
        eq.mort2d(&mut cx, &mut cy, 0, 3);
        eq.mort2d(&mut cx, &mut cy, 4, 0);
        assert_eq!(eq[0][0], x(0));
        assert_eq!(eq[1][0], y(0));
        assert_eq!(eq[4][0], x(2));
        assert_eq!(eq[5][0], y(2));
        assert_eq!(cx, x(3));
    }

    #[test]
    fn mort3d_cycles_three_axes() {
        let mut eq = CoordEq::with_bits(6);
        let (mut a, mut b, mut c) = (x(0), y(0), Coordinate::new(Dim::Z, 0));
        eq.mort3d(&mut a, &mut b, &mut c, 0, 0);
        assert_eq!(eq[2][0], Coordinate::new(Dim::Z, 0));
        assert_eq!(eq[3][0], x(1));
        assert_eq!(eq[5][0], Coordinate::new(Dim::Z, 1));
    }

    #[rstest]
    #[case(coords(0b1010, 0b0110, 0, 0, 0), coords(0b0011, 0b1111, 0, 0, 0))]
    #[case(coords(0xF, 0, 0, 0, 0), coords(0, 0xF, 0, 0, 0))]
    fn solve_is_linear_over_xor(#[case] a: [u32; Dim::COUNT], #[case] b: [u32; Dim::COUNT]) {
        let eq = morton_with_xor();
        let mut ab = a;
        for (dst, src) in ab.iter_mut().zip(b.iter()) {
            *dst ^= *src;
        }
        assert_eq!(eq.solve(&a) ^ eq.solve(&b), eq.solve(&ab));
    }

    #[test]
    fn single_feed_bit_flips_one_address_bit() {
        let eq = morton_with_xor();
        let base = coords(0b0101, 0b0010, 0, 0, 0);
        let flipped = coords(0b0101, 0b0010 ^ 0b0100, 0, 0, 0);
        assert_eq!(eq.solve(&base) ^ eq.solve(&flipped), 1 << 5);
    }

    #[test]
    fn solve_addr_inverts_solve() {
        let eq = morton_with_xor();
        for xv in 0..16 {
            for yv in 0..16 {
                let c = coords(xv, yv, 0, 0, 0);
                assert_eq!(eq.solve_addr(eq.solve(&c), 0), c);
            }
        }
    }

    #[test]
    fn solve_addr_seeds_z_from_m() {
        // bit0 = x0 ^ z0, bit1 = m0, bit2 = m1
        let mut eq = CoordEq::with_bits(3);
        eq[0].add(x(0));
        eq[0].add(Coordinate::new(Dim::Z, 0));
        eq[1].add(Coordinate::new(Dim::M, 0));
        eq[2].add(Coordinate::new(Dim::M, 1));

        // m = 3, slice_in_m = 3 -> z = 1; bit0 = 0 -> x0 = 1
        let c = eq.solve_addr(0b110, 3);
        assert_eq!(c[Dim::M as usize], 3);
        assert_eq!(c[Dim::Z as usize], 1);
        assert_eq!(c[Dim::X as usize], 1);
    }

    #[test]
    fn solve_addr_stops_at_fixed_point() {
        // x0 ^ y0 can never be split without more information.
        let mut eq = CoordEq::with_bits(1);
        eq[0].add(x(0));
        eq[0].add(y(0));
        assert_eq!(eq.solve_addr(1, 0), coords(0, 0, 0, 0, 0));
    }

    #[test]
    fn shift_moves_bits_up_and_down() {
        let mut eq = CoordEq::with_bits(4);
        eq.mort2d(&mut x(0), &mut y(0), 0, 0);

        let mut up = eq.clone();
        up.shift(1, 1);
        assert!(up[1].is_empty());
        assert_eq!(up[2][0], y(0));
        assert_eq!(up[3][0], x(1));
        assert_eq!(up[0][0], x(0));

        let mut down = eq.clone();
        down.shift(-2, 0);
        assert_eq!(down[0][0], x(1));
        assert_eq!(down[1][0], y(1));
        assert!(down[2].is_empty() && down[3].is_empty());
    }

    #[test]
    fn filter_drops_emptied_bits() {
        let mut eq = CoordEq::with_bits(4);
        eq.mort2d(&mut x(0), &mut y(0), 0, 0);
        let left = eq.filter(FilterOp::Equal, &x(0), 0, Some(Dim::X));
        assert_eq!(left, 3);
        assert_eq!(eq[0][0], y(0));
        assert!(!eq.exists(&x(0)));
    }

    #[test]
    fn copy_reverse_xorin_and_remove() {
        let eq = morton_with_xor();
        let mut part = eq.copy(4, Some(2));
        assert_eq!(part.len(), 2);
        assert_eq!(part[0][0], x(2));

        part.reverse(0, None);
        assert_eq!(part[0][0], y(2));

        let mut combined = eq.clone();
        combined.xorin(&part, 6);
        assert_eq!(combined[6].len(), 2);
        assert_eq!(combined[7].len(), 3);

        combined ^= &eq;
        assert_eq!(combined[0].len(), 1);

        combined.remove(&x(0));
        assert!(!combined.exists(&x(0)));
        assert_eq!(eq.copy(0, None), eq);
    }
}
