use core::cmp::Ordering;
use core::fmt;
use derive_enum_all_values::AllValues;

/// The axis a coordinate bit belongs to.
///
/// The discriminant doubles as the index into coordinate vectors passed to
/// [`Coordinate::ison`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AllValues)]
pub enum Dim {
    /// Horizontal position. In address equations this is measured in bytes.
    X = 0,
    /// Vertical position.
    Y = 1,
    /// Slice or depth position.
    Z = 2,
    /// MSAA sample index.
    S = 3,
    /// Bank/"m" coordinate, a linear index spanning several slices.
    M = 4,
}

impl Dim {
    /// Number of axes, the length of a coordinate vector.
    pub const COUNT: usize = 5;

    /// Single letter used when printing equations.
    pub const fn letter(self) -> char {
        match self {
            Dim::X => 'x',
            Dim::Y => 'y',
            Dim::Z => 'z',
            Dim::S => 's',
            Dim::M => 'm',
        }
    }
}

/// A single coordinate bit, `dim[ord]`.
///
/// Coordinates are totally ordered. Within one axis the bit index decides.
/// Across axes `s` sorts before everything and `m` after everything; the
/// remaining axes compare bit index first and fall back to `x < y < z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    dim: Dim,
    ord: u32,
}

impl Coordinate {
    /// Creates the coordinate bit `ord` of axis `dim`.
    pub const fn new(dim: Dim, ord: u32) -> Self {
        Self { dim, ord }
    }

    /// The axis of this bit.
    #[inline]
    pub const fn dim(&self) -> Dim {
        self.dim
    }

    /// The bit index within the axis.
    #[inline]
    pub const fn ord(&self) -> u32 {
        self.ord
    }

    /// Moves this coordinate to the next bit of the same axis.
    #[inline]
    pub fn increment(&mut self) {
        self.ord += 1;
    }

    /// Returns the value (0 or 1) of this bit inside `coords`.
    #[inline]
    pub fn ison(&self, coords: &[u32; Dim::COUNT]) -> u32 {
        if self.ord >= u32::BITS {
            return 0;
        }
        (coords[self.dim as usize] >> self.ord) & 1
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.dim == other.dim {
            return self.ord.cmp(&other.ord);
        }
        if self.dim == Dim::S || other.dim == Dim::M {
            return Ordering::Less;
        }
        if other.dim == Dim::S || self.dim == Dim::M {
            return Ordering::Greater;
        }
        self.ord
            .cmp(&other.ord)
            .then_with(|| self.dim.cmp(&other.dim))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.dim.letter(), self.ord)
    }
}
