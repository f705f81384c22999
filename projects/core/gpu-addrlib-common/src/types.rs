//! Plain value types shared by surface descriptors of every generation.

use bitfield::bitfield;

/// Dimensions in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3d {
    /// Width in elements
    pub width: u32,
    /// Height in elements
    pub height: u32,
    /// Depth in elements (slices)
    pub depth: u32,
}

impl Extent3d {
    /// Creates an extent.
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

/// Dimensionality of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceType {
    /// One dimensional texture.
    Tex1d = 0,
    /// Two dimensional texture or texture array.
    #[default]
    Tex2d = 1,
    /// Volume texture.
    Tex3d = 2,
}

impl ResourceType {
    /// Decodes the value used across the C interface.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(ResourceType::Tex1d),
            1 => Some(ResourceType::Tex2d),
            2 => Some(ResourceType::Tex3d),
            _ => None,
        }
    }
}

bitfield! {
    /// Surface usage flags.
    ///
    /// Bit layout:
    /// - Bit 0: Color target
    /// - Bit 1: Depth target
    /// - Bit 2: Stencil target
    /// - Bit 3: Hierarchical Z / stencil
    /// - Bit 4: Block compressed format
    /// - Bit 5: NV12 video surface
    /// - Bit 6: P010 video surface
    /// - Bit 7: 3D surface viewed as a 2D array
    /// - Bit 8: Variable rate shading image
    /// - Bit 9: Standard swizzle partially resident texture
    /// - Bit 10: Quad buffer stereo
    /// - Bit 11: Displayable surface
    /// - Bit 12: Linear slices must be exactly block sized when dense packed
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceFlags(u32);
    impl Debug;
    u32;

    /// Color target
    pub color, set_color: 0;
    /// Depth target
    pub depth, set_depth: 1;
    /// Stencil target
    pub stencil, set_stencil: 2;
    /// Hierarchical Z / stencil surface
    pub hi_z_hi_s, set_hi_z_hi_s: 3;
    /// Block compressed format
    pub block_compressed, set_block_compressed: 4;
    /// NV12 video surface
    pub nv12, set_nv12: 5;
    /// P010 video surface
    pub p010, set_p010: 6;
    /// 3D surface viewed as a 2D array
    pub view_3d_as_2d_array, set_view_3d_as_2d_array: 7;
    /// Variable rate shading image
    pub is_vrs_image, set_is_vrs_image: 8;
    /// Standard swizzle partially resident texture
    pub standard_prt, set_standard_prt: 9;
    /// Quad buffer stereo
    pub qb_stereo, set_qb_stereo: 10;
    /// Displayable surface
    pub display, set_display: 11;
    /// Dense linear slices must be block exact
    pub dense_slice_exact, set_dense_slice_exact: 12;
}

impl SurfaceFlags {
    /// Creates flags from their raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits, as used across the C interface.
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits_round_trip_through_raw_value() {
        let mut flags = SurfaceFlags::default();
        flags.set_depth(true);
        flags.set_qb_stereo(true);
        assert_eq!(flags.bits(), (1 << 1) | (1 << 10));

        let decoded = SurfaceFlags::from_bits(flags.bits());
        assert!(decoded.depth() && decoded.qb_stereo());
        assert!(!decoded.stencil() && !decoded.display());
    }

    #[test]
    fn resource_type_decoding() {
        assert_eq!(ResourceType::from_u32(2), Some(ResourceType::Tex3d));
        assert_eq!(ResourceType::from_u32(3), None);
        assert_eq!(ResourceType::default(), ResourceType::Tex2d);
    }
}
