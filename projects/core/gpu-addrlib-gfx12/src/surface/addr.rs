use crate::gfx12_lib::Gfx12Lib;
use crate::mip::{mip_extent, MipInfo};
use crate::surface::{SurfaceInfoInput, SurfaceInfoOutput};
use crate::swizzle_mode::SwizzleMode;
use gpu_addrlib_common::coord::{CoordEq, Dim};
use gpu_addrlib_common::math::log2;
use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
use gpu_addrlib_common::AddrError;

/// Size of a partially resident texture tile.
const PRT_TILE_SIZE: u64 = 64 * 1024;

/// Surface description shared by the addressing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddrSurface {
    /// Tiling scheme.
    pub swizzle_mode: SwizzleMode,
    /// Usage flags.
    pub flags: SurfaceFlags,
    /// Dimensionality.
    pub resource_type: ResourceType,
    /// Bits per element.
    pub bpp: u32,
    /// Width, height and slice count of mip 0, in elements.
    pub unaligned_dims: Extent3d,
    /// Number of mip levels.
    pub num_mip_levels: u32,
    /// MSAA sample count.
    pub num_samples: u32,
    /// Caller chosen pitch of a single mip linear surface, in elements.
    pub pitch_in_element: u32,
}

impl AddrSurface {
    /// The equivalent surface info query, with zero extents counted as one.
    fn surface_info_input(&self) -> SurfaceInfoInput {
        let num_mip_levels = self.num_mip_levels.max(1);
        SurfaceInfoInput {
            flags: self.flags,
            swizzle_mode: self.swizzle_mode,
            resource_type: self.resource_type,
            format: None,
            bpp: self.bpp,
            width: self.unaligned_dims.width.max(1),
            height: self.unaligned_dims.height.max(1),
            num_slices: self.unaligned_dims.depth.max(1),
            num_mip_levels,
            num_samples: self.num_samples.max(1),
            pitch_in_element: if num_mip_levels <= 1 {
                self.pitch_in_element
            } else {
                0
            },
            slice_align: 0,
        }
    }

    fn check_bpp(&self) -> Result<(), AddrError> {
        if self.bpp < 8 || self.bpp > 128 || self.bpp % 8 != 0 {
            return Err(AddrError::InvalidParams("element size must be 8 to 128 bits"));
        }
        Ok(())
    }
}

/// Input of [`Gfx12Lib::compute_surface_addr_from_coord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddrFromCoordInput {
    /// The surface.
    pub surface: AddrSurface,
    /// X in elements, relative to the mip.
    pub x: u32,
    /// Y in elements, relative to the mip.
    pub y: u32,
    /// Array slice, or depth slice of a volume mip.
    pub slice: u32,
    /// Sample index.
    pub sample: u32,
    /// Mip level.
    pub mip: u32,
}

/// Output of [`Gfx12Lib::compute_surface_addr_from_coord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddrFromCoordOutput {
    /// Byte address relative to the surface base.
    pub addr: u64,
    /// Bit position inside the byte. Always zero, elements are whole bytes.
    pub bit_position: u32,
    /// Index of the 64KiB tile holding the element.
    pub prt_block_index: u32,
}

/// Input of [`Gfx12Lib::compute_surface_coord_from_addr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordFromAddrInput {
    /// The surface.
    pub surface: AddrSurface,
    /// Byte address relative to the surface base.
    pub addr: u64,
}

/// Output of [`Gfx12Lib::compute_surface_coord_from_addr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordFromAddrOutput {
    /// X in elements, relative to the mip.
    pub x: u32,
    /// Y in elements, relative to the mip.
    pub y: u32,
    /// Array slice, or depth slice of a volume mip.
    pub slice: u32,
    /// Sample index.
    pub sample: u32,
    /// Mip level.
    pub mip: u32,
}

impl Gfx12Lib {
    /// Byte address of an element.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] when the element size is not a whole
    /// number of bytes up to 16, when the coordinate lies outside the
    /// surface, or when the surface itself is invalid.
    pub fn compute_surface_addr_from_coord(
        &self,
        input: &AddrFromCoordInput,
    ) -> Result<AddrFromCoordOutput, AddrError> {
        let surface = &input.surface;
        surface.check_bpp()?;

        let info_in = surface.surface_info_input();
        if input.sample >= info_in.num_samples
            || input.slice >= info_in.num_slices
            || input.mip >= info_in.num_mip_levels
            || (info_in.is_tex3d() && (info_in.num_slices >> input.mip).max(1) <= input.slice)
        {
            return Err(AddrError::InvalidParams("coordinate outside the surface"));
        }

        let addr = if surface.swizzle_mode.is_linear() {
            self.addr_from_coord_linear(input, &info_in)?
        } else {
            self.addr_from_coord_tiled(input, &info_in)?
        };

        Ok(AddrFromCoordOutput {
            addr,
            bit_position: 0,
            prt_block_index: (addr / PRT_TILE_SIZE) as u32,
        })
    }

    fn addr_from_coord_linear(
        &self,
        input: &AddrFromCoordInput,
        info_in: &SurfaceInfoInput,
    ) -> Result<u64, AddrError> {
        if info_in.num_samples > 1 {
            return Err(AddrError::InvalidParams("linear surfaces cannot be multisampled"));
        }
        if info_in.resource_type == ResourceType::Tex1d && input.y != 0 {
            return Err(AddrError::InvalidParams("1D surfaces have a single row"));
        }

        let info = self.compute_surface_info(info_in)?;
        let mip = &info.mip_info[input.mip as usize];
        check_in_mip(input, mip)?;
        let bytes_per_elem = (info_in.bpp >> 3) as u64;
        Ok(info.slice_size * input.slice as u64
            + mip.offset
            + (input.y as u64 * mip.pitch as u64 + input.x as u64) * bytes_per_elem)
    }

    fn addr_from_coord_tiled(
        &self,
        input: &AddrFromCoordInput,
        info_in: &SurfaceInfoInput,
    ) -> Result<u64, AddrError> {
        let info = self.compute_surface_info(info_in)?;
        let mode = info_in.swizzle_mode;
        let elem_log2 = info_in.elem_log2();
        let eq = self
            .equation(self.equation_index(mode, log2(info_in.num_samples), elem_log2))
            .ok_or(AddrError::InvalidParams("no address equation for this surface"))?;

        let block = info.block_extent;
        let mip = &info.mip_info[input.mip as usize];
        check_in_mip(input, mip)?;

        // A volume block holds several slices, and every block-deep group of
        // slices is addressed like any other.
        let hw_slice_size = info.slice_size * block.depth as u64;
        let hw_slice = (input.slice / block.depth) as u64;

        let pitch_in_blocks = (mip.pitch / block.width) as u64;
        let blk_idx = (input.y / block.height) as u64 * pitch_in_blocks + (input.x / block.width) as u64;
        let blk_offset = eq.compute_offset(
            (input.x + mip.mip_tail_coord_x) << elem_log2,
            input.y + mip.mip_tail_coord_y,
            input.slice + mip.mip_tail_coord_z,
            input.sample,
        );

        let addr = hw_slice_size * hw_slice
            + mip.macro_block_offset
            + (blk_idx << mode.block_size_log2(false))
            + blk_offset as u64;
        debug_assert!(addr < info.surf_size);
        Ok(addr)
    }

    /// Coordinate of the element stored at a byte address.
    ///
    /// Addresses that fall into padding decode to the nearest element slot
    /// the layout would place there, which may lie outside the mip extent.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] when the element size is invalid, when
    /// the address is past the end of the surface, or when the surface
    /// itself is invalid.
    pub fn compute_surface_coord_from_addr(
        &self,
        input: &CoordFromAddrInput,
    ) -> Result<CoordFromAddrOutput, AddrError> {
        let surface = &input.surface;
        surface.check_bpp()?;

        let info_in = surface.surface_info_input();
        let info = self.compute_surface_info(&info_in)?;
        if input.addr >= info.surf_size {
            return Err(AddrError::InvalidParams("address past the end of the surface"));
        }

        if surface.swizzle_mode.is_linear() {
            coord_from_addr_linear(input.addr, &info_in, &info)
        } else {
            self.coord_from_addr_tiled(input.addr, &info_in, &info)
        }
    }

    fn coord_from_addr_tiled(
        &self,
        addr: u64,
        info_in: &SurfaceInfoInput,
        info: &SurfaceInfoOutput,
    ) -> Result<CoordFromAddrOutput, AddrError> {
        let mode = info_in.swizzle_mode;
        let elem_log2 = info_in.elem_log2();
        let eq = self
            .equation(self.equation_index(mode, log2(info_in.num_samples), elem_log2))
            .ok_or(AddrError::InvalidParams("no address equation for this surface"))?;

        let block = info.block_extent;
        let block_size_log2 = mode.block_size_log2(false);
        let hw_slice_size = info.slice_size * block.depth as u64;
        let hw_slice = (addr / hw_slice_size) as u32;
        let in_slice = addr % hw_slice_size;

        // Mips outside the tail are ordered by decreasing size, so the owner
        // is the first one starting at or below the offset.
        let first_in_tail = info.first_mip_id_in_tail;
        let mip = info.mips()[..first_in_tail as usize]
            .iter()
            .position(|m| m.macro_block_offset <= in_slice)
            .map(|m| m as u32)
            .unwrap_or(first_in_tail);
        let mip_info = info.mip_info.get(mip as usize).ok_or(AddrError::InvalidParams(
            "address does not belong to any mip",
        ))?;

        let in_mip = in_slice - mip_info.macro_block_offset;
        let blk_idx = in_mip >> block_size_log2;
        let blk_offset = in_mip & ((1u64 << block_size_log2) - 1);
        let decoded = CoordEq::from(eq).solve_addr(blk_offset, 0);
        let x_in_block = decoded[Dim::X as usize] >> elem_log2;
        let y_in_block = decoded[Dim::Y as usize];
        let z_in_block = decoded[Dim::Z as usize];
        let sample = decoded[Dim::S as usize];

        let (mip, x, y, z) = if mip >= first_in_tail {
            let tail_mip = find_tail_mip(info_in, info, x_in_block, y_in_block);
            let origin = &info.mip_info[tail_mip as usize];
            (
                tail_mip,
                x_in_block - origin.mip_tail_coord_x,
                y_in_block - origin.mip_tail_coord_y,
                z_in_block - origin.mip_tail_coord_z,
            )
        } else {
            let pitch_in_blocks = (mip_info.pitch / block.width).max(1) as u64;
            let block_x = (blk_idx % pitch_in_blocks) as u32;
            let block_y = (blk_idx / pitch_in_blocks) as u32;
            (
                mip,
                block_x * block.width + x_in_block,
                block_y * block.height + y_in_block,
                z_in_block,
            )
        };

        // Equations of volume modes only carry the slice bits inside a block.
        let z_mask = block.depth - 1;
        Ok(CoordFromAddrOutput {
            x,
            y,
            slice: hw_slice * block.depth + (z & z_mask),
            sample,
            mip,
        })
    }
}

/// Rejects coordinates past the padded extent of their mip.
fn check_in_mip(input: &AddrFromCoordInput, mip: &MipInfo) -> Result<(), AddrError> {
    if input.x >= mip.pitch || input.y >= mip.height {
        return Err(AddrError::InvalidParams("coordinate outside the surface"));
    }
    Ok(())
}

fn coord_from_addr_linear(
    addr: u64,
    info_in: &SurfaceInfoInput,
    info: &SurfaceInfoOutput,
) -> Result<CoordFromAddrOutput, AddrError> {
    let bytes_per_elem = (info_in.bpp >> 3) as u64;
    let slice = addr / info.slice_size;
    let in_slice = addr % info.slice_size;

    // Linear mips are stored smallest first.
    let mip = info
        .mips()
        .iter()
        .position(|m| m.offset <= in_slice)
        .ok_or(AddrError::InvalidParams("address does not belong to any mip"))?;
    let mip_info = &info.mip_info[mip];
    let elem = (in_slice - mip_info.offset) / bytes_per_elem;
    let pitch = mip_info.pitch as u64;

    Ok(CoordFromAddrOutput {
        x: (elem % pitch) as u32,
        y: (elem / pitch) as u32,
        slice: slice as u32,
        sample: 0,
        mip: mip as u32,
    })
}

/// Tail mip whose region of the tail block holds `(x, y)`.
fn find_tail_mip(info_in: &SurfaceInfoInput, info: &SurfaceInfoOutput, x: u32, y: u32) -> u32 {
    let base = info_in.base_mip_extents();
    (info.first_mip_id_in_tail..info_in.num_mip_levels)
        .find(|&mip| {
            let m = &info.mip_info[mip as usize];
            let extent = mip_extent(base, mip);
            x >= m.mip_tail_coord_x
                && x < m.mip_tail_coord_x + extent.width
                && y >= m.mip_tail_coord_y
                && y < m.mip_tail_coord_y + extent.height
        })
        .unwrap_or(info.first_mip_id_in_tail)
}
