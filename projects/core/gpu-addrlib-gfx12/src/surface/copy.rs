use crate::gfx12_lib::Gfx12Lib;
use crate::mip::MipInfo;
use crate::surface::{SurfaceInfoInput, SurfaceInfoOutput};
use crate::swizzle_mode::SwizzleMode;
use gpu_addrlib_common::equation::Equation;
use gpu_addrlib_common::format::ElemFormat;
use gpu_addrlib_common::math::{log2, pow_two_align_down};
use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
use gpu_addrlib_common::AddrError;
use alloc::vec::Vec;
use core::ops::Range;
use likely_stable::unlikely;

/// Surface side of a copy between linear memory and a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopySurfaceInput {
    /// Tiling scheme.
    pub swizzle_mode: SwizzleMode,
    /// Usage flags.
    pub flags: SurfaceFlags,
    /// Dimensionality.
    pub resource_type: ResourceType,
    /// Element format, if the dimensions are given in texels.
    pub format: Option<ElemFormat>,
    /// Bits per element.
    pub bpp: u32,
    /// Width, height and slice count of mip 0.
    pub unaligned_dims: Extent3d,
    /// Number of mip levels.
    pub num_mip_levels: u32,
    /// MSAA sample count.
    pub num_samples: u32,
    /// Caller chosen pitch of a single mip linear surface, in elements.
    pub pitch_in_element: u32,
    /// Pipe/bank xor of the surface.
    pub pb_xor: u32,
    /// The surface buffer holds only the sub-resource every region
    /// targets, rather than the whole surface.
    pub single_subres: bool,
}

impl CopySurfaceInput {
    fn surface_info_input(&self) -> SurfaceInfoInput {
        let num_mip_levels = self.num_mip_levels.max(1);
        SurfaceInfoInput {
            flags: self.flags,
            swizzle_mode: self.swizzle_mode,
            resource_type: self.resource_type,
            format: self.format,
            bpp: self.bpp,
            width: self.unaligned_dims.width.max(1),
            height: self.unaligned_dims.height.max(1),
            num_slices: self.unaligned_dims.depth.max(1),
            num_mip_levels,
            num_samples: self.num_samples.max(1),
            pitch_in_element: if num_mip_levels <= 1 && self.swizzle_mode.is_linear() {
                self.pitch_in_element
            } else {
                0
            },
            slice_align: 0,
        }
    }
}

/// One box copied between linear memory and a surface.
#[derive(Debug)]
pub struct CopyRegion<B> {
    /// X of the box in the mip, in elements.
    pub x: u32,
    /// Y of the box in the mip, in elements.
    pub y: u32,
    /// First slice of the box.
    pub slice: u32,
    /// Mip level.
    pub mip: u32,
    /// Size of the box in elements and slices.
    pub extent: Extent3d,
    /// Bytes between rows in `mem`.
    pub mem_row_pitch: u64,
    /// Bytes between slices in `mem`.
    pub mem_slice_pitch: u64,
    /// Linear memory holding the box.
    pub mem: B,
}

/// A run of bytes to move: offset in the surface, offset in the region's
/// memory and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    surface: u64,
    mem: u64,
    len: u64,
}

impl Gfx12Lib {
    /// Copies boxes of linear memory into a mapped surface.
    ///
    /// Every region is checked against both buffers before any byte is
    /// written.
    ///
    /// # Errors
    ///
    /// - [`AddrError::InvalidParams`] when `regions` is empty, when a single
    ///   sub-resource copy touches several sub-resources, when a region
    ///   reaches past either buffer, or when the surface is invalid.
    /// - [`AddrError::NotImplemented`] for multisampled tiled surfaces.
    pub fn copy_mem_to_surface(
        &self,
        input: &CopySurfaceInput,
        regions: &[CopyRegion<&[u8]>],
        surface: &mut [u8],
    ) -> Result<(), AddrError> {
        let boxes: Vec<_> = regions.iter().map(CopyBox::from).collect();
        self.walk_copy(input, &boxes, surface.len(), &mut |index, span| {
            let src = byte_range(regions[index].mem, span.mem, span.len)?;
            let dst = byte_range_mut(&mut *surface, span.surface, span.len)?;
            dst.copy_from_slice(src);
            Ok(())
        })
    }

    /// Copies boxes of a mapped surface into linear memory.
    ///
    /// # Errors
    ///
    /// As [`Gfx12Lib::copy_mem_to_surface`].
    pub fn copy_surface_to_mem(
        &self,
        input: &CopySurfaceInput,
        regions: &mut [CopyRegion<&mut [u8]>],
        surface: &[u8],
    ) -> Result<(), AddrError> {
        let boxes: Vec<_> = regions.iter().map(CopyBox::from).collect();
        self.walk_copy(input, &boxes, surface.len(), &mut |index, span| {
            let src = byte_range(surface, span.surface, span.len)?;
            let dst = byte_range_mut(&mut *regions[index].mem, span.mem, span.len)?;
            dst.copy_from_slice(src);
            Ok(())
        })
    }

    /// Validates a copy, then feeds every byte run it moves to `copy`.
    fn walk_copy(
        &self,
        input: &CopySurfaceInput,
        boxes: &[CopyBox],
        surface_len: usize,
        copy: &mut SpanSink<'_>,
    ) -> Result<(), AddrError> {
        let first = boxes
            .first()
            .ok_or(AddrError::InvalidParams("no copy regions"))?;
        if input.single_subres
            && boxes
                .iter()
                .any(|b| b.extent.depth != 1 || b.slice != first.slice || b.mip != first.mip)
        {
            return Err(AddrError::InvalidParams(
                "single sub-resource copies cannot span sub-resources",
            ));
        }

        let info_in = input.surface_info_input();
        let is_linear = input.swizzle_mode.is_linear();
        if info_in.num_samples > 1 {
            return Err(if is_linear {
                AddrError::InvalidParams("linear surfaces cannot be multisampled")
            } else {
                AddrError::NotImplemented("copies of multisampled surfaces")
            });
        }
        let info = self.compute_surface_info(&info_in)?;
        let eq = if is_linear {
            None
        } else {
            let index = self.equation_index(input.swizzle_mode, 0, log2(info.bpp >> 3));
            Some(
                self.equation(index)
                    .ok_or(AddrError::InvalidParams("no address equation for this surface"))?,
            )
        };

        let mut check = |index: usize, span: Span| -> Result<(), AddrError> {
            span_bounds(span.surface, span.len, surface_len)?;
            span_bounds(span.mem, span.len, boxes[index].mem_len)?;
            Ok(())
        };
        self.walk_spans(input, &info, eq, boxes, &mut check)?;
        self.walk_spans(input, &info, eq, boxes, copy)
    }

    fn walk_spans(
        &self,
        input: &CopySurfaceInput,
        info: &SurfaceInfoOutput,
        eq: Option<&Equation>,
        boxes: &[CopyBox],
        copy: &mut SpanSink<'_>,
    ) -> Result<(), AddrError> {
        match eq {
            Some(eq) => self.walk_tiled(input, info, eq, boxes, copy),
            None => walk_linear(input, info, boxes, copy),
        }
    }

    fn walk_tiled(
        &self,
        input: &CopySurfaceInput,
        info: &SurfaceInfoOutput,
        eq: &Equation,
        boxes: &[CopyBox],
        copy: &mut SpanSink<'_>,
    ) -> Result<(), AddrError> {
        let block = info.block_extent;
        let block_size_log2 = input.swizzle_mode.block_size_log2(false);
        let elem_log2 = log2(info.bpp >> 3);
        let bytes_per_elem = (info.bpp >> 3) as u64;
        let xor = input.pb_xor << self.pipe_interleave_log2();

        for (index, b) in boxes.iter().enumerate() {
            let mip = mip_of(info, b.mip)?;
            let mip_offset = if input.single_subres { 0 } else { mip.macro_block_offset };
            let pitch_in_blocks = (mip.pitch / block.width) as u64;
            let x_start = b.x.checked_add(mip.mip_tail_coord_x).ok_or(OUTSIDE_SURFACE)?;
            let y_start = b.y.checked_add(mip.mip_tail_coord_y).ok_or(OUTSIDE_SURFACE)?;
            let slice_start = b.slice.checked_add(mip.mip_tail_coord_z).ok_or(OUTSIDE_SURFACE)?;
            // The equation takes x in bytes.
            x_start
                .checked_add(b.extent.width)
                .filter(|&end| end <= u32::MAX >> elem_log2)
                .ok_or(OUTSIDE_SURFACE)?;
            y_start.checked_add(b.extent.height).ok_or(OUTSIDE_SURFACE)?;
            slice_start.checked_add(b.extent.depth).ok_or(OUTSIDE_SURFACE)?;

            for i in 0..b.extent.depth {
                let slice = slice_start + i;
                // Offsets are taken from the first slice of the block holding
                // this slice; the equation places the slice inside the block.
                let img_offset = (pow_two_align_down(slice, block.depth) as u64)
                    .checked_mul(info.slice_size)
                    .and_then(|offset| offset.checked_add(mip_offset))
                    .ok_or(OUTSIDE_SURFACE)?;
                let mem_offset = i as u64 * b.mem_slice_pitch;

                for row in 0..b.extent.height {
                    let y = y_start + row;
                    for col in 0..b.extent.width {
                        let x = x_start + col;
                        let in_block = eq.compute_offset(x << elem_log2, y, slice, 0) ^ xor;
                        let surface = ((y / block.height) as u64)
                            .checked_mul(pitch_in_blocks)
                            .and_then(|idx| idx.checked_add((x / block.width) as u64))
                            .and_then(|idx| idx.checked_mul(1 << block_size_log2))
                            .and_then(|offset| offset.checked_add(img_offset))
                            .and_then(|offset| offset.checked_add(in_block as u64))
                            .ok_or(OUTSIDE_SURFACE)?;
                        copy(
                            index,
                            Span {
                                surface,
                                mem: mem_offset + row as u64 * b.mem_row_pitch + col as u64 * bytes_per_elem,
                                len: bytes_per_elem,
                            },
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

const OUTSIDE_SURFACE: AddrError = AddrError::InvalidParams("copy region lies outside the surface");

/// Receiver of the byte runs of a copy, told which region each run
/// belongs to.
type SpanSink<'a> = dyn FnMut(usize, Span) -> Result<(), AddrError> + 'a;

/// Geometry of a [`CopyRegion`] and the size of its buffer.
#[derive(Debug, Clone, Copy)]
struct CopyBox {
    x: u32,
    y: u32,
    slice: u32,
    mip: u32,
    extent: Extent3d,
    mem_row_pitch: u64,
    mem_slice_pitch: u64,
    mem_len: usize,
}

impl<B: AsRef<[u8]>> From<&CopyRegion<B>> for CopyBox {
    fn from(region: &CopyRegion<B>) -> Self {
        Self {
            x: region.x,
            y: region.y,
            slice: region.slice,
            mip: region.mip,
            extent: region.extent,
            mem_row_pitch: region.mem_row_pitch,
            mem_slice_pitch: region.mem_slice_pitch,
            mem_len: region.mem.as_ref().len(),
        }
    }
}

fn walk_linear(
    input: &CopySurfaceInput,
    info: &SurfaceInfoOutput,
    boxes: &[CopyBox],
    copy: &mut SpanSink<'_>,
) -> Result<(), AddrError> {
    let bytes_per_elem = (info.bpp >> 3) as u64;
    for (index, b) in boxes.iter().enumerate() {
        let mip = mip_of(info, b.mip)?;
        let mip_base = if input.single_subres { 0 } else { mip.offset };
        let line_size = bytes_per_elem * b.extent.width as u64;
        let line_pitch = bytes_per_elem * mip.pitch as u64;

        for i in 0..b.extent.depth {
            let mut img_offset = info
                .slice_size
                .checked_mul(b.slice as u64 + i as u64)
                .and_then(|offset| offset.checked_add(mip_base + line_pitch * b.y as u64))
                .and_then(|offset| offset.checked_add(b.x as u64 * bytes_per_elem))
                .ok_or(OUTSIDE_SURFACE)?;
            let mut mem_offset = i as u64 * b.mem_slice_pitch;
            for _ in 0..b.extent.height {
                copy(
                    index,
                    Span {
                        surface: img_offset,
                        mem: mem_offset,
                        len: line_size,
                    },
                )?;
                img_offset += line_pitch;
                mem_offset += b.mem_row_pitch;
            }
        }
    }
    Ok(())
}

fn mip_of(info: &SurfaceInfoOutput, mip: u32) -> Result<&MipInfo, AddrError> {
    info.mips()
        .get(mip as usize)
        .ok_or(AddrError::InvalidParams("mip out of range"))
}

/// Byte range of a run, if it fits a buffer of `buf_len` bytes.
fn span_bounds(offset: u64, len: u64, buf_len: usize) -> Result<Range<usize>, AddrError> {
    let exceeds = AddrError::InvalidParams("copy region exceeds buffer");
    let start = usize::try_from(offset).map_err(|_| exceeds)?;
    let len = usize::try_from(len).map_err(|_| exceeds)?;
    let end = start.checked_add(len).ok_or(exceeds)?;
    if unlikely(end > buf_len) {
        return Err(exceeds);
    }
    Ok(start..end)
}

fn byte_range(buf: &[u8], offset: u64, len: u64) -> Result<&[u8], AddrError> {
    Ok(&buf[span_bounds(offset, len, buf.len())?])
}

fn byte_range_mut(buf: &mut [u8], offset: u64, len: u64) -> Result<&mut [u8], AddrError> {
    let range = span_bounds(offset, len, buf.len())?;
    Ok(&mut buf[range])
}
