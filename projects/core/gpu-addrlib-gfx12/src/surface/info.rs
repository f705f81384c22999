use crate::block::MAX_MIP_LEVELS;
use crate::gfx12_lib::Gfx12Lib;
use crate::mip::{compute_mip_chain, mip_extent, MipInfo};
use crate::reference::{self, AddrParams};
use crate::surface::swizzle_modes::{validate_non_sw_mode_params, PossibleSwizzleModesInput};
use crate::swizzle_mode::SwizzleMode;
use gpu_addrlib_common::equation::{Channel, INVALID_EQUATION_INDEX};
use gpu_addrlib_common::format::ElemFormat;
use gpu_addrlib_common::math::{is_pow2, log2, pow_two_align, shift_ceil};
use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
use gpu_addrlib_common::AddrError;
use thiserror::Error;

/// Largest width or height the graphics engine addresses.
pub const MAX_IMAGE_DIM: u32 = 16384;

/// Description of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceInfoInput {
    /// Usage flags.
    pub flags: SurfaceFlags,
    /// Tiling scheme.
    pub swizzle_mode: SwizzleMode,
    /// Dimensionality.
    pub resource_type: ResourceType,
    /// Element format. When set, `bpp`, `width` and `height` are derived
    /// from it and given in texels.
    pub format: Option<ElemFormat>,
    /// Bits per element.
    pub bpp: u32,
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Array slices, or depth of a volume.
    pub num_slices: u32,
    /// Number of mip levels.
    pub num_mip_levels: u32,
    /// MSAA sample count.
    pub num_samples: u32,
    /// Caller chosen pitch in elements, honoured for single mip linear
    /// surfaces. Zero to let the library choose.
    pub pitch_in_element: u32,
    /// Caller chosen slice size in bytes, honoured for single mip linear
    /// surfaces. Zero to let the library choose.
    pub slice_align: u32,
}

impl SurfaceInfoInput {
    /// Log2 of the element size in bytes.
    #[inline]
    pub fn elem_log2(&self) -> u32 {
        log2(self.bpp >> 3)
    }

    /// Log2 of the sample count, as used to pick blocks and equations.
    ///
    /// Only 2D modes are multisampled.
    #[inline]
    pub fn samples_log2(&self) -> u32 {
        if self.swizzle_mode.is_2d() {
            log2(self.num_samples)
        } else {
            0
        }
    }

    /// Volume texture.
    #[inline]
    pub fn is_tex3d(&self) -> bool {
        self.resource_type == ResourceType::Tex3d
    }

    /// Whether `pitch_in_element` applies.
    #[inline]
    pub fn use_custom_pitch(&self) -> bool {
        self.num_mip_levels <= 1 && self.swizzle_mode.is_linear() && self.pitch_in_element > 0
    }

    /// Whether `slice_align` applies.
    #[inline]
    pub fn use_custom_height(&self) -> bool {
        self.num_mip_levels <= 1 && self.swizzle_mode.is_linear() && self.slice_align > 0
    }

    /// Whether the trailing padding of a linear surface can be dropped.
    ///
    /// Holds for single slice linear surfaces that are not volumes, where
    /// nothing is laid out after the image data.
    #[inline]
    pub fn can_trim_linear_padding(&self) -> bool {
        !self.is_tex3d() && self.num_slices <= 1 && self.swizzle_mode.is_linear()
    }

    /// Extent of mip 0. Slices count as depth for volumes only.
    #[inline]
    pub fn base_mip_extents(&self) -> Extent3d {
        Extent3d::new(
            self.width,
            self.height,
            if self.is_tex3d() { self.num_slices } else { 1 },
        )
    }
}

/// Quad buffer stereo layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StereoInfo {
    /// Height of one eye, in elements.
    pub eye_height: u32,
    /// Byte offset of the right eye.
    pub right_offset: u32,
    /// Pipe/bank xor of the right eye.
    pub right_swizzle: u32,
}

/// Layout of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceInfoOutput {
    /// Bits per element.
    pub bpp: u32,
    /// Row pitch of mip 0, in elements.
    pub pitch: u32,
    /// Pitch of mip 0 used for slice sizing.
    pub pitch_for_slice: u32,
    /// Height of mip 0, in elements.
    pub height: u32,
    /// Pitch in pixels of the original format.
    pub pixel_pitch: u32,
    /// Height in pixels of the original format.
    pub pixel_height: u32,
    /// Bits per pixel of the original format.
    pub pixel_bits: u32,
    /// Slice count, aligned to the block depth.
    pub num_slices: u32,
    /// Bytes of one slice of the whole mip chain.
    pub slice_size: u64,
    /// Bytes of one slice when slices are packed without trailing padding.
    pub slice_size_dense_packed: u64,
    /// Bytes of the surface.
    pub surf_size: u64,
    /// Required base address alignment.
    pub base_align: u32,
    /// Block extent in elements.
    pub block_extent: Extent3d,
    /// First mip in the tail, or the mip count when there is no tail.
    pub first_mip_id_in_tail: u32,
    /// Whether the whole chain lives in the tail.
    pub mip_chain_in_tail: bool,
    /// Pitch of the mip chain.
    pub mip_chain_pitch: u32,
    /// Height of the mip chain.
    pub mip_chain_height: u32,
    /// Slices of the mip chain.
    pub mip_chain_slice: u32,
    /// Index of the address equation, or
    /// [`INVALID_EQUATION_INDEX`] for linear surfaces.
    pub equation_index: u32,
    /// Number of valid entries of `mip_info`.
    pub num_mip_levels: u32,
    /// Per mip layout.
    pub mip_info: [MipInfo; MAX_MIP_LEVELS],
    /// Stereo layout, for quad buffer stereo surfaces.
    pub stereo: StereoInfo,
}

impl SurfaceInfoOutput {
    /// Layout of every mip of the surface.
    #[inline]
    pub fn mips(&self) -> &[MipInfo] {
        &self.mip_info[..self.num_mip_levels as usize]
    }
}

impl Gfx12Lib {
    /// Computes the layout of a surface.
    ///
    /// Zero dimensions, mip counts and sample counts are treated as one.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] for element sizes, resource types, flags
    /// or swizzle modes that cannot be combined, and for custom pitches or
    /// slice sizes the hardware cannot honour.
    pub fn compute_surface_info(
        &self,
        input: &SurfaceInfoInput,
    ) -> Result<SurfaceInfoOutput, AddrError> {
        let mut local = *input;
        local.width = local.width.max(1);
        local.height = local.height.max(1);
        local.num_mip_levels = local.num_mip_levels.max(1);
        local.num_slices = local.num_slices.max(1);
        local.num_samples = local.num_samples.max(1);

        if let Some(format) = local.format {
            let (bpp, width, height) = format.adjust_surface(local.width, local.height);
            local.bpp = bpp;
            local.width = width.max(1);
            local.height = height.max(1);
        }
        if local.bpp == 0 {
            return Err(AddrError::InvalidParams("bits per element must not be zero"));
        }

        validate_non_sw_mode_params(&PossibleSwizzleModesInput::from(&local))?;
        validate_sw_mode_params(&local)?;

        let mut out = self.compute_surface_info_unchecked(&local)?;
        out.bpp = local.bpp;
        out.pixel_bits = local.bpp;
        out.pixel_pitch = out.pitch;
        out.pixel_height = out.height;
        for mip in out.mip_info.iter_mut().take(local.num_mip_levels as usize) {
            mip.pixel_pitch = mip.pitch;
            mip.pixel_height = mip.height;
        }

        if let Some(format) = local.format {
            let (bits, pitch, height) = format.restore_surface(out.bpp, out.pixel_pitch, out.pixel_height);
            out.pixel_bits = bits;
            out.pixel_pitch = pitch;
            out.pixel_height = height;

            if local.num_mip_levels > 1 {
                for mip in out.mip_info.iter_mut().take(local.num_mip_levels as usize) {
                    let (_, pitch, height) = format.restore_surface(out.bpp, mip.pitch, mip.height);
                    mip.pixel_pitch = pitch;
                    mip.pixel_height = height;
                }
            }

            if local.flags.qb_stereo() {
                apply_qb_stereo(&mut out);
            }
        }

        out.equation_index = self.equation_index(
            local.swizzle_mode,
            local.samples_log2(),
            local.elem_log2(),
        );
        Ok(out)
    }

    /// Layout of an already validated and normalised surface.
    pub(crate) fn compute_surface_info_unchecked(
        &self,
        input: &SurfaceInfoInput,
    ) -> Result<SurfaceInfoOutput, AddrError> {
        let mode = input.swizzle_mode;
        let mut out = SurfaceInfoOutput {
            block_extent: self.block_extent(mode, input.samples_log2(), input.elem_log2()),
            num_mip_levels: input.num_mip_levels,
            equation_index: INVALID_EQUATION_INDEX,
            ..Default::default()
        };

        self.apply_customized_pitch_height(input, &mut out)?;

        out.num_slices = pow_two_align(input.num_slices, out.block_extent.depth);
        out.base_align = mode.block_size(false);
        compute_mip_chain(input, &mut out);
        out.mip_chain_pitch = out.pitch;
        out.mip_chain_height = out.height;
        out.mip_chain_slice = out.num_slices;

        if cfg!(debug_assertions) {
            sanity_check_surf_size(input, &out);
        }
        debug_assert_eq!(
            (out.slice_size * out.block_extent.depth as u64)
                % mode.block_size(input.can_trim_linear_padding()) as u64,
            0
        );
        Ok(out)
    }

    /// Derives pitch and height of mip 0, honouring caller chosen values.
    fn apply_customized_pitch_height(
        &self,
        input: &SurfaceInfoInput,
        out: &mut SurfaceInfoOutput,
    ) -> Result<(), AddrError> {
        let mode = input.swizzle_mode;
        let elem_bytes = input.bpp >> 3;
        let mut pitch_align = out.block_extent.width;
        let mut slice_pitch_align = out.block_extent.width;
        if mode.is_linear() {
            pitch_align = mode.block_size(true) / elem_bytes;
            slice_pitch_align = mode.block_size(input.can_trim_linear_padding()) / elem_bytes;
        }

        out.pitch = pow_two_align(input.width, pitch_align);
        out.pitch_for_slice = pow_two_align(input.width, slice_pitch_align);

        let mut height_align = out.block_extent.height;
        if input.flags.qb_stereo() {
            let (align, right_xor) = self.compute_stereo_info(input, height_align)?;
            height_align = align;
            out.stereo.right_swizzle = right_xor;
        }
        out.height = pow_two_align(input.height, height_align);

        if input.use_custom_pitch() {
            if input.pitch_in_element % pitch_align != 0 {
                self.sink().warn(format_args!(
                    "pitch {} is not a multiple of the {} element alignment",
                    input.pitch_in_element, pitch_align
                ));
                return Err(AddrError::InvalidParams("custom pitch is misaligned"));
            }
            if input.pitch_in_element < out.pitch {
                self.sink().warn(format_args!(
                    "pitch {} is below the minimum of {} elements",
                    input.pitch_in_element, out.pitch
                ));
                return Err(AddrError::InvalidParams("custom pitch is too small"));
            }
            out.pitch = input.pitch_in_element;
            out.pitch_for_slice = pow_two_align(input.pitch_in_element, slice_pitch_align);
        }

        if input.use_custom_height() {
            // A custom slice size must be a whole number of slice pitches
            // once there is more than one slice.
            let custom_height = input.slice_align / elem_bytes / out.pitch_for_slice;
            if input.num_slices > 1
                && custom_height * elem_bytes * out.pitch_for_slice != input.slice_align
            {
                return Err(AddrError::InvalidParams(
                    "slice alignment is not a multiple of the slice pitch",
                ));
            }
            if input.num_slices > 1 && out.height != custom_height {
                return Err(AddrError::InvalidParams(
                    "slice alignment does not match the surface height",
                ));
            }
            if input.height as u64 * elem_bytes as u64 * out.pitch as u64 > input.slice_align as u64 {
                return Err(AddrError::InvalidParams(
                    "slice alignment is too small for the surface",
                ));
            }
            out.height = out.height.max(custom_height);
        }

        Ok(())
    }

    /// Height alignment and right eye pipe/bank xor of a stereo surface.
    ///
    /// The height is aligned so that the right eye starts at the highest y
    /// bit of the equation above the pipe interleave. Returns
    /// `(height_align, right_xor)`.
    fn compute_stereo_info(
        &self,
        input: &SurfaceInfoInput,
        height_align: u32,
    ) -> Result<(u32, u32), AddrError> {
        let index = self.equation_index(input.swizzle_mode, log2(input.num_samples), input.elem_log2());
        let eq = self
            .equation(index)
            .ok_or(AddrError::InvalidParams("stereo surfaces need a tiled swizzle mode"))?;

        let range = self.pipe_interleave_log2() as usize..input.swizzle_mode.block_size_log2(false) as usize;
        let y_max = eq.addr()[range.clone()]
            .iter()
            .filter(|bit| bit.valid() && bit.channel() == Channel::Y)
            .map(|bit| bit.index() as u32)
            .max()
            .unwrap_or(0);
        let y_pos_mask = eq.addr()[range.clone()]
            .iter()
            .enumerate()
            .filter(|(_, bit)| bit.valid() && bit.channel() == Channel::Y && bit.index() as u32 == y_max)
            .fold(0u32, |mask, (i, _)| mask | 1 << (i + range.start));

        let additional_align = 1 << y_max;
        if additional_align < height_align {
            return Ok((height_align, 0));
        }

        let aligned_height = pow_two_align(input.height, additional_align);
        let right_xor = if (aligned_height >> y_max) & 1 != 0 {
            y_pos_mask >> self.pipe_interleave_log2()
        } else {
            0
        };
        Ok((additional_align, right_xor))
    }
}

/// Stacks the right eye below the left one.
fn apply_qb_stereo(out: &mut SurfaceInfoOutput) {
    debug_assert_eq!(out.surf_size % out.base_align as u64, 0);
    out.stereo.eye_height = out.height;
    out.stereo.right_offset = out.surf_size as u32;
    out.height <<= 1;
    out.pixel_height <<= 1;
    out.surf_size <<= 1;
    out.slice_size <<= 1;
}

/// Checks that the swizzle mode suits the resource.
pub(crate) fn validate_sw_mode_params(input: &SurfaceInfoInput) -> Result<(), AddrError> {
    let mode = input.swizzle_mode;
    if !is_pow2(input.bpp) {
        return Err(AddrError::InvalidParams("bits per element must be a power of two"));
    }
    if input.bpp < 8 || input.bpp > 128 {
        return Err(AddrError::InvalidParams("element size must be 8 to 128 bits"));
    }
    if !is_pow2(input.num_samples) {
        return Err(AddrError::InvalidParams("sample count must be a power of two"));
    }
    if input.num_mip_levels as usize > MAX_MIP_LEVELS {
        return Err(AddrError::InvalidParams("too many mip levels"));
    }

    match input.resource_type {
        ResourceType::Tex1d if !mode.is_linear() => {
            Err(AddrError::InvalidParams("1D resources must be linear"))
        }
        ResourceType::Tex3d if mode.is_256b() => {
            Err(AddrError::InvalidParams("3D resources cannot use 256B blocks"))
        }
        ResourceType::Tex1d | ResourceType::Tex2d if mode.is_3d() => {
            Err(AddrError::InvalidParams("3D swizzle modes need a 3D resource"))
        }
        _ if input.num_samples > 1 && !mode.is_2d() => {
            Err(AddrError::InvalidParams("MSAA surfaces need a 2D swizzle mode"))
        }
        _ if input.flags.display() && mode.is_3d() => {
            Err(AddrError::InvalidParams("displayable surfaces cannot use 3D swizzle modes"))
        }
        _ => Ok(()),
    }
}

/// Disagreement between the surface layout and the reference model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum LayoutMismatch {
    #[error("first mip in the tail is {driver}, the reference model says {model}")]
    FirstMipInTail { driver: u32, model: u32 },
    #[error("a hardware slice of the chain takes {driver} bytes, the reference model says {model}")]
    SliceSize { driver: u64, model: u64 },
}

/// Cross checks the layout against the reference model, asserting that
/// both agree.
///
/// The model rounds mip extents up while the driver rounds them down, so
/// only surfaces whose mips halve without remainder are compared.
fn sanity_check_surf_size(input: &SurfaceInfoInput, out: &SurfaceInfoOutput) {
    if input.width > MAX_IMAGE_DIM
        || input.height > MAX_IMAGE_DIM
        || input.num_mip_levels as usize > MAX_MIP_LEVELS
        || input.use_custom_pitch()
        || input.use_custom_height()
        // Padded to a multiple of the slice granularity, which the model knows nothing of.
        || input.flags.dense_slice_exact()
        // Hierarchical Z surfaces keep the mip count of a larger parent.
        || (input.flags.hi_z_hi_s() && input.num_mip_levels > 1)
        || !mips_halve_exactly(input)
    {
        return;
    }

    debug_assert_eq!(check_surf_size(input, out), Ok(()));
}

/// Whether every mip extent is the same rounded up as rounded down.
fn mips_halve_exactly(input: &SurfaceInfoInput) -> bool {
    let base = input.base_mip_extents();
    (0..input.num_mip_levels).all(|mip| {
        let floor = mip_extent(base, mip);
        floor.width == shift_ceil(input.width, mip).max(1)
            && floor.height == shift_ceil(input.height, mip).max(1)
    })
}

/// Compares the tail placement and the size of one hardware slice with
/// the reference model.
pub(crate) fn check_surf_size(
    input: &SurfaceInfoInput,
    out: &SurfaceInfoOutput,
) -> Result<(), LayoutMismatch> {
    let mode = input.swizzle_mode;
    let params = AddrParams::new(
        mode,
        input.elem_log2(),
        input.samples_log2(),
        input.width,
        input.height,
        input.num_mip_levels,
    );
    let model = reference::mip_offset(&params, 0);

    // The model also counts the last mip of linear and 256B chains, or of a
    // single mip, as a tail of one block. Only the size is comparable there.
    if mode.supports_mip_tail() && input.num_mip_levels > 1 {
        let model_first = (model.first_mip_in_tail.max(0) as u32).min(input.num_mip_levels);
        if model_first != out.first_mip_id_in_tail {
            return Err(LayoutMismatch::FirstMipInTail {
                driver: out.first_mip_id_in_tail,
                model: model_first,
            });
        }
    }

    let driver = out.slice_size * out.block_extent.depth as u64;
    let model = model.data_chain_size as u64;
    let agrees = if input.can_trim_linear_padding() {
        driver <= model
    } else {
        driver == model
    };
    if !agrees {
        return Err(LayoutMismatch::SliceSize { driver, model });
    }
    Ok(())
}
