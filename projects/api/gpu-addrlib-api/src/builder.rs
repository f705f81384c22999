//! Builder for address library instances.

use crate::addr_lib::AddrLib;
use alloc::boxed::Box;
use core::fmt;
use gpu_addrlib_common::AddrError;
use gpu_addrlib_common::diagnostics::{DiagnosticSink, TracingSink};

/// Hardware generation a library instance computes layouts for.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChipFamily {
    /// RDNA4 class hardware.
    #[default]
    Gfx12 = 0,
}

impl ChipFamily {
    /// Decodes a raw family value, as passed across the C interface.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Gfx12),
            _ => None,
        }
    }
}

/// Resolved configuration of a library instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibConfig {
    /// Hardware generation.
    pub chip_family: ChipFamily,
    /// Number of pipes. A power of two between 1 and 64.
    pub num_pipes: u32,
    /// Pipe interleave in bytes: 256, 512, 1024 or 2048.
    pub pipe_interleave_bytes: u32,
    /// Whether the C interface checks the `size` field of every structure.
    pub fill_size_fields: bool,
}

impl Default for LibConfig {
    fn default() -> Self {
        Self {
            chip_family: ChipFamily::Gfx12,
            num_pipes: 16,
            pipe_interleave_bytes: 256,
            fill_size_fields: false,
        }
    }
}

/// Builder for [`AddrLib`] with convenient configuration methods.
///
/// Unset values fall back to [`LibConfig::default`]. Diagnostics go to a
/// [`TracingSink`] unless another sink is given.
#[derive(Default)]
pub struct AddrLibBuilder {
    chip_family: Option<ChipFamily>,
    num_pipes: Option<u32>,
    pipe_interleave_bytes: Option<u32>,
    fill_size_fields: Option<bool>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl AddrLibBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hardware generation.
    pub fn chip_family(mut self, family: ChipFamily) -> Self {
        self.chip_family = Some(family);
        self
    }

    /// Set the number of pipes.
    pub fn num_pipes(mut self, num_pipes: u32) -> Self {
        self.num_pipes = Some(num_pipes);
        self
    }

    /// Set the pipe interleave, in bytes.
    pub fn pipe_interleave_bytes(mut self, bytes: u32) -> Self {
        self.pipe_interleave_bytes = Some(bytes);
        self
    }

    /// Set whether structure sizes are checked across the C interface.
    pub fn fill_size_fields(mut self, enabled: bool) -> Self {
        self.fill_size_fields = Some(enabled);
        self
    }

    /// Set where diagnostics are reported.
    pub fn sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The configuration [`build`](Self::build) would use.
    pub fn config(&self) -> LibConfig {
        let default = LibConfig::default();
        LibConfig {
            chip_family: self.chip_family.unwrap_or(default.chip_family),
            num_pipes: self.num_pipes.unwrap_or(default.num_pipes),
            pipe_interleave_bytes: self
                .pipe_interleave_bytes
                .unwrap_or(default.pipe_interleave_bytes),
            fill_size_fields: self.fill_size_fields.unwrap_or(default.fill_size_fields),
        }
    }

    /// Build the library using the configured values or defaults.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] when the configuration is not one the
    /// hardware supports.
    pub fn build(self) -> Result<AddrLib, AddrError> {
        let config = self.config();
        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));
        AddrLib::new(config, sink)
    }
}

impl fmt::Debug for AddrLibBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddrLibBuilder")
            .field("config", &self.config())
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn unset_values_resolve_to_defaults() {
        assert_eq!(AddrLibBuilder::new().config(), LibConfig::default());
    }

    #[test]
    fn builder() {
        let config = AddrLibBuilder::new()
            .num_pipes(64)
            .pipe_interleave_bytes(1024)
            .fill_size_fields(true)
            .config();
        assert_eq!(config.num_pipes, 64);
        assert_eq!(config.pipe_interleave_bytes, 1024);
        assert!(config.fill_size_fields);
        assert_eq!(config.chip_family, ChipFamily::Gfx12);
    }

    #[rstest]
    #[case(16, 256, true)]
    #[case(1, 2048, true)]
    #[case(3, 256, false)]
    #[case(16, 300, false)]
    fn build_validates_configuration(#[case] pipes: u32, #[case] interleave: u32, #[case] ok: bool) {
        let result = AddrLibBuilder::new()
            .num_pipes(pipes)
            .pipe_interleave_bytes(interleave)
            .sink(Box::new(NullSink))
            .build();
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn chip_family_decoding() {
        assert_eq!(ChipFamily::from_u32(0), Some(ChipFamily::Gfx12));
        assert_eq!(ChipFamily::from_u32(1), None);
    }
}
