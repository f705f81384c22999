use gpu_addrlib_api::{AddrError, SwizzleMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Addr(#[from] AddrError),
    #[error("{mode} has no equation for {bpp} bpp with {samples} samples")]
    NoEquation {
        mode: SwizzleMode,
        bpp: u32,
        samples: u32,
    },
}
