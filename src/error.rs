use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalFilterError {
    #[error("failed to allocate chroma scratch of {len} samples")]
    ScratchAllocation {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}
