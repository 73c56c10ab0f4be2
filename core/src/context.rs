//! context.rs
//! Per-operation state shared by every stage driver.
//!
//! Summary: chunk size plus the cancellation token of the operation in flight.
//! Drivers call [`StageContext::checkpoint`] at every chunk boundary, which is the
//! single place where cancellation is observed and the task yields to the runtime.

use tokio_util::sync::CancellationToken;

use crate::constants::DEFAULT_BUFFER_SIZE_KB;
use crate::types::StoreError;

/// Stage-local progress sink. Receives fractions in [0, 1].
pub type ProgressFn<'a> = dyn FnMut(f32) + Send + 'a;

#[derive(Clone, Debug)]
pub struct StageContext {
    /// Chunk size in bytes.
    pub buffer_size: usize,
    pub token: CancellationToken,
}

impl StageContext {
    pub fn new(buffer_size: usize, token: CancellationToken) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
            token,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail with `Cancelled` if the token fired, otherwise yield once.
    pub async fn checkpoint(&self) -> Result<(), StoreError> {
        if self.token.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        tokio::task::yield_now().await;
        if self.token.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        Ok(())
    }
}

impl Default for StageContext {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE_KB * 1024, CancellationToken::new())
    }
}
