//! Async runtime helpers for blocking callers.
//!
//! Dispatch runners expose a synchronous interface but ride on an async HTTP
//! client, so they need one entry point for running futures to completion
//! that works both inside and outside an existing Tokio runtime.

use anyhow::anyhow;
use std::future::Future;
use tokio::{runtime::Handle, task};

/// Execute an async future from synchronous code.
///
/// Reuses the current runtime when one exists; otherwise spins up a
/// single-threaded runtime for the duration of the call.
pub fn block_on_future<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        task::block_in_place(|| handle.block_on(future))
    } else {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| anyhow!(error))?
            .block_on(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_future_without_ambient_runtime() {
        let result = block_on_future(async { Ok(41 + 1) }).unwrap();
        assert_eq!(result, 42);
    }
}
