//! Tokio Runtime Bridge
//!
//! The CLI is synchronous; the sequencer player needs tokio timers. This
//! module owns the one process-wide runtime and bridges into it.
//!
//! ## Pattern
//!
//! ```text
//! main (sync)
//!       │
//!       ▼
//! block_on(async { SequencerPlayer::spawn(..) ... })
//!       │
//!       ▼
//! tokio::Runtime (timers, player task)
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

use crate::error::Result;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = TOKIO_RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Builder::new_multi_thread()
        .enable_time()
        .thread_name("chroma-demo-rt")
        .build()?;
    Ok(TOKIO_RUNTIME.get_or_init(|| runtime))
}

/// Block on a future synchronously
///
/// **Warning**: This blocks the current thread. Use only from the CLI entry
/// point, never from inside the runtime.
pub fn block_on<F, T>(future: F) -> Result<T>
where
    F: Future<Output = T>,
{
    Ok(get_runtime()?.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_on_returns_output() {
        let value = block_on(async { 21 * 2 }).expect("runtime");
        assert_eq!(value, 42);
    }
}
