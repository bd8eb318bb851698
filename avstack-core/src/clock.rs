// SPDX-License-Identifier: Apache-2.0

//! Injectable sleep abstraction.
//!
//! The start sequence waits a fixed delay after `up` before probing health;
//! tests substitute a fake clock that records requested durations instead
//! of actually waiting.

use std::future::Future;
use std::time::Duration;

/// Capability: suspend the current task for a duration.
pub trait Clock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production clock over the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
