// SPDX-License-Identifier: Apache-2.0

//! `avstack restart` - stop, pause briefly, then run the full start
//! sequence. A failed stop does not block the start half; there is no
//! rollback for partial failure.

use avstack_core::{Clock, Deployment, HealthProbe, Orchestrator, StackResult};

use crate::output;

pub async fn execute<O, P, C>(deployment: &Deployment<O, P, C>) -> StackResult<()>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    output::step("Stopping services");
    match deployment.stop() {
        Ok(()) => output::ok("Stack stopped"),
        Err(e) => {
            tracing::warn!(error = %e, "Stop failed during restart");
            output::warn(&format!("Stop failed: {} - continuing with start", e));
        }
    }

    deployment.pause().await;

    super::start::execute(deployment).await
}
