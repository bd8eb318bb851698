// SPDX-License-Identifier: Apache-2.0

//! `avstack health` - probe every service endpoint.
//!
//! Best-effort diagnostic: endpoints are probed independently, the access
//! URLs are printed regardless of outcome, and the command exits zero even
//! when services are down.

use avstack_core::{Clock, Deployment, HealthProbe, Orchestrator, StackResult};

use crate::output;

pub async fn execute<O, P, C>(deployment: &Deployment<O, P, C>) -> StackResult<()>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    output::step("Checking service health");

    let report = deployment.check_health().await;
    output::health_summary(&report);
    output::access_urls(deployment.config());

    Ok(())
}
