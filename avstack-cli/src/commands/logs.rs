// SPDX-License-Identifier: Apache-2.0

//! `avstack logs` - stream aggregated service logs until interrupted.

use avstack_core::{Clock, Deployment, HealthProbe, Orchestrator, StackResult};

use crate::output;

pub async fn execute<O, P, C>(deployment: &Deployment<O, P, C>) -> StackResult<()>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    output::step("Following service logs (Ctrl+C to stop)");
    deployment.follow_logs()
}
