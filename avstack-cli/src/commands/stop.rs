// SPDX-License-Identifier: Apache-2.0

//! `avstack stop` - tear the stack down. No preconditions.

use avstack_core::{Clock, Deployment, HealthProbe, Orchestrator, StackResult};

use crate::output;

pub async fn execute<O, P, C>(deployment: &Deployment<O, P, C>) -> StackResult<()>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    output::step("Stopping services");
    deployment.stop()?;
    output::ok("Stack stopped");
    Ok(())
}
