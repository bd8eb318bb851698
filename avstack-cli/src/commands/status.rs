// SPDX-License-Identifier: Apache-2.0

//! `avstack status` - container listing plus current endpoint health.
//!
//! Nothing here is fatal: a failed `ps` or dead endpoints are reported and
//! the command still exits zero.

use avstack_core::{Clock, Deployment, HealthProbe, Orchestrator, StackResult};

use crate::output;

pub async fn execute<O, P, C>(deployment: &Deployment<O, P, C>) -> StackResult<()>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    output::step("Container status");
    match deployment.processes() {
        Ok(listing) => print!("{}", listing),
        Err(e) => output::warn(&format!("Could not list containers: {}", e)),
    }

    let report = deployment.check_health().await;
    output::health_summary(&report);

    // Show the API health body: pretty-printed when it is JSON, raw otherwise.
    for endpoint in &report.endpoints {
        if !endpoint.inspected {
            continue;
        }
        if let Some(body) = &endpoint.body {
            println!();
            println!("{} health response:", endpoint.name);
            println!("{}", pretty_or_raw(body));
        }
    }

    Ok(())
}

fn pretty_or_raw(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}
