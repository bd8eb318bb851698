// SPDX-License-Identifier: Apache-2.0

//! `avstack start` - build images and start the stack.
//!
//! Preflight order matters: Docker liveness, then the environment file,
//! then the dictionary directory. The first two are fatal before any
//! orchestrator work; the dictionary check self-heals.

use avstack_core::{Clock, Deployment, DictionaryDir, HealthProbe, Orchestrator, StackResult};

use crate::output;

pub async fn execute<O, P, C>(deployment: &Deployment<O, P, C>) -> StackResult<()>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    output::step("Checking Docker daemon");
    deployment.ensure_runtime()?;
    output::ok("Docker is running");

    let env_file = deployment.resolve_env_file()?;
    output::ok(&format!("Environment file: {}", env_file.display()));

    match deployment.ensure_dictionary_dir()? {
        DictionaryDir::Populated { files } => {
            output::ok(&format!(
                "Dictionary data: {} file(s) - dictionary-assisted validation",
                files
            ));
        }
        DictionaryDir::Placeholder => {
            output::warn("Dictionary directory empty - stack will run AI-only validation");
        }
    }

    output::step("Building images");
    deployment.build(&env_file)?;

    output::step("Starting services");
    deployment.up(&env_file)?;

    let delay = deployment.config().options.startup_delay;
    output::step(&format!(
        "Waiting {}s for containers to initialize",
        delay.as_secs()
    ));
    deployment.settle().await;

    let report = deployment.check_health().await;
    output::health_summary(&report);
    output::access_urls(deployment.config());

    Ok(())
}
