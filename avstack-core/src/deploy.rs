// SPDX-License-Identifier: Apache-2.0

//! Deployment facade.
//!
//! Bundles the stack configuration with the injected orchestrator, health
//! probe, and clock, and exposes the primitives the CLI commands sequence:
//! preflight checks, build/up/down, the post-start settle delay, and the
//! per-endpoint health report.

use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::compose::Orchestrator;
use crate::config::StackConfig;
use crate::error::StackResult;
use crate::health::{EndpointHealth, HealthProbe, HealthReport, HealthSnapshot};
use crate::preflight::{self, DictionaryDir};

pub struct Deployment<O, P, C> {
    config: StackConfig,
    orchestrator: O,
    probe: P,
    clock: C,
}

impl<O, P, C> Deployment<O, P, C>
where
    O: Orchestrator,
    P: HealthProbe,
    C: Clock,
{
    pub fn new(config: StackConfig, orchestrator: O, probe: P, clock: C) -> Self {
        Self {
            config,
            orchestrator,
            probe,
            clock,
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &O {
        &self.orchestrator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Preflight: the container runtime must be alive before anything else.
    pub fn ensure_runtime(&self) -> StackResult<()> {
        self.orchestrator.ping()
    }

    /// Preflight: resolve the environment file (primary, then fallback).
    pub fn resolve_env_file(&self) -> StackResult<PathBuf> {
        preflight::resolve_env_file(&self.config.options)
    }

    /// Preflight: check the dictionary directory, self-healing when absent.
    pub fn ensure_dictionary_dir(&self) -> StackResult<DictionaryDir> {
        preflight::ensure_dictionary_dir(&self.config.options)
    }

    pub fn build(&self, env_file: &Path) -> StackResult<()> {
        tracing::info!(env_file = %env_file.display(), "Building images");
        self.orchestrator.build(env_file)
    }

    pub fn up(&self, env_file: &Path) -> StackResult<()> {
        tracing::info!(env_file = %env_file.display(), "Starting services");
        self.orchestrator.up(env_file)
    }

    pub fn stop(&self) -> StackResult<()> {
        tracing::info!("Stopping services");
        self.orchestrator.down()
    }

    /// Fixed delay after `up` so containers get a moment to initialize.
    /// Not a readiness guarantee - that comes from the health check after.
    pub async fn settle(&self) {
        self.clock.sleep(self.config.options.startup_delay).await;
    }

    /// Short pause between the down and up halves of a restart.
    pub async fn pause(&self) {
        self.clock.sleep(self.config.options.restart_pause).await;
    }

    /// Probe every service endpoint, one after another, independently.
    /// Never fails: unreachable endpoints are reported, not raised.
    pub async fn check_health(&self) -> HealthReport {
        let host = &self.config.options.host;
        let mut endpoints = Vec::with_capacity(self.config.services.len());

        for service in &self.config.services {
            let health_url = service.health_url(host);
            let outcome = self.probe.get(&health_url).await;

            if !outcome.reachable {
                tracing::warn!(service = %service.name, url = %health_url, "Service not responding");
            }

            let snapshot = if service.inspect_body && outcome.reachable {
                HealthSnapshot::parse(&outcome.body)
            } else {
                None
            };

            endpoints.push(EndpointHealth {
                name: service.name.clone(),
                base_url: service.base_url(host),
                health_url,
                reachable: outcome.reachable,
                inspected: service.inspect_body,
                body: outcome.reachable.then_some(outcome.body),
                snapshot,
            });
        }

        HealthReport { endpoints }
    }

    pub fn processes(&self) -> StackResult<String> {
        self.orchestrator.processes()
    }

    pub fn follow_logs(&self) -> StackResult<()> {
        self.orchestrator.follow_logs()
    }
}
