//! 模拟启动器
//!
//! The setup step: registers the restaurant under its key, writes the state
//! log header, launches the three roles and every group, then tears
//! everything down once they have all returned.

use serde::Serialize;
use shared::{GroupId, RestaurantSnapshot};
use std::sync::Arc;

use super::tasks::{SimTasks, TaskKind, TaskOutcome};
use crate::core::Config;
use crate::core::config::parse_key;
use crate::core::error::{ProtocolError, RestaurantResult};
use crate::delay::{DelaySource, RandomDelay};
use crate::roles::{GroupClient, GroupReport, RoleKind, RoleReport, launch};
use crate::state::{Layout, Registry, Restaurant};
use crate::trace::StateLog;

/// 模拟结果
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub key: u32,
    pub roles: Vec<RoleReport>,
    pub groups: Vec<GroupReport>,
    pub final_snapshot: RestaurantSnapshot,
}

impl SimulationReport {
    pub fn events_of(&self, role: RoleKind) -> Option<usize> {
        self.roles.iter().find(|r| r.role == role).map(|r| r.events)
    }
}

pub struct Simulation {
    config: Config,
    registry: Registry,
    delays: Arc<dyn DelaySource>,
}

impl Simulation {
    pub fn new(config: Config) -> Self {
        let delays: Arc<dyn DelaySource> = match config.seed {
            Some(seed) => Arc::new(RandomDelay::seeded(config.delays, seed)),
            None => Arc::new(RandomDelay::new(config.delays)),
        };
        Self {
            config,
            registry: Registry::global(),
            delays,
        }
    }

    /// Uses a private key space instead of the process-wide one
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_delays(mut self, delays: Arc<dyn DelaySource>) -> Self {
        self.delays = delays;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one complete simulation
    pub async fn run(&self) -> RestaurantResult<SimulationReport> {
        // every role's parameters are checked before anything is created
        for kind in RoleKind::ALL {
            self.config
                .launch_params(kind.diagnostics_file())
                .validate()?;
        }
        let key = parse_key(&self.config.key)?;
        let layout = Layout::new(self.config.n_groups);

        let restaurant = self.registry.create(key, layout)?;
        tracing::info!(
            key = %format_args!("{key:#x}"),
            groups = layout.n_groups,
            tables = layout.n_tables,
            "Simulation started"
        );

        let result = self.run_attached(&restaurant).await;
        self.registry.destroy(key);

        match &result {
            Ok(report) => tracing::info!(
                groups = report.groups.len(),
                "Simulation finished"
            ),
            Err(e) => tracing::error!(error = %e, "Simulation failed"),
        }
        result
    }

    async fn run_attached(&self, restaurant: &Arc<Restaurant>) -> RestaurantResult<SimulationReport> {
        let layout = restaurant.layout();
        let log = StateLog::create(
            &self.config.log,
            self.config.trace_format,
            layout.n_groups,
            layout.n_tables,
        )?;
        {
            let state = restaurant.lock().await;
            log.save(&state)?;
        }

        let mut tasks = SimTasks::new();

        for kind in RoleKind::ALL {
            let params = self.config.launch_params(kind.diagnostics_file());
            let registry = self.registry.clone();
            let delays = self.delays.clone();
            let format = self.config.trace_format;
            tasks.spawn(kind.name().to_string(), TaskKind::Role, async move {
                let report = launch(kind, &params, &registry, delays, format).await?;
                Ok(TaskOutcome::Role(report))
            });
        }

        for index in 0..layout.n_groups {
            let group = GroupClient::new(
                GroupId::new(index),
                restaurant.clone(),
                log.clone(),
                self.delays.clone(),
            );
            tasks.spawn(format!("group {index}"), TaskKind::Group, async move {
                let report = group.run().await?;
                Ok(TaskOutcome::Group(report))
            });
        }

        let outcomes = tasks.join(restaurant).await?;

        let final_snapshot = restaurant.snapshot().await;
        final_snapshot
            .check_invariants()
            .map_err(ProtocolError::Inconsistent)?;

        Ok(SimulationReport {
            key: restaurant.key(),
            roles: outcomes.roles,
            groups: outcomes.groups,
            final_snapshot,
        })
    }
}
