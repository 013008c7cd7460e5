//! 角色启动
//!
//! A role is started with three parameters: the state log name, the access
//! key and its diagnostics file. Launch validates them, attaches to the
//! restaurant registered under the key and runs the role to completion.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::{Chef, Receptionist, Waiter};
use crate::core::LaunchParams;
use crate::core::error::RestaurantResult;
use crate::delay::DelaySource;
use crate::state::Registry;
use crate::trace::{StateLog, TraceFormat};
use crate::utils::Diagnostics;

/// 服务角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleKind {
    Chef,
    Waiter,
    Receptionist,
}

impl RoleKind {
    pub const ALL: [RoleKind; 3] = [RoleKind::Chef, RoleKind::Waiter, RoleKind::Receptionist];

    pub fn name(&self) -> &'static str {
        match self {
            RoleKind::Chef => "chef",
            RoleKind::Waiter => "waiter",
            RoleKind::Receptionist => "receptionist",
        }
    }

    /// Default diagnostics file name
    pub fn diagnostics_file(&self) -> &'static str {
        match self {
            RoleKind::Chef => "error_CH",
            RoleKind::Waiter => "error_WT",
            RoleKind::Receptionist => "error_RT",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a role that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleReport {
    pub role: RoleKind,
    /// Requests served (chef: orders cooked)
    pub events: usize,
}

/// Starts one role and runs it until its quota is served
///
/// The diagnostics file is created first so that parameter errors land in
/// it too. Any fatal error is written there before being returned.
pub async fn launch(
    kind: RoleKind,
    params: &LaunchParams,
    registry: &Registry,
    delays: Arc<dyn DelaySource>,
    format: TraceFormat,
) -> RestaurantResult<RoleReport> {
    let diagnostics = Diagnostics::create(&params.diagnostics)?;

    let result = run_role(kind, params, registry, delays, format).await;
    if let Err(e) = &result {
        diagnostics.report(kind.name(), e);
        if e.is_closed_signal() {
            tracing::debug!(role = %kind, error = %e, "Role stopped by teardown");
        } else {
            tracing::error!(role = %kind, error = %e, "Role failed");
        }
    }
    result
}

async fn run_role(
    kind: RoleKind,
    params: &LaunchParams,
    registry: &Registry,
    delays: Arc<dyn DelaySource>,
    format: TraceFormat,
) -> RestaurantResult<RoleReport> {
    let launch = params.validate()?;
    let restaurant = registry.connect(launch.key)?;
    let log = StateLog::open(&launch.log, format)?;

    tracing::debug!(role = %kind, key = %format_args!("{:#x}", launch.key), "Role attached");

    let events = match kind {
        RoleKind::Chef => Chef::new(restaurant, log, delays).run().await?,
        RoleKind::Waiter => Waiter::new(restaurant, log).run().await?,
        RoleKind::Receptionist => Receptionist::new(restaurant, log).run().await?,
    };

    Ok(RoleReport { role: kind, events })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ConfigError, RestaurantError};
    use crate::delay::FixedDelay;

    fn params(dir: &std::path::Path, log: &str, key: &str, kind: RoleKind) -> LaunchParams {
        LaunchParams {
            log: log.into(),
            key: key.into(),
            diagnostics: dir.join(kind.diagnostics_file()),
        }
    }

    #[tokio::test]
    async fn test_unknown_key_is_reported_in_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log");
        let params = params(dir.path(), log.to_str().unwrap(), "0x77", RoleKind::Waiter);

        let err = launch(
            RoleKind::Waiter,
            &params,
            &Registry::new(),
            Arc::new(FixedDelay::zero()),
            TraceFormat::Text,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            RestaurantError::Config(ConfigError::Unreachable(0x77))
        ));
        let written = std::fs::read_to_string(dir.path().join("error_WT")).unwrap();
        assert!(written.starts_with("waiter: "));
        assert!(written.contains("0x77"));
    }

    #[tokio::test]
    async fn test_bad_key_fails_before_attaching() {
        let dir = tempfile::tempdir().unwrap();
        let params = params(dir.path(), "log", "12zz", RoleKind::Chef);

        let err = launch(
            RoleKind::Chef,
            &params,
            &Registry::new(),
            Arc::new(FixedDelay::zero()),
            TraceFormat::Text,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            RestaurantError::Config(ConfigError::InvalidKey(_))
        ));
        assert!(dir.path().join("error_CH").exists());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(RoleKind::Receptionist.diagnostics_file(), "error_RT");
        assert_eq!(RoleKind::Chef.to_string(), "chef");
        assert_eq!(
            serde_json::to_string(&RoleKind::Waiter).unwrap(),
            "\"WAITER\""
        );
    }
}
