//! 端到端场景测试
//!
//! Full simulations over real state log files, plus a step-by-step run of
//! three groups competing for two tables.

use restaurant::core::error::ConfigError;
use restaurant::delay::{DelayBounds, FixedDelay, RandomDelay};
use restaurant::roles::{Chef, GroupClient, Receptionist, RoleKind, Waiter};
use restaurant::trace::MemorySink;
use restaurant::{
    Config, Layout, Registry, Restaurant, RestaurantError, Simulation, StateLog, TraceFormat,
};
use shared::{GroupId, GroupState, RestaurantSnapshot, TableId};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// 读取 JSON 状态日志
fn read_json_log(path: &Path) -> Vec<RestaurantSnapshot> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn json_config(dir: &Path, n_groups: usize) -> Config {
    let mut config = Config::for_dir(dir, n_groups);
    config.trace_format = TraceFormat::Json;
    config
}

/// Polls the shared state until `check` holds, failing after a few seconds
async fn wait_until(
    restaurant: &Restaurant,
    check: impl Fn(&RestaurantSnapshot) -> bool,
) -> RestaurantSnapshot {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = restaurant.snapshot().await;
            if check(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("state never reached")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_group_is_served_at_table_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = json_config(dir.path(), 1);
    let log_path = config.log.clone();

    let report = Simulation::new(config)
        .with_registry(Registry::new())
        .with_delays(Arc::new(FixedDelay::zero()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].table, TableId::new(0));
    assert_eq!(report.final_snapshot.state_of(GroupId::new(0)), Some(GroupState::Done));
    assert_eq!(report.final_snapshot.table_of(GroupId::new(0)), None);

    let snapshots = read_json_log(&log_path);
    assert!(snapshots.iter().all(|s| s.groups_waiting == 0));
    assert!(
        snapshots
            .iter()
            .any(|s| s.state_of(GroupId::new(0)) == Some(GroupState::Eating)
                && s.table_of(GroupId::new(0)) == Some(TableId::new(0)))
    );
    assert!(snapshots.iter().all(|s| s.table_of(GroupId::new(0)) != Some(TableId::new(1))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn three_groups_two_tables_step_by_step() {
    let restaurant = Arc::new(Restaurant::new(0x42, Layout::new(3)).unwrap());
    let sink = MemorySink::new();
    let log = StateLog::memory(&sink);
    let delays: Arc<FixedDelay> = Arc::new(FixedDelay::zero());

    let receptionist = tokio::spawn(Receptionist::new(restaurant.clone(), log.clone()).run());
    let waiter = tokio::spawn(Waiter::new(restaurant.clone(), log.clone()).run());
    let chef = tokio::spawn(Chef::new(restaurant.clone(), log.clone(), delays.clone()).run());

    let groups: Vec<GroupClient> = (0..3)
        .map(|g| GroupClient::new(GroupId::new(g), restaurant.clone(), log.clone(), delays.clone()))
        .collect();
    let mut groups = groups.into_iter();
    let (g0, g1, g2) = match (groups.next(), groups.next(), groups.next()) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => unreachable!(),
    };

    assert_eq!(g0.check_in_at_reception().await.unwrap(), TableId::new(0));
    assert_eq!(g1.check_in_at_reception().await.unwrap(), TableId::new(1));

    let g2_check_in = tokio::spawn(async move {
        let table = g2.check_in_at_reception().await;
        (g2, table)
    });

    let snapshot = wait_until(&restaurant, |s| s.groups_waiting == 1).await;
    assert_eq!(snapshot.state_of(GroupId::new(2)), Some(GroupState::Waiting));
    assert_eq!(snapshot.table_of(GroupId::new(2)), None);
    assert!(!g2_check_in.is_finished());

    g0.order_food().await.unwrap();
    g0.wait_food().await.unwrap();
    g0.check_out_at_reception().await.unwrap();

    let (g2, table) = tokio::time::timeout(Duration::from_secs(5), g2_check_in)
        .await
        .expect("waiting group must be promoted")
        .unwrap();
    assert_eq!(table.unwrap(), TableId::new(0));

    let snapshot = restaurant.snapshot().await;
    assert_eq!(snapshot.groups_waiting, 0);
    assert_eq!(snapshot.state_of(GroupId::new(0)), Some(GroupState::Done));
    assert_eq!(snapshot.table_of(GroupId::new(2)), Some(TableId::new(0)));

    for group in [g1, g2] {
        group.order_food().await.unwrap();
        group.wait_food().await.unwrap();
        group.check_out_at_reception().await.unwrap();
    }

    assert_eq!(receptionist.await.unwrap().unwrap(), 6);
    assert_eq!(waiter.await.unwrap().unwrap(), 6);
    assert_eq!(chef.await.unwrap().unwrap(), 3);

    for entry in sink.entries() {
        entry.check_invariants().unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn random_delays_keep_every_snapshot_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let config = json_config(dir.path(), 6);
    let log_path = config.log.clone();
    let bounds = DelayBounds {
        max_arrival_ms: 20,
        max_cook_ms: 10,
        max_eat_ms: 20,
    };

    let report = Simulation::new(config)
        .with_registry(Registry::new())
        .with_delays(Arc::new(RandomDelay::seeded(bounds, 7)))
        .run()
        .await
        .unwrap();

    assert_eq!(report.events_of(RoleKind::Receptionist), Some(12));
    assert_eq!(report.events_of(RoleKind::Waiter), Some(12));
    assert_eq!(report.events_of(RoleKind::Chef), Some(6));

    let snapshots = read_json_log(&log_path);
    assert!(!snapshots.is_empty());
    for snapshot in &snapshots {
        snapshot.check_invariants().unwrap();
        assert!(snapshot.seated_count() <= 2);
    }
    let last = snapshots.last().unwrap();
    assert!(last.groups.iter().all(|g| *g == GroupState::Done));
    assert!(last.assigned_table.iter().all(Option::is_none));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn text_log_starts_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_dir(dir.path(), 2);
    let log_path = config.log.clone();

    Simulation::new(config)
        .with_registry(Registry::new())
        .with_delays(Arc::new(FixedDelay::zero()))
        .run()
        .await
        .unwrap();

    let text = std::fs::read_to_string(&log_path).unwrap();
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    assert!(lines.next().unwrap().contains("Restaurant"));
    assert_eq!(lines.next().unwrap(), " CH  WT  RC  G00 G01  GWT T00 T01");
    let body: Vec<&str> = lines.collect();
    assert!(!body.is_empty());
    assert!(body.last().unwrap().contains("DON DON"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_keys_run_side_by_side() {
    let registry = Registry::new();
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let mut config_a = json_config(dir_a.path(), 3);
    config_a.key = "0x10".into();
    let mut config_b = json_config(dir_b.path(), 4);
    config_b.key = "0x20".into();

    let sim_a = Simulation::new(config_a)
        .with_registry(registry.clone())
        .with_delays(Arc::new(FixedDelay::zero()));
    let sim_b = Simulation::new(config_b)
        .with_registry(registry.clone())
        .with_delays(Arc::new(FixedDelay::zero()));

    let (a, b) = tokio::join!(sim_a.run(), sim_b.run());
    assert_eq!(a.unwrap().groups.len(), 3);
    assert_eq!(b.unwrap().groups.len(), 4);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn malformed_key_is_rejected_before_setup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::for_dir(dir.path(), 2);
    config.key = "0x12zz".into();
    let log_path = config.log.clone();
    let registry = Registry::new();

    let err = Simulation::new(config)
        .with_registry(registry.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RestaurantError::Config(ConfigError::InvalidKey(_))
    ));
    assert!(registry.is_empty());
    assert!(!log_path.exists());
}

#[tokio::test]
async fn key_in_use_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::new();
    registry.create(0x1234, Layout::new(1)).unwrap();

    let err = Simulation::new(Config::for_dir(dir.path(), 2))
        .with_registry(registry.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RestaurantError::Config(ConfigError::KeyInUse(0x1234))
    ));
    // the existing instance is left alone
    assert_eq!(registry.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_diagnostics_dir_fails_without_hanging() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::for_dir(dir.path(), 2);
    config.diagnostics_dir = dir.path().join("missing");
    let registry = Registry::new();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        Simulation::new(config)
            .with_registry(registry.clone())
            .with_delays(Arc::new(FixedDelay::zero()))
            .run(),
    )
    .await
    .expect("simulation must tear down instead of hanging");

    assert!(matches!(
        result,
        Err(RestaurantError::Config(ConfigError::Diagnostics { .. }))
    ));
    assert!(registry.is_empty());
}
