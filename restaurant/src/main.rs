use anyhow::Context;
use clap::Parser;
use restaurant::{Cli, Config, Simulation, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env (命令行参数优先)
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // 2. 加载配置
    let config = cli.apply(Config::from_env().context("invalid environment")?);

    // 3. 设置日志
    setup_environment(&config);
    print_banner();

    tracing::info!(
        groups = config.n_groups,
        key = %config.key,
        log = %config.log.display(),
        "Restaurant starting..."
    );

    // 4. 运行模拟
    let report = Simulation::new(config)
        .run()
        .await
        .context("simulation failed")?;

    for group in &report.groups {
        tracing::info!(group = %group.group, table = %group.table, "Group served");
    }
    tracing::info!(key = %format_args!("{:#x}", report.key), "Restaurant closed");
    Ok(())
}
