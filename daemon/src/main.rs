//! vigil daemon — entry point for running the optimistic verification gate.

mod config;
mod http_oracle;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use config::GateConfig;
use http_oracle::HttpOracle;
use vigil_rpc::RpcServer;
use vigil_types::Address;
use vigil_verification::{OptimisticVerifier, OracleDirectory};

#[derive(Parser)]
#[command(name = "vigil-daemon", about = "Optimistic verification gate daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are used
    /// as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Administrator identity (hex address).
    #[arg(long, env = "VIGIL_ADMIN")]
    admin: Option<String>,

    /// Initial active submodule identity (hex address).
    #[arg(long, env = "VIGIL_SUBMODULE")]
    submodule: Option<String>,

    /// Fraud votes strictly above this count disqualify the submodule.
    #[arg(long, env = "VIGIL_VOTE_THRESHOLD")]
    vote_threshold: Option<u64>,

    /// Fraud window in seconds.
    #[arg(long, env = "VIGIL_FRAUD_WINDOW_SECS")]
    fraud_window_secs: Option<u64>,

    /// Initial watcher identities (comma-separated hex addresses).
    #[arg(long, env = "VIGIL_WATCHERS", value_delimiter = ',')]
    watchers: Vec<String>,

    /// Submodule oracle endpoints, "address=url" (comma-separated).
    #[arg(long = "oracle", env = "VIGIL_ORACLES", value_delimiter = ',')]
    oracles: Vec<String>,

    /// Per-request timeout for oracle calls, in seconds.
    #[arg(long, env = "VIGIL_ORACLE_TIMEOUT_SECS")]
    oracle_timeout_secs: Option<u64>,

    /// RPC server port.
    #[arg(long, env = "VIGIL_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Emit JSON-formatted logs.
    #[arg(long, env = "VIGIL_LOG_JSON")]
    log_json: bool,
}

fn parse_oracle_flags(raw: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut oracles = HashMap::new();
    for entry in raw {
        let (addr, url) = entry
            .split_once('=')
            .with_context(|| format!("oracle flag {entry:?} is not address=url"))?;
        oracles.insert(addr.to_string(), url.to_string());
    }
    Ok(oracles)
}

fn merge_config(cli: Cli) -> anyhow::Result<GateConfig> {
    let file_config = match &cli.config {
        Some(path) => {
            let path = path.display().to_string();
            let cfg = GateConfig::from_toml_file(&path)
                .with_context(|| format!("loading config from {path}"))?;
            Some(cfg)
        }
        None => None,
    };

    let cli_oracles = parse_oracle_flags(&cli.oracles)?;

    let Some(admin) = cli
        .admin
        .or_else(|| file_config.as_ref().map(|c| c.admin.clone()))
    else {
        bail!("administrator address required (--admin or config file)");
    };
    let Some(submodule) = cli
        .submodule
        .or_else(|| file_config.as_ref().map(|c| c.submodule.clone()))
    else {
        bail!("submodule address required (--submodule or config file)");
    };

    let base = file_config.unwrap_or_else(|| {
        GateConfig::from_toml_str(&format!(
            "admin = {admin:?}\nsubmodule = {submodule:?}\n"
        ))
        .expect("defaults from two string fields always parse")
    });

    Ok(GateConfig {
        admin,
        submodule,
        vote_threshold: cli.vote_threshold.unwrap_or(base.vote_threshold),
        fraud_window_secs: cli.fraud_window_secs.unwrap_or(base.fraud_window_secs),
        watchers: if cli.watchers.is_empty() {
            base.watchers
        } else {
            cli.watchers
        },
        oracles: if cli_oracles.is_empty() {
            base.oracles
        } else {
            cli_oracles
        },
        oracle_timeout_secs: cli.oracle_timeout_secs.unwrap_or(base.oracle_timeout_secs),
        rpc_port: cli.rpc_port.unwrap_or(base.rpc_port),
        log_json: cli.log_json || base.log_json,
    })
}

fn build_verifier(config: &GateConfig) -> anyhow::Result<OptimisticVerifier> {
    let admin: Address = config.admin.parse().context("admin address")?;
    let submodule: Address = config.submodule.parse().context("submodule address")?;

    let timeout = Duration::from_secs(config.oracle_timeout_secs);
    let mut oracles = OracleDirectory::new();
    for (raw_addr, url) in &config.oracles {
        let addr: Address = raw_addr
            .parse()
            .with_context(|| format!("oracle address {raw_addr}"))?;
        let oracle = HttpOracle::new(url.clone(), timeout)
            .with_context(|| format!("oracle client for {url}"))?;
        oracles.register(addr, Arc::new(oracle));
    }

    let mut verifier = OptimisticVerifier::initialize(
        admin,
        submodule,
        config.vote_threshold,
        config.fraud_window_secs,
        oracles,
    )?;

    let watchers: Vec<Address> = config
        .watchers
        .iter()
        .map(|raw| raw.parse().with_context(|| format!("watcher address {raw}")))
        .collect::<anyhow::Result<_>>()?;
    verifier.add_watchers(admin, &watchers)?;
    verifier.drain_events();
    Ok(verifier)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = merge_config(cli)?;
    vigil_utils::init_tracing(config.log_json);

    // Built before the runtime starts: the blocking oracle client must not be
    // constructed on an async worker thread.
    let verifier = build_verifier(&config)?;
    tracing::info!(
        submodule = %verifier.active_submodule(),
        watchers = verifier.watchers().len(),
        vote_threshold = config.vote_threshold,
        fraud_window = %vigil_utils::format_duration(config.fraud_window_secs),
        "gate initialized"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = RpcServer::new(config.rpc_port, verifier);
        tokio::select! {
            result = server.start() => result?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received — stopping gate");
            }
        }
        Ok::<(), anyhow::Error>(())
    })?;

    tracing::info!("vigil daemon exited cleanly");
    Ok(())
}
