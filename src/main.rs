use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use tokio::time::Duration;

use marketmood::config::DashboardConfig;
use marketmood::dashboard::Dashboard;
use marketmood::logging::{log, obj, ts_epoch_ms, v_str, Domain, Level};
use marketmood::scheduler::RefreshTask;
use marketmood::series::TimeRange;

const USAGE: &str = "usage: marketmood [RANGE] [--index SYMBOL] [--out PATH] [--watch TICKS]";

#[derive(Debug, Default)]
struct Args {
    range: Option<TimeRange>,
    index: Option<String>,
    out: Option<PathBuf>,
    watch: Option<u64>,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--index" => args.index = Some(it.next().ok_or_else(|| anyhow!("--index needs a symbol"))?),
            "--out" => args.out = Some(PathBuf::from(it.next().ok_or_else(|| anyhow!("--out needs a path"))?)),
            "--watch" => {
                let n = it.next().ok_or_else(|| anyhow!("--watch needs a tick count"))?;
                args.watch = Some(n.parse().with_context(|| format!("bad tick count '{}'", n))?);
            }
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            other if args.range.is_none() && !other.starts_with("--") => {
                args.range = Some(other.parse()?);
            }
            other => return Err(anyhow!("unexpected argument '{}'\n{}", other, USAGE)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let cfg = DashboardConfig::from_env();
    let refresh = Duration::from_secs(cfg.summary_refresh_secs);

    let mut dashboard = Dashboard::new(cfg)?;
    if let Some(symbol) = &args.index {
        dashboard.select_index(symbol)?;
    }
    if let Some(range) = args.range {
        dashboard.set_range(range);
    }

    let snapshot = dashboard.snapshot(ts_epoch_ms())?;
    println!("{}", snapshot.to_json()?);
    if let Some(path) = &args.out {
        snapshot.write_json(path)?;
        log(
            Level::Info,
            Domain::System,
            "snapshot_written",
            obj(&[("path", v_str(&path.display().to_string())), ("digest", v_str(&snapshot.digest()?))]),
        );
    }

    let Some(ticks) = args.watch.filter(|n| *n > 0) else {
        return Ok(());
    };

    let shared = Arc::new(Mutex::new((dashboard, snapshot)));
    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    let worker = shared.clone();
    let task = RefreshTask::start("summary", refresh, move |tick| {
        let Ok(mut guard) = worker.lock() else {
            return;
        };
        let (dash, snap) = &mut *guard;
        let summary = dash.refresh_summary(snap, ts_epoch_ms());
        println!("{}", json!({ "tick": tick, "summary": summary }));
        if tick >= ticks {
            let _ = done_tx.send(());
        }
    })?;

    done_rx.recv().await;
    let delivered = task.stop().await?;
    log(
        Level::Info,
        Domain::System,
        "watch_done",
        obj(&[("ticks", json!(delivered))]),
    );
    Ok(())
}
