//! Render the sentiment gauge for one score as a standalone SVG on stdout.
//!
//! Geometry and zones follow the same environment as the dashboard
//! (`GAUGE_SIZE`, `GAUGE_RADIUS`, `NEEDLE_LENGTH`, `GAUGE_ZONES`).

use anyhow::{anyhow, Context, Result};

use marketmood::config::DashboardConfig;
use marketmood::gauge::GaugeGeometry;

fn main() -> Result<()> {
    let raw = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: gauge_svg SCORE"))?;
    let score: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("score must be a number, got '{}'", raw))?;

    let cfg = DashboardConfig::from_env();
    let gauge = GaugeGeometry::new(cfg.gauge_size, cfg.gauge_radius, cfg.needle_length, cfg.zones);
    print!("{}", gauge.render_svg(score));
    Ok(())
}
