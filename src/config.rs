use anyhow::{Context, Result};

use crate::gauge::{self, default_zones, parse_zones, validate_zones, Zone};
use crate::logging::{log_warn, Domain};
use crate::series::TimeRange;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub index_symbol: String,
    pub default_range: TimeRange,
    /// Fixed seed for reproducible mock data; entropy when unset.
    pub series_seed: Option<u64>,
    pub index_volatility: f64,
    pub vix_start: f64,
    pub ma50_start: f64,
    pub ma200_start: f64,
    pub sentiment_score: f64,
    pub gauge_size: f64,
    pub gauge_radius: f64,
    pub needle_length: f64,
    pub zones: Vec<Zone>,
    pub summary_refresh_secs: u64,
    pub impact_bullish_above: f64,
    pub impact_bearish_below: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            index_symbol: "SPX".to_string(),
            default_range: TimeRange::OneMonth,
            series_seed: None,
            index_volatility: 0.015,
            vix_start: 22.0,
            ma50_start: 55.0,
            ma200_start: 48.0,
            sentiment_score: 58.0,
            gauge_size: gauge::DEFAULT_SIZE,
            gauge_radius: gauge::DEFAULT_RADIUS,
            needle_length: gauge::DEFAULT_NEEDLE_LENGTH,
            zones: default_zones(),
            summary_refresh_secs: 30,
            impact_bullish_above: 0.5,
            impact_bearish_below: -0.5,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// `"NaN"` and `"inf"` parse as floats; only finite values override the default.
fn finite_or(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    finite_or(std::env::var(key).ok().as_deref(), default)
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            index_symbol: std::env::var("INDEX_SYMBOL").unwrap_or(d.index_symbol),
            default_range: env_parse("DEFAULT_RANGE", d.default_range),
            series_seed: std::env::var("SERIES_SEED").ok().and_then(|v| v.trim().parse().ok()),
            index_volatility: env_f64("INDEX_VOLATILITY", d.index_volatility),
            vix_start: env_f64("VIX_START", d.vix_start),
            ma50_start: env_f64("MA50_START", d.ma50_start),
            ma200_start: env_f64("MA200_START", d.ma200_start),
            sentiment_score: env_f64("SENTIMENT_SCORE", d.sentiment_score),
            gauge_size: env_f64("GAUGE_SIZE", d.gauge_size),
            gauge_radius: env_f64("GAUGE_RADIUS", d.gauge_radius),
            needle_length: env_f64("NEEDLE_LENGTH", d.needle_length),
            zones: std::env::var("GAUGE_ZONES")
                .ok()
                .map(|raw| zones_or_default(&raw))
                .unwrap_or(d.zones),
            summary_refresh_secs: env_parse("SUMMARY_REFRESH_SECS", d.summary_refresh_secs),
            impact_bullish_above: env_f64("IMPACT_BULLISH_ABOVE", d.impact_bullish_above),
            impact_bearish_below: env_f64("IMPACT_BEARISH_BELOW", d.impact_bearish_below),
        }
    }
}

/// Parsed and validated zones, or the defaults with a warning.
pub fn zones_or_default(raw: &str) -> Vec<Zone> {
    match checked_zones(raw) {
        Ok(zones) => zones,
        Err(err) => {
            log_warn(Domain::System, "zones_rejected", &format!("{:#}", err));
            default_zones()
        }
    }
}

fn checked_zones(raw: &str) -> Result<Vec<Zone>> {
    let mut zones = parse_zones(raw).context("GAUGE_ZONES")?;
    zones.sort_by(|a, b| a.min.total_cmp(&b.min));
    validate_zones(&zones).context("GAUGE_ZONES")?;
    Ok(zones)
}
