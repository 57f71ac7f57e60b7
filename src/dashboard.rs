//! Dashboard state and snapshot assembly.
//!
//! A `Dashboard` owns the selected index, the active time range and the RNG
//! behind every mock series. `snapshot` regenerates the series for the
//! active range and gathers every panel into one serializable value.

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::config::DashboardConfig;
use crate::format::{change_arrow, format_grouped, format_signed};
use crate::gauge::{GaugeGeometry, GaugeResult};
use crate::logging::{log, obj, v_num, v_str, Domain, Level, ProfileScope};
use crate::macro_impact::{default_indicators, Impact, MacroView};
use crate::metric_cards::{default_metrics, MetricCard};
use crate::news::{default_news, default_social, score_feed, FeedSummary, ImpactThresholds};
use crate::series::{BreadthPoint, MockSeriesGenerator, SeriesRequest, SeriesTrend, TimeRange, TimeSeriesPoint, VixStress};
use crate::summary::{AiSummary, SummaryContext, SummaryFeed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndex {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub value: f64,
    pub change: f64,
    /// Already in percent, 0.27 = 0.27%.
    pub change_percent: f64,
}

impl MarketIndex {
    fn new(id: &str, name: &str, symbol: &str, value: f64, change: f64, change_percent: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            value,
            change,
            change_percent,
        }
    }

    /// Header line, e.g. `"4,567.89 +12.34 (+0.27%)"`.
    pub fn quote_line(&self) -> String {
        format!(
            "{} {} ({}%)",
            format_grouped(self.value, 2),
            format_signed(self.change, 2),
            format_signed(self.change_percent, 2)
        )
    }
}

pub fn market_indexes() -> Vec<MarketIndex> {
    vec![
        MarketIndex::new("sp500", "S&P 500", "SPX", 4567.89, 12.34, 0.27),
        MarketIndex::new("nasdaq", "NASDAQ Composite", "IXIC", 14234.56, -23.45, -0.16),
        MarketIndex::new("dow", "Dow Jones Industrial", "DJI", 34567.89, 45.67, 0.13),
        MarketIndex::new("russell2000", "Russell 2000", "RUT", 1987.65, -8.90, -0.45),
    ]
}

pub fn find_index(symbol: &str) -> Result<MarketIndex> {
    market_indexes()
        .into_iter()
        .find(|idx| idx.symbol.eq_ignore_ascii_case(symbol.trim()) || idx.id == symbol.trim())
        .ok_or_else(|| anyhow!("unknown market index '{}'", symbol))
}

const OVERVIEW_BREADTH: [f64; 12] = [48.0, 52.0, 50.0, 55.0, 53.0, 57.0, 60.0, 58.0, 61.0, 63.0, 59.0, 62.0];
const OVERVIEW_VIX: [f64; 12] = [22.0, 21.0, 23.0, 24.0, 22.0, 20.0, 19.0, 21.0, 22.0, 23.0, 22.0, 21.0];

/// Small axis-less trend line for the overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    pub label: String,
    pub color: String,
    pub values: Vec<f64>,
    pub latest: Option<f64>,
    /// Last value minus first.
    pub change: f64,
    pub arrow: String,
}

impl Sparkline {
    pub fn new(label: &str, color: &str, values: Vec<f64>) -> Self {
        let change = match (values.first(), values.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };
        Self {
            label: label.to_string(),
            color: color.to_string(),
            latest: values.last().copied(),
            change,
            arrow: change_arrow(change).to_string(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewPanel {
    pub sentiment_score: f64,
    pub market_breadth: Sparkline,
    pub volatility: Sparkline,
}

pub fn overview_panel(sentiment_score: f64) -> OverviewPanel {
    OverviewPanel {
        sentiment_score,
        market_breadth: Sparkline::new("Market Breadth", "#16a34a", OVERVIEW_BREADTH.to_vec()),
        volatility: Sparkline::new("Volatility Index", "#ca8a04", OVERVIEW_VIX.to_vec()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPanel {
    pub score: f64,
    pub status: String,
    pub gauge: GaugeResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsPanel {
    pub range: TimeRange,
    pub index: Vec<TimeSeriesPoint>,
    pub index_trend: Option<SeriesTrend>,
    pub vix: Vec<TimeSeriesPoint>,
    pub vix_average: f64,
    pub vix_stress: VixStress,
    pub breadth: Vec<BreadthPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at_ms: i64,
    pub selected_index: MarketIndex,
    pub quote_line: String,
    pub overview: OverviewPanel,
    pub sentiment: SentimentPanel,
    pub metrics: Vec<MetricCard>,
    pub charts: ChartsPanel,
    pub macro_indicators: Vec<MacroView>,
    pub feed: FeedSummary,
    pub summary: AiSummary,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 of the compact JSON form, hex encoded.
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let body = self.to_json()?;
        std::fs::write(path, body).with_context(|| format!("writing snapshot to {}", path.display()))
    }

    pub fn summary_context(&self) -> SummaryContext {
        summary_context(&self.sentiment, &self.charts)
    }
}

fn summary_context(sentiment: &SentimentPanel, charts: &ChartsPanel) -> SummaryContext {
    SummaryContext {
        score: sentiment.score,
        zone_label: sentiment.status.clone(),
        vix: charts.vix.last().map(|p| p.value).unwrap_or(charts.vix_average),
        vix_stress: charts.vix_stress,
        ma50: charts.breadth.last().map(|p| p.ma50).unwrap_or(0.0),
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    gauge: GaugeGeometry,
    generator: MockSeriesGenerator<StdRng>,
    selected: MarketIndex,
    range: TimeRange,
    summary: Option<SummaryFeed>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let selected = find_index(&config.index_symbol)?;
        let rng = match config.series_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let gauge = GaugeGeometry::new(
            config.gauge_size,
            config.gauge_radius,
            config.needle_length,
            config.zones.clone(),
        );
        log(
            Level::Info,
            Domain::System,
            "dashboard_init",
            obj(&[
                ("index", v_str(&selected.symbol)),
                ("range", v_str(config.default_range.as_str())),
                ("seeded", serde_json::Value::Bool(config.series_seed.is_some())),
            ]),
        );
        Ok(Self {
            range: config.default_range,
            gauge,
            generator: MockSeriesGenerator::new(rng),
            selected,
            summary: None,
            config,
        })
    }

    pub fn selected_index(&self) -> &MarketIndex {
        &self.selected
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn gauge(&self) -> &GaugeGeometry {
        &self.gauge
    }

    pub fn select_index(&mut self, symbol: &str) -> Result<()> {
        self.selected = find_index(symbol)?;
        Ok(())
    }

    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
    }

    pub fn set_sentiment_score(&mut self, score: f64) {
        self.config.sentiment_score = score;
    }

    fn charts(&mut self, now_ms: i64) -> Result<ChartsPanel> {
        let range = self.range;
        let index = self.generator.index_for_range(
            SeriesRequest { range, start_value: self.selected.value },
            self.config.index_volatility,
            now_ms,
        )?;
        let vix = self
            .generator
            .vix_for_range(SeriesRequest { range, start_value: self.config.vix_start }, now_ms)?;
        let breadth = self
            .generator
            .breadth_for_range(range, self.config.ma50_start, self.config.ma200_start, now_ms)?;
        let (vix_average, vix_stress) =
            VixStress::of(&vix).ok_or_else(|| anyhow!("empty VIX series for {}", range))?;
        Ok(ChartsPanel {
            range,
            index_trend: SeriesTrend::of(&index),
            index,
            vix,
            vix_average,
            vix_stress,
            breadth,
        })
    }

    pub fn snapshot(&mut self, now_ms: i64) -> Result<DashboardSnapshot> {
        let _scope = ProfileScope::with_context("snapshot", &[("range", v_str(self.range.as_str()))]);

        let gauge = self.gauge.compute(self.config.sentiment_score);
        let sentiment = SentimentPanel {
            score: gauge.clamped_score,
            status: gauge.active_zone.label.clone(),
            gauge,
        };
        let charts = self.charts(now_ms)?;
        let thresholds = ImpactThresholds {
            bullish_above: self.config.impact_bullish_above,
            bearish_below: self.config.impact_bearish_below,
        };
        let feed = score_feed(&default_news(), &default_social(), &thresholds);

        let metrics: Vec<MetricCard> = default_metrics().iter().map(|m| m.card()).collect();
        let macro_indicators: Vec<MacroView> = default_indicators().iter().map(|m| m.view()).collect();
        log(
            Level::Debug,
            Domain::Metrics,
            "panels_built",
            obj(&[
                ("cards", v_num(metrics.len() as f64)),
                (
                    "risk_off",
                    v_num(macro_indicators.iter().filter(|v| v.impact == Impact::RiskOff).count() as f64),
                ),
            ]),
        );

        let ctx = summary_context(&sentiment, &charts);
        let summary = match &self.summary {
            Some(rotating) => rotating.current().clone(),
            None => {
                let rotating = SummaryFeed::new(self.generator.rng_mut(), &ctx, now_ms);
                let current = rotating.current().clone();
                self.summary = Some(rotating);
                current
            }
        };

        log(
            Level::Info,
            Domain::System,
            "snapshot_built",
            obj(&[
                ("index", v_str(&self.selected.symbol)),
                ("range", v_str(self.range.as_str())),
                ("score", v_num(sentiment.score)),
                ("vix_avg", v_num(charts.vix_average)),
                ("feed_net", v_num(feed.net_score)),
            ]),
        );

        Ok(DashboardSnapshot {
            generated_at_ms: now_ms,
            quote_line: self.selected.quote_line(),
            selected_index: self.selected.clone(),
            overview: overview_panel(sentiment.score),
            sentiment,
            metrics,
            charts,
            macro_indicators,
            feed,
            summary,
        })
    }

    /// Rotate the AI summary using the readings of `snapshot`.
    pub fn refresh_summary(&mut self, snapshot: &DashboardSnapshot, now_ms: i64) -> AiSummary {
        let ctx = snapshot.summary_context();
        let rng = self.generator.rng_mut();
        match self.summary.as_mut() {
            Some(feed) => feed.refresh(rng, &ctx, now_ms).clone(),
            None => {
                let feed = SummaryFeed::new(rng, &ctx, now_ms);
                let current = feed.current().clone();
                self.summary = Some(feed);
                current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_882_700_000;

    fn seeded(seed: u64) -> Dashboard {
        let cfg = DashboardConfig { series_seed: Some(seed), ..Default::default() };
        Dashboard::new(cfg).unwrap()
    }

    #[test]
    fn test_find_index() {
        assert_eq!(find_index("ixic").unwrap().name, "NASDAQ Composite");
        assert_eq!(find_index("russell2000").unwrap().symbol, "RUT");
        assert!(find_index("FTSE").is_err());
    }

    #[test]
    fn test_quote_line() {
        assert_eq!(find_index("SPX").unwrap().quote_line(), "4,567.89 +12.34 (+0.27%)");
        assert_eq!(find_index("RUT").unwrap().quote_line(), "1,987.65 -8.90 (-0.45%)");
    }

    #[test]
    fn test_unknown_index_rejected() {
        let cfg = DashboardConfig { index_symbol: "XYZ".to_string(), ..Default::default() };
        assert!(Dashboard::new(cfg).is_err());
        let mut dash = seeded(1);
        assert!(dash.select_index("XYZ").is_err());
        assert_eq!(dash.selected_index().symbol, "SPX");
    }

    #[test]
    fn test_snapshot_shapes_follow_range() {
        let mut dash = seeded(11);
        dash.set_range(TimeRange::OneWeek);
        let snap = dash.snapshot(NOW).unwrap();
        assert_eq!(snap.charts.index.len(), 7);
        assert_eq!(snap.charts.vix.len(), 7);
        assert_eq!(snap.charts.breadth.len(), 7);
        assert_eq!(snap.charts.index.last().unwrap().timestamp_ms, NOW);
        assert_eq!(snap.sentiment.status, "Neutral");
        assert_eq!(snap.metrics.len(), 5);
        assert_eq!(snap.macro_indicators.len(), 4);

        dash.set_range(TimeRange::OneDay);
        let snap = dash.snapshot(NOW).unwrap();
        assert_eq!(snap.charts.index.len(), 24);
        assert_eq!(snap.charts.range, TimeRange::OneDay);
    }

    #[test]
    fn test_digest_reproducible_for_seed() {
        let a = seeded(5).snapshot(NOW).unwrap();
        let b = seeded(5).snapshot(NOW).unwrap();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.digest().unwrap().len(), 64);
        let c = seeded(6).snapshot(NOW).unwrap();
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }

    #[test]
    fn test_summary_stable_until_refresh() {
        let mut dash = seeded(3);
        let first = dash.snapshot(NOW).unwrap();
        let second = dash.snapshot(NOW + 1_000).unwrap();
        assert_eq!(first.summary, second.summary);
        let rotated = dash.refresh_summary(&second, NOW + 30_000);
        assert_eq!(rotated.timestamp_ms, NOW + 30_000);
        let third = dash.snapshot(NOW + 31_000).unwrap();
        assert_eq!(third.summary, rotated);
    }

    #[test]
    fn test_overview_sparklines() {
        let snap = seeded(1).snapshot(NOW).unwrap();
        let breadth = &snap.overview.market_breadth;
        assert_eq!(breadth.values.len(), 12);
        assert_eq!(breadth.latest, Some(62.0));
        assert_eq!(breadth.change, 14.0);
        assert_eq!(breadth.arrow, "↑");
        let vix = &snap.overview.volatility;
        assert_eq!(vix.latest, Some(21.0));
        assert_eq!(vix.arrow, "↓");
        assert_eq!(snap.overview.sentiment_score, snap.sentiment.score);

        let empty = Sparkline::new("Empty", "#000000", Vec::new());
        assert_eq!(empty.latest, None);
        assert_eq!(empty.arrow, "→");
    }

    #[test]
    fn test_non_finite_vix_start_fails_snapshot() {
        let cfg = DashboardConfig { series_seed: Some(1), vix_start: f64::NAN, ..Default::default() };
        let mut dash = Dashboard::new(cfg).unwrap();
        assert!(dash.snapshot(NOW).is_err());
    }

    #[test]
    fn test_score_clamped_in_snapshot() {
        let mut dash = seeded(2);
        dash.set_sentiment_score(140.0);
        let snap = dash.snapshot(NOW).unwrap();
        assert_eq!(snap.sentiment.score, 100.0);
        assert_eq!(snap.sentiment.status, "Bullish");
    }
}
