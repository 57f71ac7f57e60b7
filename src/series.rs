//! Mock time-series generation for the chart panels.
//!
//! All models draw from an injected RNG so a fixed seed reproduces the exact
//! same series. Points are ordered oldest first and the last point sits on
//! the `now_ms` anchor supplied by the caller.

use anyhow::{anyhow, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::format::round_to;
use crate::logging::log_series;

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

pub const VIX_MEAN: f64 = 20.0;
pub const VIX_REVERSION: f64 = 0.1;
pub const VIX_SPIKE_PROB: f64 = 0.05;
pub const VIX_SPIKE_SPAN: f64 = 15.0;
pub const VIX_NOISE_SPAN: f64 = 2.0;
pub const VIX_MIN: f64 = 10.0;
pub const VIX_MAX: f64 = 50.0;

pub const BREADTH_TREND_AMPLITUDE: f64 = 0.1;
pub const BREADTH_NOISE_SPAN: f64 = 0.05;
pub const MA200_NOISE_SCALE: f64 = 0.8;
pub const MA50_BAND: (f64, f64) = (20.0, 80.0);
pub const MA200_BAND: (f64, f64) = (15.0, 75.0);
/// `ma200` start relative to `ma50` when only one start value is given.
pub const MA200_START_OFFSET: f64 = -7.0;

pub const WALK_TREND_AMPLITUDE: f64 = 0.01;
pub const DEFAULT_VOLATILITY: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp_ms: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreadthPoint {
    pub timestamp_ms: i64,
    pub ma50: f64,
    pub ma200: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::OneDay,
        TimeRange::OneWeek,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneDay => "1D",
            TimeRange::OneWeek => "1W",
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::OneYear => "1Y",
        }
    }

    /// Number of points in the window.
    pub fn points(&self) -> usize {
        match self {
            TimeRange::OneDay => 24,
            TimeRange::OneWeek => 7,
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::OneYear => 365,
        }
    }

    /// Spacing between points; intraday for 1D, daily otherwise.
    pub fn period_ms(&self) -> i64 {
        match self {
            TimeRange::OneDay => HOUR_MS,
            _ => DAY_MS,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        TimeRange::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("unknown time range '{}', expected one of 1D, 1W, 1M, 3M, 1Y", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeriesModel {
    RandomWalk { volatility: f64 },
    MeanRevertingVix,
    BoundedBreadthPair,
}

impl SeriesModel {
    pub fn name(&self) -> &'static str {
        match self {
            SeriesModel::RandomWalk { .. } => "random_walk",
            SeriesModel::MeanRevertingVix => "mean_reverting_vix",
            SeriesModel::BoundedBreadthPair => "bounded_breadth_pair",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub range: TimeRange,
    pub start_value: f64,
}

/// Output of a generation run; the breadth model yields two lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedSeries {
    Single(Vec<TimeSeriesPoint>),
    Pair(Vec<BreadthPoint>),
}

impl GeneratedSeries {
    pub fn len(&self) -> usize {
        match self {
            GeneratedSeries::Single(points) => points.len(),
            GeneratedSeries::Pair(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Timestamps spaced `period_ms` apart, ending on `now_ms`.
pub fn timestamps(length: usize, period_ms: i64, now_ms: i64) -> Result<Vec<i64>> {
    if length == 0 {
        return Err(anyhow!("series length must be positive"));
    }
    if period_ms <= 0 {
        return Err(anyhow!("series period must be positive, got {}ms", period_ms));
    }
    let span = i64::try_from(length - 1)
        .ok()
        .and_then(|steps| steps.checked_mul(period_ms))
        .and_then(|span| now_ms.checked_sub(span))
        .ok_or_else(|| anyhow!("{} points of {}ms do not fit before {}", length, period_ms, now_ms))?;
    Ok((0..length as i64).map(|k| span + k * period_ms).collect())
}

/// Rejects NaN and infinities.
fn require_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(anyhow!("{} must be finite, got {}", name, value))
    }
}

/// Uniform sample in `[-span/2, span/2)`.
fn centered<R: Rng>(rng: &mut R, span: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * span
}

pub struct MockSeriesGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> MockSeriesGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn generate(
        &mut self,
        model: SeriesModel,
        length: usize,
        start_value: f64,
        period_ms: i64,
        now_ms: i64,
    ) -> Result<GeneratedSeries> {
        match model {
            SeriesModel::RandomWalk { volatility } => self
                .random_walk(length, start_value, volatility, period_ms, now_ms)
                .map(GeneratedSeries::Single),
            SeriesModel::MeanRevertingVix => self
                .mean_reverting_vix(length, start_value, period_ms, now_ms)
                .map(GeneratedSeries::Single),
            SeriesModel::BoundedBreadthPair => {
                let (ma50, ma200) = (start_value, start_value + MA200_START_OFFSET);
                self.breadth_pair(length, ma50, ma200, period_ms, now_ms)
                    .map(GeneratedSeries::Pair)
            }
        }
    }

    /// Index price: proportional steps with a one-hump trend bias.
    pub fn random_walk(
        &mut self,
        length: usize,
        start_value: f64,
        volatility: f64,
        period_ms: i64,
        now_ms: i64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let ts = timestamps(length, period_ms, now_ms)?;
        let n = length as f64;
        let mut value = require_finite("start value", start_value)?;
        let volatility = require_finite("volatility", volatility)?;
        let mut out = Vec::with_capacity(length);
        for (k, timestamp_ms) in ts.into_iter().enumerate() {
            let i = (length - 1 - k) as f64;
            let trend = (i / n * PI).sin() * WALK_TREND_AMPLITUDE;
            let noise = centered(&mut self.rng, volatility);
            value += value * (trend + noise);
            out.push(TimeSeriesPoint { timestamp_ms, value: round_to(value, 2) });
        }
        log_endpoints(SeriesModel::RandomWalk { volatility }.name(), &out);
        Ok(out)
    }

    /// VIX: pulled toward 20 each step with occasional spikes, held in [10, 50].
    pub fn mean_reverting_vix(
        &mut self,
        length: usize,
        start_value: f64,
        period_ms: i64,
        now_ms: i64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let ts = timestamps(length, period_ms, now_ms)?;
        let mut vix = require_finite("VIX start", start_value)?;
        let mut out = Vec::with_capacity(length);
        for timestamp_ms in ts {
            let reversion = (VIX_MEAN - vix) * VIX_REVERSION;
            let spike = if self.rng.gen::<f64>() < VIX_SPIKE_PROB {
                centered(&mut self.rng, VIX_SPIKE_SPAN)
            } else {
                0.0
            };
            let noise = centered(&mut self.rng, VIX_NOISE_SPAN);
            vix = (vix + reversion + spike + noise).clamp(VIX_MIN, VIX_MAX);
            out.push(TimeSeriesPoint { timestamp_ms, value: round_to(vix, 1) });
        }
        log_endpoints(SeriesModel::MeanRevertingVix.name(), &out);
        Ok(out)
    }

    /// Share of stocks above their 50/200-day averages, sharing one
    /// oscillating trend with independent noise.
    pub fn breadth_pair(
        &mut self,
        length: usize,
        ma50_start: f64,
        ma200_start: f64,
        period_ms: i64,
        now_ms: i64,
    ) -> Result<Vec<BreadthPoint>> {
        let ts = timestamps(length, period_ms, now_ms)?;
        let n = length as f64;
        let mut ma50 = require_finite("ma50 start", ma50_start)?;
        let mut ma200 = require_finite("ma200 start", ma200_start)?;
        let mut out = Vec::with_capacity(length);
        for (k, timestamp_ms) in ts.into_iter().enumerate() {
            let i = (length - 1 - k) as f64;
            let trend = (i / n * PI * 2.0).sin() * BREADTH_TREND_AMPLITUDE;
            let noise50 = centered(&mut self.rng, BREADTH_NOISE_SPAN);
            let noise200 = centered(&mut self.rng, BREADTH_NOISE_SPAN) * MA200_NOISE_SCALE;
            ma50 = (ma50 + trend + noise50).clamp(MA50_BAND.0, MA50_BAND.1);
            ma200 = (ma200 + trend + noise200).clamp(MA200_BAND.0, MA200_BAND.1);
            out.push(BreadthPoint {
                timestamp_ms,
                ma50: round_to(ma50, 1),
                ma200: round_to(ma200, 1),
            });
        }
        if let (Some(first), Some(last)) = (out.first(), out.last()) {
            log_series(SeriesModel::BoundedBreadthPair.name(), out.len(), first.ma50, last.ma50);
        }
        Ok(out)
    }

    pub fn generate_for_range(&mut self, model: SeriesModel, request: SeriesRequest, now_ms: i64) -> Result<GeneratedSeries> {
        let range = request.range;
        self.generate(model, range.points(), request.start_value, range.period_ms(), now_ms)
    }

    pub fn index_for_range(&mut self, request: SeriesRequest, volatility: f64, now_ms: i64) -> Result<Vec<TimeSeriesPoint>> {
        let range = request.range;
        self.random_walk(range.points(), request.start_value, volatility, range.period_ms(), now_ms)
    }

    pub fn vix_for_range(&mut self, request: SeriesRequest, now_ms: i64) -> Result<Vec<TimeSeriesPoint>> {
        let range = request.range;
        self.mean_reverting_vix(range.points(), request.start_value, range.period_ms(), now_ms)
    }

    pub fn breadth_for_range(
        &mut self,
        range: TimeRange,
        ma50_start: f64,
        ma200_start: f64,
        now_ms: i64,
    ) -> Result<Vec<BreadthPoint>> {
        self.breadth_pair(range.points(), ma50_start, ma200_start, range.period_ms(), now_ms)
    }
}

fn log_endpoints(model: &str, points: &[TimeSeriesPoint]) {
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        log_series(model, points.len(), first.value, last.value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesTrend {
    Bullish,
    Bearish,
}

impl SeriesTrend {
    /// Bullish only when the last value is strictly above the first.
    pub fn of(points: &[TimeSeriesPoint]) -> Option<Self> {
        let (first, last) = (points.first()?, points.last()?);
        Some(if last.value > first.value {
            SeriesTrend::Bullish
        } else {
            SeriesTrend::Bearish
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VixStress {
    Low,
    Moderate,
    High,
}

impl VixStress {
    pub fn from_level(avg: f64) -> Self {
        if avg <= 20.0 {
            VixStress::Low
        } else if avg <= 30.0 {
            VixStress::Moderate
        } else {
            VixStress::High
        }
    }

    /// Stress of the window average.
    pub fn of(points: &[TimeSeriesPoint]) -> Option<(f64, Self)> {
        if points.is_empty() {
            return None;
        }
        let avg = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;
        Some((avg, VixStress::from_level(avg)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VixStress::Low => "Low",
            VixStress::Moderate => "Moderate",
            VixStress::High => "High",
        }
    }
}
