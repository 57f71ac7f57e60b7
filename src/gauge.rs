//! Sentiment gauge geometry.
//!
//! Maps a 0-100 score onto a half-circle dial: needle rotation, the zone the
//! score falls in, and SVG arc paths for each colored zone. Angles are in
//! degrees with 0 at the top of the dial, increasing clockwise.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::format::format_coord;
use crate::logging::{log_gauge, log_warn, Domain};

pub const DEFAULT_SIZE: f64 = 280.0;
pub const DEFAULT_RADIUS: f64 = 100.0;
pub const DEFAULT_NEEDLE_LENGTH: f64 = 75.0;
/// Distance of zone range labels outside the arc.
pub const LABEL_OFFSET: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub min: f64,
    pub max: f64,
    pub color: String,
    pub label: String,
}

impl Zone {
    pub fn new(min: f64, max: f64, color: &str, label: &str) -> Self {
        Self {
            min,
            max,
            color: color.to_string(),
            label: label.to_string(),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }

    pub fn start_angle(&self) -> f64 {
        (self.min / 100.0) * 180.0
    }

    pub fn end_angle(&self) -> f64 {
        (self.max / 100.0) * 180.0
    }
}

pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new(0.0, 39.0, "#dc2626", "Bearish"),
        Zone::new(40.0, 69.0, "#ca8a04", "Neutral"),
        Zone::new(70.0, 100.0, "#16a34a", "Bullish"),
    ]
}

/// Check that zones are ordered, non-overlapping, at most one integer step
/// apart, and span [0, 100].
pub fn validate_zones(zones: &[Zone]) -> Result<()> {
    let first = zones.first().ok_or_else(|| anyhow!("zone list is empty"))?;
    let last = zones.last().ok_or_else(|| anyhow!("zone list is empty"))?;
    if first.min != 0.0 {
        return Err(anyhow!("first zone starts at {}, expected 0", first.min));
    }
    if last.max != 100.0 {
        return Err(anyhow!("last zone ends at {}, expected 100", last.max));
    }
    for zone in zones {
        if !(zone.min <= zone.max) {
            return Err(anyhow!("zone '{}' has min {} > max {}", zone.label, zone.min, zone.max));
        }
    }
    for pair in zones.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.min <= prev.max {
            return Err(anyhow!(
                "zones '{}' and '{}' overlap at {}",
                prev.label,
                next.label,
                next.min
            ));
        }
        if next.min - prev.max > 1.0 {
            return Err(anyhow!(
                "gap between '{}' ({}) and '{}' ({})",
                prev.label,
                prev.max,
                next.label,
                next.min
            ));
        }
    }
    Ok(())
}

/// Parse `min:max:color:label` entries separated by commas.
pub fn parse_zones(raw: &str) -> Result<Vec<Zone>> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.trim().splitn(4, ':').collect();
            if parts.len() != 4 {
                return Err(anyhow!("expected min:max:color:label, got '{}'", entry.trim()));
            }
            let min: f64 = parts[0].trim().parse().with_context(|| format!("bad zone min '{}'", parts[0]))?;
            let max: f64 = parts[1].trim().parse().with_context(|| format!("bad zone max '{}'", parts[1]))?;
            Ok(Zone::new(min, max, parts[2].trim(), parts[3].trim()))
        })
        .collect()
}

/// NaN is not a valid score and is treated as 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Needle angle for a raw score: -90 at 0, +90 at 100.
pub fn needle_rotation(score: f64) -> f64 {
    (clamp_score(score) / 100.0) * 180.0 - 90.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0).to_radians();
    Point {
        x: cx + radius * rad.cos(),
        y: cy + radius * rad.sin(),
    }
}

/// SVG path for an arc from `start_deg` to `end_deg`, drawn from the end point
/// back to the start point.
pub fn arc_path(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> String {
    let start = polar_to_cartesian(cx, cy, radius, end_deg);
    let end = polar_to_cartesian(cx, cy, radius, start_deg);
    let large_arc = if end_deg - start_deg <= 180.0 { 0 } else { 1 };
    format!(
        "M {} {} A {} {} 0 {} 0 {} {}",
        format_coord(start.x),
        format_coord(start.y),
        format_coord(radius),
        format_coord(radius),
        large_arc,
        format_coord(end.x),
        format_coord(end.y)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum RiskStance {
    RiskOn,
    Neutral,
    RiskOff,
}

impl RiskStance {
    /// Stance for the zone at `index` of `count` ordered zones: the lowest
    /// zone is risk-off, the highest risk-on, anything between neutral.
    pub fn for_zone(index: usize, count: usize) -> Self {
        if count < 2 {
            RiskStance::Neutral
        } else if index == 0 {
            RiskStance::RiskOff
        } else if index + 1 >= count {
            RiskStance::RiskOn
        } else {
            RiskStance::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStance::RiskOn => "RISK-ON",
            RiskStance::Neutral => "NEUTRAL",
            RiskStance::RiskOff => "RISK-OFF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneArc {
    pub label: String,
    pub color: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLabel {
    pub text: String,
    pub anchor: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeResult {
    pub score: f64,
    pub clamped_score: f64,
    pub needle_rotation_degrees: f64,
    pub needle_tip: Point,
    pub active_zone: Zone,
    pub risk: RiskStance,
    pub background_path: String,
    pub arc_paths: Vec<ZoneArc>,
    pub labels: Vec<ZoneLabel>,
}

#[derive(Debug, Clone)]
pub struct GaugeGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub needle_length: f64,
    zones: Vec<Zone>,
}

impl Default for GaugeGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_RADIUS, DEFAULT_NEEDLE_LENGTH, default_zones())
    }
}

impl GaugeGeometry {
    /// Zones are kept in ascending `min` order. An empty list falls back to
    /// the default zones.
    pub fn new(size: f64, radius: f64, needle_length: f64, zones: Vec<Zone>) -> Self {
        let mut zones = if zones.is_empty() {
            log_warn(Domain::Gauge, "empty_zones", "no zones configured, using defaults");
            default_zones()
        } else {
            zones
        };
        zones.sort_by(|a, b| a.min.total_cmp(&b.min));
        Self {
            center_x: size / 2.0,
            center_y: size / 2.0,
            radius,
            needle_length,
            zones,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// First zone containing the clamped score, else the first zone.
    pub fn active_zone(&self, score: f64) -> &Zone {
        &self.zones[self.active_zone_index(score)]
    }

    /// Position of the first zone containing the clamped score, 0 if none does.
    pub fn active_zone_index(&self, score: f64) -> usize {
        let c = clamp_score(score);
        self.zones.iter().position(|z| z.contains(c)).unwrap_or(0)
    }

    pub fn risk_stance(&self, score: f64) -> RiskStance {
        RiskStance::for_zone(self.active_zone_index(score), self.zones.len())
    }

    pub fn needle_tip(&self, score: f64) -> Point {
        let r = needle_rotation(score).to_radians();
        Point {
            x: self.center_x + self.needle_length * r.sin(),
            y: self.center_y - self.needle_length * r.cos(),
        }
    }

    pub fn zone_arcs(&self) -> Vec<ZoneArc> {
        self.zones
            .iter()
            .map(|z| ZoneArc {
                label: z.label.clone(),
                color: z.color.clone(),
                start_angle: z.start_angle(),
                end_angle: z.end_angle(),
                path: arc_path(self.center_x, self.center_y, self.radius, z.start_angle(), z.end_angle()),
            })
            .collect()
    }

    pub fn zone_labels(&self) -> Vec<ZoneLabel> {
        self.zones
            .iter()
            .map(|z| {
                let mid = ((z.min + z.max) / 2.0 / 100.0) * 180.0;
                ZoneLabel {
                    text: format!("{}-{}", z.min, z.max),
                    anchor: polar_to_cartesian(self.center_x, self.center_y, self.radius + LABEL_OFFSET, mid),
                }
            })
            .collect()
    }

    pub fn compute(&self, score: f64) -> GaugeResult {
        let clamped = clamp_score(score);
        let rotation = needle_rotation(clamped);
        let zone = self.active_zone(clamped).clone();
        log_gauge(score, clamped, &zone.label, rotation);
        GaugeResult {
            score,
            clamped_score: clamped,
            needle_rotation_degrees: rotation,
            needle_tip: self.needle_tip(clamped),
            risk: self.risk_stance(clamped),
            active_zone: zone,
            background_path: arc_path(self.center_x, self.center_y, self.radius, 0.0, 180.0),
            arc_paths: self.zone_arcs(),
            labels: self.zone_labels(),
        }
    }

    /// Standalone SVG document for the gauge at `score`.
    pub fn render_svg(&self, score: f64) -> String {
        let g = self.compute(score);
        let size = self.center_x * 2.0;
        let (cx, cy) = (format_coord(self.center_x), format_coord(self.center_y));
        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{s}\" height=\"{s}\" viewBox=\"0 0 {s} {s}\">\n",
            s = format_coord(size)
        ));
        out.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"rgba(255,255,255,0.1)\" stroke-width=\"16\" stroke-linecap=\"round\"/>\n",
            g.background_path
        ));
        for arc in &g.arc_paths {
            out.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"16\" stroke-linecap=\"round\" opacity=\"0.9\"/>\n",
                arc.path, arc.color
            ));
        }
        out.push_str(&format!(
            "  <g transform=\"rotate({} {} {})\">\n",
            format_coord(g.needle_rotation_degrees),
            cx,
            cy
        ));
        out.push_str(&format!(
            "    <line x1=\"{cx}\" y1=\"{cy}\" x2=\"{cx}\" y2=\"{}\" stroke=\"white\" stroke-width=\"4\" stroke-linecap=\"round\"/>\n",
            format_coord(self.center_y - self.needle_length),
        ));
        out.push_str(&format!("    <circle cx=\"{cx}\" cy=\"{cy}\" r=\"6\" fill=\"white\"/>\n"));
        out.push_str("  </g>\n");
        for label in &g.labels {
            out.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-size=\"12\" fill=\"rgba(255,255,255,0.6)\">{}</text>\n",
                format_coord(label.anchor.x),
                format_coord(label.anchor.y),
                label.text
            ));
        }
        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-12.0), 0.0);
        assert_eq!(clamp_score(250.0), 100.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 100.0);
        assert_eq!(clamp_score(58.0), 58.0);
    }

    #[test]
    fn test_needle_rotation_endpoints() {
        assert!(approx(needle_rotation(0.0), -90.0));
        assert!(approx(needle_rotation(50.0), 0.0));
        assert!(approx(needle_rotation(75.0), 45.0));
        assert!(approx(needle_rotation(100.0), 90.0));
        assert!(approx(needle_rotation(-40.0), -90.0));
    }

    #[test]
    fn test_polar_top_is_zero_degrees() {
        let p = polar_to_cartesian(140.0, 140.0, 100.0, 0.0);
        assert!(approx(p.x, 140.0));
        assert!(approx(p.y, 40.0));
        let p = polar_to_cartesian(140.0, 140.0, 100.0, 90.0);
        assert!(approx(p.x, 240.0));
        assert!(approx(p.y, 140.0));
    }

    #[test]
    fn test_background_arc_path() {
        assert_eq!(arc_path(140.0, 140.0, 100.0, 0.0, 180.0), "M 140 240 A 100 100 0 0 0 140 40");
    }

    #[test]
    fn test_risk_follows_configured_zones() {
        let zones = vec![
            Zone::new(0.0, 49.0, "#ff0000", "Fear"),
            Zone::new(50.0, 100.0, "#00ff00", "Greed"),
        ];
        let g = GaugeGeometry::new(280.0, 100.0, 75.0, zones);
        let r = g.compute(60.0);
        assert_eq!(r.active_zone.label, "Greed");
        assert_eq!(r.risk, RiskStance::RiskOn);
        assert_eq!(g.compute(45.0).risk, RiskStance::RiskOff);
    }

    #[test]
    fn test_neutral_zone_arc_path() {
        let arcs = GaugeGeometry::default().zone_arcs();
        assert_eq!(arcs[1].label, "Neutral");
        assert_eq!(arcs[1].path, "M 222.708 196.208 A 100 100 0 0 0 235.106 109.098");
    }

    #[test]
    fn test_large_arc_flag() {
        assert!(arc_path(100.0, 100.0, 80.0, 0.0, 180.0).contains(" 0 0 0 "));
        assert!(arc_path(100.0, 100.0, 80.0, 0.0, 270.0).contains(" 0 1 0 "));
    }

    #[test]
    fn test_boundary_scores() {
        let g = GaugeGeometry::default();
        assert_eq!(g.active_zone(39.0).label, "Bearish");
        assert_eq!(g.active_zone(40.0).label, "Neutral");
        assert_eq!(g.active_zone(69.0).label, "Neutral");
        assert_eq!(g.active_zone(70.0).label, "Bullish");
        // falls in the integer gap, resolves to the first zone
        assert_eq!(g.active_zone(39.5).label, "Bearish");
    }

    #[test]
    fn test_overlap_first_match_wins() {
        let zones = vec![
            Zone::new(0.0, 60.0, "#111111", "Low"),
            Zone::new(50.0, 100.0, "#222222", "High"),
        ];
        let g = GaugeGeometry::new(200.0, 80.0, 60.0, zones);
        assert_eq!(g.active_zone(55.0).label, "Low");
        assert_eq!(g.active_zone(61.0).label, "High");
    }

    #[test]
    fn test_zones_sorted_on_construction() {
        let mut zones = default_zones();
        zones.reverse();
        let g = GaugeGeometry::new(280.0, 100.0, 75.0, zones);
        assert_eq!(g.zones()[0].label, "Bearish");
        assert_eq!(g.zones()[2].label, "Bullish");
    }

    #[test]
    fn test_empty_zones_fall_back() {
        let g = GaugeGeometry::new(280.0, 100.0, 75.0, Vec::new());
        assert_eq!(g.zones().len(), 3);
    }

    #[test]
    fn test_validate_zones() {
        assert!(validate_zones(&default_zones()).is_ok());
        let gap = vec![Zone::new(0.0, 30.0, "#a", "A"), Zone::new(40.0, 100.0, "#b", "B")];
        assert!(validate_zones(&gap).is_err());
        let overlap = vec![Zone::new(0.0, 50.0, "#a", "A"), Zone::new(50.0, 100.0, "#b", "B")];
        assert!(validate_zones(&overlap).is_err());
        let short = vec![Zone::new(0.0, 90.0, "#a", "A")];
        assert!(validate_zones(&short).is_err());
        assert!(validate_zones(&[]).is_err());
    }

    #[test]
    fn test_parse_zones() {
        let zones = parse_zones("0:49:#ff0000:Fear, 50:100:#00ff00:Greed").unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].label, "Greed");
        assert_eq!(zones[1].min, 50.0);
        assert!(parse_zones("0:49:#ff0000").is_err());
        assert!(parse_zones("zero:49:#ff0000:Fear").is_err());
    }

    #[test]
    fn test_needle_tip() {
        let g = GaugeGeometry::default();
        let up = g.needle_tip(50.0);
        assert!(approx(up.x, 140.0));
        assert!(approx(up.y, 65.0));
        let left = g.needle_tip(0.0);
        assert!(approx(left.x, 65.0));
        assert!(approx(left.y, 140.0));
    }

    #[test]
    fn test_compute_bullish_score() {
        let g = GaugeGeometry::default();
        let r = g.compute(75.0);
        assert_eq!(r.active_zone.label, "Bullish");
        assert!(approx(r.needle_rotation_degrees, 45.0));
        assert_eq!(r.risk, RiskStance::RiskOn);
        assert_eq!(r.arc_paths.len(), 3);
        assert_eq!(r.labels[0].text, "0-39");
    }

    #[test]
    fn test_risk_stance() {
        let g = GaugeGeometry::default();
        assert_eq!(g.risk_stance(39.0), RiskStance::RiskOff);
        assert_eq!(g.risk_stance(58.0), RiskStance::Neutral);
        assert_eq!(g.risk_stance(70.0), RiskStance::RiskOn);
        assert_eq!(RiskStance::for_zone(0, 1), RiskStance::Neutral);
        assert_eq!(RiskStance::RiskOff.as_str(), "RISK-OFF");
    }

    #[test]
    fn test_render_svg_contains_parts() {
        let svg = GaugeGeometry::default().render_svg(58.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("rotate(14.4 140 140)"));
        assert_eq!(svg.matches("<path").count(), 4);
        assert!(svg.contains(">40-69<"));
    }
}
