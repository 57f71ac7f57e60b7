//! Templated "AI" market summary.
//!
//! Picks one of a fixed pool of commentary templates and fills it from the
//! current dashboard readings.

use chrono::{TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logging::{log, obj, v_num, v_str, Domain, Level};
use crate::series::VixStress;

pub const CONFIDENCE: f64 = 0.87;

const TEMPLATES: [&str; 5] = [
    "Overall sentiment reads {score}/100 ({zone}) with a defensive tilt. The VIX at {vix} points to {stress} stress and demand for protection is picking up. Inflation remains sticky, which could keep the Fed hawkish. Caution on the Nasdaq in the short term.",
    "Markets are showing resilience despite geopolitical tension. Sentiment at {score}/100 ({zone}) suggests measured greed while volatility stays contained with the VIX at {vix}. Macro data points to a sturdy economy. Bias remains constructive on technology.",
    "The technical pullback continues with selling pressure on large caps. A VIX of {vix} reflects {stress} investor nerves and breadth is thin with {ma50}% of stocks above their 50-day average. Flows are rotating into defensives. Watch key support levels.",
    "The rebound is gathering pace as risk appetite returns. Sentiment has improved to {score}/100 ({zone}), helped by solid earnings, and {ma50}% of stocks trade above their 50-day average. Momentum is confirmed on the major indices.",
    "Markets are trading in a narrow range with {stress} volatility (VIX {vix}). Indicators show a healthy consolidation after the recent correction and sentiment sits at {score}/100 ({zone}). Patience while waiting for a new directional catalyst.",
];

/// Readings the templates draw on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryContext {
    pub score: f64,
    pub zone_label: String,
    pub vix: f64,
    pub vix_stress: VixStress,
    pub ma50: f64,
}

impl SummaryContext {
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{score}", &format!("{:.0}", self.score))
            .replace("{zone}", &self.zone_label)
            .replace("{vix}", &format!("{:.1}", self.vix))
            .replace("{stress}", &self.vix_stress.as_str().to_lowercase())
            .replace("{ma50}", &format!("{:.1}", self.ma50))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSummary {
    pub text: String,
    pub template_index: usize,
    pub timestamp_ms: i64,
    pub updated_label: String,
    pub confidence: f64,
}

/// Short UTC label, e.g. `"19 Oct 14:05"`.
pub fn updated_label(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%-d %b %H:%M").to_string(),
        None => String::from("-"),
    }
}

pub fn template_count() -> usize {
    TEMPLATES.len()
}

pub fn generate<R: Rng>(rng: &mut R, ctx: &SummaryContext, now_ms: i64) -> AiSummary {
    let idx = rng.gen_range(0..TEMPLATES.len());
    build(idx, ctx, now_ms)
}

fn build(idx: usize, ctx: &SummaryContext, now_ms: i64) -> AiSummary {
    AiSummary {
        text: ctx.render(TEMPLATES[idx]),
        template_index: idx,
        timestamp_ms: now_ms,
        updated_label: updated_label(now_ms),
        confidence: CONFIDENCE,
    }
}

/// Holds the summary currently on display and rotates it on refresh.
#[derive(Debug, Clone)]
pub struct SummaryFeed {
    current: AiSummary,
    refreshes: u64,
}

impl SummaryFeed {
    pub fn new<R: Rng>(rng: &mut R, ctx: &SummaryContext, now_ms: i64) -> Self {
        Self {
            current: generate(rng, ctx, now_ms),
            refreshes: 0,
        }
    }

    pub fn current(&self) -> &AiSummary {
        &self.current
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Replace the summary. The same template may come up twice in a row.
    pub fn refresh<R: Rng>(&mut self, rng: &mut R, ctx: &SummaryContext, now_ms: i64) -> &AiSummary {
        self.current = generate(rng, ctx, now_ms);
        self.refreshes += 1;
        log(
            Level::Info,
            Domain::Summary,
            "summary_refreshed",
            obj(&[
                ("template", v_num(self.current.template_index as f64)),
                ("refreshes", v_num(self.refreshes as f64)),
                ("updated", v_str(&self.current.updated_label)),
            ]),
        );
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx() -> SummaryContext {
        SummaryContext {
            score: 58.0,
            zone_label: "Neutral".to_string(),
            vix: 22.14,
            vix_stress: VixStress::Moderate,
            ma50: 55.3,
        }
    }

    #[test]
    fn test_every_template_fully_rendered() {
        for (idx, template) in TEMPLATES.iter().enumerate() {
            let text = ctx().render(template);
            assert!(!text.contains('{'), "template {} left a placeholder: {}", idx, text);
        }
    }

    #[test]
    fn test_render_values() {
        let text = ctx().render(TEMPLATES[0]);
        assert!(text.contains("58/100 (Neutral)"));
        assert!(text.contains("VIX at 22.1"));
        assert!(text.contains("moderate stress"));
    }

    #[test]
    fn test_generate_is_seeded() {
        let a = generate(&mut StdRng::seed_from_u64(9), &ctx(), 0);
        let b = generate(&mut StdRng::seed_from_u64(9), &ctx(), 0);
        assert_eq!(a, b);
        assert!(a.template_index < template_count());
        assert_eq!(a.confidence, CONFIDENCE);
    }

    #[test]
    fn test_updated_label() {
        // 2025-10-19T14:05:00Z
        assert_eq!(updated_label(1_760_882_700_000), "19 Oct 14:05");
    }

    #[test]
    fn test_feed_refresh_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut feed = SummaryFeed::new(&mut rng, &ctx(), 1_000);
        assert_eq!(feed.refreshes(), 0);
        feed.refresh(&mut rng, &ctx(), 31_000);
        feed.refresh(&mut rng, &ctx(), 61_000);
        assert_eq!(feed.refreshes(), 2);
        assert_eq!(feed.current().timestamp_ms, 61_000);
    }
}
