//! Metric cards: tone classification and display formatting.
//!
//! Each metric kind carries its own threshold rule, so adding a metric is a
//! new table entry rather than another branch on its name.

use serde::{Deserialize, Serialize};

use crate::format::change_arrow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Caution,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdRule {
    /// Higher readings are better.
    AtLeast { positive: f64, caution: f64 },
    /// Lower readings are better.
    AtMost { positive: f64, caution: f64 },
    /// Readings inside the inner band are best, the outer band is tolerable.
    Band { positive: (f64, f64), caution: (f64, f64) },
    /// No level thresholds; judge the change against `positive_is_good`.
    ChangeDirection,
}

impl ThresholdRule {
    pub fn tone(&self, metric: &Metric) -> Tone {
        let v = metric.value;
        match *self {
            ThresholdRule::AtLeast { positive, caution } => {
                if v >= positive {
                    Tone::Positive
                } else if v >= caution {
                    Tone::Caution
                } else {
                    Tone::Negative
                }
            }
            ThresholdRule::AtMost { positive, caution } => {
                if v <= positive {
                    Tone::Positive
                } else if v <= caution {
                    Tone::Caution
                } else {
                    Tone::Negative
                }
            }
            ThresholdRule::Band { positive, caution } => {
                if v >= positive.0 && v <= positive.1 {
                    Tone::Positive
                } else if v >= caution.0 && v <= caution.1 {
                    Tone::Caution
                } else {
                    Tone::Negative
                }
            }
            ThresholdRule::ChangeDirection => {
                if metric.change == 0.0 {
                    Tone::Caution
                } else if (metric.change > 0.0) == metric.positive_is_good {
                    Tone::Positive
                } else {
                    Tone::Negative
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    FearGreed,
    Vix,
    PutCallRatio,
    Dxy,
    TenYearYield,
    Custom(String),
}

/// Table entry describing how a metric is judged and shown.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub label: &'static str,
    pub rule: ThresholdRule,
    /// `None` renders the raw value.
    pub decimals: Option<usize>,
    pub suffix: &'static str,
}

impl MetricKind {
    pub fn spec(&self) -> MetricSpec {
        match self {
            MetricKind::FearGreed => MetricSpec {
                label: "Fear & Greed Index",
                rule: ThresholdRule::AtLeast { positive: 70.0, caution: 40.0 },
                decimals: None,
                suffix: "",
            },
            MetricKind::Vix => MetricSpec {
                label: "VIX",
                rule: ThresholdRule::AtMost { positive: 20.0, caution: 30.0 },
                decimals: Some(1),
                suffix: "",
            },
            MetricKind::PutCallRatio => MetricSpec {
                label: "Put/Call Ratio",
                rule: ThresholdRule::AtMost { positive: 0.7, caution: 1.0 },
                decimals: Some(2),
                suffix: "",
            },
            MetricKind::Dxy => MetricSpec {
                label: "DXY",
                rule: ThresholdRule::Band { positive: (100.0, 110.0), caution: (95.0, 115.0) },
                decimals: Some(2),
                suffix: "",
            },
            MetricKind::TenYearYield => MetricSpec {
                label: "10Y Yield",
                rule: ThresholdRule::Band { positive: (3.5, 5.0), caution: (2.5, 6.0) },
                decimals: Some(2),
                suffix: "%",
            },
            MetricKind::Custom(_) => MetricSpec {
                label: "",
                rule: ThresholdRule::ChangeDirection,
                decimals: None,
                suffix: "",
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            MetricKind::Custom(name) => name.clone(),
            other => other.spec().label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    pub value: f64,
    /// Fractional change from the previous period, 0.05 = 5%.
    pub change: f64,
    pub positive_is_good: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub title: String,
    pub display_value: String,
    pub change_display: Option<String>,
    pub arrow: String,
    pub tone: Tone,
}

impl Metric {
    pub fn new(kind: MetricKind, value: f64, change: f64, positive_is_good: bool) -> Self {
        Self { kind, value, change, positive_is_good }
    }

    pub fn tone(&self) -> Tone {
        self.kind.spec().rule.tone(self)
    }

    pub fn display_value(&self) -> String {
        let spec = self.kind.spec();
        match spec.decimals {
            Some(d) => format!("{:.*}{}", d, self.value, spec.suffix),
            None => format!("{}{}", self.value, spec.suffix),
        }
    }

    /// Magnitude of the change as a percentage, absent when unchanged.
    pub fn change_display(&self) -> Option<String> {
        if self.change == 0.0 {
            None
        } else {
            Some(format!("{:.1}%", (self.change * 100.0).abs()))
        }
    }

    pub fn card(&self) -> MetricCard {
        MetricCard {
            title: self.kind.label(),
            display_value: self.display_value(),
            change_display: self.change_display(),
            arrow: change_arrow(self.change).to_string(),
            tone: self.tone(),
        }
    }
}

pub fn default_metrics() -> Vec<Metric> {
    vec![
        Metric::new(MetricKind::FearGreed, 58.0, 0.12, true),
        Metric::new(MetricKind::Vix, 22.1, -0.08, false),
        Metric::new(MetricKind::PutCallRatio, 0.85, 0.15, false),
        Metric::new(MetricKind::Dxy, 103.45, 0.03, false),
        Metric::new(MetricKind::TenYearYield, 4.25, 0.05, false),
    ]
}
