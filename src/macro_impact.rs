//! Macro indicator impact assessment.
//!
//! The thresholds are placeholder business rules carried over from the mock
//! dashboard, not a calibrated model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↗",
            Trend::Down => "↘",
            Trend::Stable => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    RiskOn,
    RiskOff,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactRule {
    /// Rising above `strong` supports risk; falling or below `weak` weighs on it.
    Growth { strong: f64, weak: f64 },
    /// Level thresholds only.
    Level { risk_off_above: f64, risk_on_below: f64 },
    /// Direction of travel only.
    Direction { rising: Impact, falling: Impact },
}

impl ImpactRule {
    pub fn assess(&self, value: f64, trend: Trend) -> Impact {
        match *self {
            ImpactRule::Growth { strong, weak } => {
                if trend == Trend::Up && value > strong {
                    Impact::RiskOn
                } else if trend == Trend::Down || value < weak {
                    Impact::RiskOff
                } else {
                    Impact::Neutral
                }
            }
            ImpactRule::Level { risk_off_above, risk_on_below } => {
                if value > risk_off_above {
                    Impact::RiskOff
                } else if value < risk_on_below {
                    Impact::RiskOn
                } else {
                    Impact::Neutral
                }
            }
            ImpactRule::Direction { rising, falling } => match trend {
                Trend::Up => rising,
                Trend::Down => falling,
                Trend::Stable => Impact::Neutral,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroKind {
    Gdp,
    Cpi,
    Unemployment,
    FedFunds,
}

pub struct MacroSpec {
    pub label: &'static str,
    pub rule: ImpactRule,
    pub decimals: usize,
    /// Descriptions for risk-on, risk-off, neutral.
    pub notes: [&'static str; 3],
}

impl MacroKind {
    pub fn spec(&self) -> MacroSpec {
        match self {
            MacroKind::Gdp => MacroSpec {
                label: "US GDP",
                rule: ImpactRule::Growth { strong: 2.0, weak: 1.5 },
                decimals: 1,
                notes: [
                    "Solid growth supports equities",
                    "Weak growth pressures equities",
                    "Moderate growth, neutral",
                ],
            },
            MacroKind::Cpi => MacroSpec {
                label: "Inflation (CPI)",
                rule: ImpactRule::Level { risk_off_above: 3.5, risk_on_below: 2.0 },
                decimals: 1,
                notes: [
                    "Contained inflation lets the Fed ease",
                    "Hot inflation keeps the Fed hawkish",
                    "Moderate inflation, Fed cautious",
                ],
            },
            MacroKind::Unemployment => MacroSpec {
                label: "Unemployment / NFP",
                rule: ImpactRule::Level { risk_off_above: 5.0, risk_on_below: 4.0 },
                decimals: 1,
                notes: [
                    "Strong labour market, robust economy",
                    "Rising joblessness signals weakness",
                    "Stable employment, neutral",
                ],
            },
            MacroKind::FedFunds => MacroSpec {
                label: "Fed Funds Rate",
                rule: ImpactRule::Direction { rising: Impact::RiskOff, falling: Impact::RiskOn },
                decimals: 2,
                notes: [
                    "Rate cuts, accommodative policy",
                    "Rate hikes tighten conditions",
                    "Rates on hold, neutral policy",
                ],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub kind: MacroKind,
    pub value: f64,
    pub previous: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroView {
    pub label: String,
    pub display_value: String,
    pub previous_display: String,
    pub delta: f64,
    pub arrow: String,
    pub impact: Impact,
    pub description: String,
}

impl MacroIndicator {
    pub fn new(kind: MacroKind, value: f64, previous: f64, trend: Trend) -> Self {
        Self { kind, value, previous, trend }
    }

    pub fn impact(&self) -> Impact {
        self.kind.spec().rule.assess(self.value, self.trend)
    }

    pub fn view(&self) -> MacroView {
        let spec = self.kind.spec();
        let impact = spec.rule.assess(self.value, self.trend);
        let note = match impact {
            Impact::RiskOn => spec.notes[0],
            Impact::RiskOff => spec.notes[1],
            Impact::Neutral => spec.notes[2],
        };
        MacroView {
            label: spec.label.to_string(),
            display_value: format!("{:.*}%", spec.decimals, self.value),
            previous_display: format!("{:.*}%", spec.decimals, self.previous),
            delta: self.value - self.previous,
            arrow: self.trend.arrow().to_string(),
            impact,
            description: note.to_string(),
        }
    }
}

pub fn default_indicators() -> Vec<MacroIndicator> {
    vec![
        MacroIndicator::new(MacroKind::Gdp, 2.1, 1.8, Trend::Up),
        MacroIndicator::new(MacroKind::Cpi, 3.1, 3.2, Trend::Down),
        MacroIndicator::new(MacroKind::Unemployment, 3.7, 3.8, Trend::Down),
        MacroIndicator::new(MacroKind::FedFunds, 5.25, 5.25, Trend::Stable),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_impacts() {
        let impacts: Vec<Impact> = default_indicators().iter().map(|m| m.impact()).collect();
        assert_eq!(impacts, vec![Impact::RiskOn, Impact::Neutral, Impact::RiskOn, Impact::Neutral]);
    }

    #[test]
    fn test_growth_rule() {
        let rule = MacroKind::Gdp.spec().rule;
        assert_eq!(rule.assess(2.5, Trend::Up), Impact::RiskOn);
        assert_eq!(rule.assess(2.5, Trend::Down), Impact::RiskOff);
        assert_eq!(rule.assess(1.2, Trend::Stable), Impact::RiskOff);
        assert_eq!(rule.assess(1.8, Trend::Up), Impact::Neutral);
    }

    #[test]
    fn test_level_rules() {
        assert_eq!(MacroKind::Cpi.spec().rule.assess(4.0, Trend::Up), Impact::RiskOff);
        assert_eq!(MacroKind::Cpi.spec().rule.assess(1.9, Trend::Down), Impact::RiskOn);
        assert_eq!(MacroKind::Unemployment.spec().rule.assess(5.5, Trend::Up), Impact::RiskOff);
        assert_eq!(MacroKind::Unemployment.spec().rule.assess(4.5, Trend::Up), Impact::Neutral);
    }

    #[test]
    fn test_direction_rule() {
        let rule = MacroKind::FedFunds.spec().rule;
        assert_eq!(rule.assess(5.5, Trend::Up), Impact::RiskOff);
        assert_eq!(rule.assess(5.0, Trend::Down), Impact::RiskOn);
    }

    #[test]
    fn test_view_formatting() {
        let fed = MacroIndicator::new(MacroKind::FedFunds, 5.25, 5.5, Trend::Down).view();
        assert_eq!(fed.display_value, "5.25%");
        assert_eq!(fed.previous_display, "5.50%");
        assert_eq!(fed.impact, Impact::RiskOn);
        assert_eq!(fed.description, "Rate cuts, accommodative policy");
        let gdp = default_indicators()[0].view();
        assert_eq!(gdp.display_value, "2.1%");
        assert_eq!(gdp.arrow, "↗");
    }
}
