//! News and social feed scoring.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::logging::{log, obj, v_num, Domain, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn weight(&self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Negative => -1.0,
            Sentiment::Neutral => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuzzLevel {
    High,
    Moderate,
    Low,
}

impl BuzzLevel {
    pub fn from_buzz(buzz: u8) -> Self {
        if buzz >= 80 {
            BuzzLevel::High
        } else if buzz >= 60 {
            BuzzLevel::Moderate
        } else {
            BuzzLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketImpact {
    Bullish,
    Bearish,
    Neutral,
}

/// Cut-offs on `weight(sentiment) * buzz / 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactThresholds {
    pub bullish_above: f64,
    pub bearish_below: f64,
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            bullish_above: 0.5,
            bearish_below: -0.5,
        }
    }
}

impl ImpactThresholds {
    pub fn score(sentiment: Sentiment, buzz: u8) -> f64 {
        sentiment.weight() * f64::from(buzz.min(100)) / 100.0
    }

    pub fn classify(&self, sentiment: Sentiment, buzz: u8) -> MarketImpact {
        let total = Self::score(sentiment, buzz);
        if total > self.bullish_above {
            MarketImpact::Bullish
        } else if total < self.bearish_below {
            MarketImpact::Bearish
        } else {
            MarketImpact::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub headline: String,
    pub sentiment: Sentiment,
    /// Attention level, 0-100.
    pub buzz: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: String,
    pub username: String,
    pub message: String,
    pub sentiment: Sentiment,
    pub buzz: u8,
    pub age_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry<T> {
    #[serde(flatten)]
    pub entry: T,
    pub buzz_level: BuzzLevel,
    pub impact: MarketImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSummary {
    pub news: Vec<ScoredEntry<NewsItem>>,
    pub social: Vec<ScoredEntry<SocialPost>>,
    /// Mean buzz-weighted sentiment over all entries, in [-1, 1].
    pub net_score: f64,
    pub overall: MarketImpact,
}

pub fn score_feed(news: &[NewsItem], social: &[SocialPost], thresholds: &ImpactThresholds) -> FeedSummary {
    let scored_news: Vec<_> = news
        .iter()
        .map(|n| ScoredEntry {
            entry: n.clone(),
            buzz_level: BuzzLevel::from_buzz(n.buzz),
            impact: thresholds.classify(n.sentiment, n.buzz),
        })
        .collect();
    let scored_social: Vec<_> = social
        .iter()
        .map(|p| ScoredEntry {
            entry: p.clone(),
            buzz_level: BuzzLevel::from_buzz(p.buzz),
            impact: thresholds.classify(p.sentiment, p.buzz),
        })
        .collect();

    let scores: Vec<f64> = news
        .iter()
        .map(|n| ImpactThresholds::score(n.sentiment, n.buzz))
        .chain(social.iter().map(|p| ImpactThresholds::score(p.sentiment, p.buzz)))
        .collect();
    let net_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    let overall = if net_score > thresholds.bullish_above {
        MarketImpact::Bullish
    } else if net_score < thresholds.bearish_below {
        MarketImpact::Bearish
    } else {
        MarketImpact::Neutral
    };
    log(
        Level::Debug,
        Domain::News,
        "feed_scored",
        obj(&[
            ("entries", json!(scores.len())),
            ("net_score", v_num(net_score)),
            ("overall", json!(overall)),
        ]),
    );

    FeedSummary {
        news: scored_news,
        social: scored_social,
        net_score,
        overall,
    }
}

fn news(source: &str, headline: &str, sentiment: Sentiment, buzz: u8) -> NewsItem {
    NewsItem {
        source: source.to_string(),
        headline: headline.to_string(),
        sentiment,
        buzz,
    }
}

fn post(platform: &str, username: &str, message: &str, sentiment: Sentiment, buzz: u8, age: &str) -> SocialPost {
    SocialPost {
        platform: platform.to_string(),
        username: username.to_string(),
        message: message.to_string(),
        sentiment,
        buzz,
        age_label: age.to_string(),
    }
}

pub fn default_news() -> Vec<NewsItem> {
    vec![
        news("Bloomberg", "Fed Signals Potential Rate Cut as Inflation Cools", Sentiment::Positive, 85),
        news("Reuters", "Tech Stocks Rally on Strong Earnings Reports", Sentiment::Positive, 72),
        news("CNBC", "Market Volatility Rises Amid Geopolitical Tensions", Sentiment::Negative, 68),
        news("Financial Times", "Central Banks Coordinate Policy Response", Sentiment::Neutral, 45),
        news("Wall Street Journal", "Corporate Earnings Beat Expectations Across Sectors", Sentiment::Positive, 78),
        news("MarketWatch", "Oil Prices Surge on Supply Concerns", Sentiment::Negative, 62),
    ]
}

pub fn default_social() -> Vec<SocialPost> {
    vec![
        post("Twitter", "@TraderMike", "SPY breaking resistance at 450, this rally has legs #SPY", Sentiment::Positive, 92, "2m ago"),
        post("StockTwits", "@BearMarket", "VIX spiking again. This volatility is unsustainable", Sentiment::Negative, 78, "5m ago"),
        post("Twitter", "@OptionsTrader", "Put/Call ratio looking bullish, smart money positioning for upside", Sentiment::Positive, 65, "8m ago"),
        post("StockTwits", "@MarketGuru", "Fed dovish comments supporting risk assets. QQQ to 400?", Sentiment::Neutral, 58, "12m ago"),
        post("Twitter", "@CryptoTrader", "Bitcoin correlation with stocks breaking down", Sentiment::Positive, 71, "15m ago"),
    ]
}
