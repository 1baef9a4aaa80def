//! Sentiscope Analytics
//!
//! Turns a classified comment set into dashboard analytics:
//! - Headline metrics with reconciled sentiment percentages
//! - Daily sentiment trend with smoothed gap days
//! - Topic and platform distributions
//! - Weighted top keywords
//! - Influencer ranking
//! - Templated insight text, including distinct empty-state messages

pub mod aggregator;
pub mod config;
pub mod distribution;
pub mod influencers;
pub mod insights;
pub mod keywords;
pub mod trend;

#[cfg(test)]
mod test_support;

pub use aggregator::{compute_metrics, engagement_rate, AggregationContext, AnalyticsAggregator};
pub use config::AnalyticsSettings;
pub use insights::{NO_CREDENTIALS_MESSAGE, NO_DATA_MESSAGE};
