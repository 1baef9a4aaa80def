//! Aggregation settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Trend window when a query carries no time period
    #[serde(default = "default_trend_days")]
    pub default_trend_days: u32,

    /// Upper bound on trend points for long time periods
    #[serde(default = "default_max_trend_days")]
    pub max_trend_days: u32,
}

impl AnalyticsSettings {
    /// Trend window for a requested time period
    pub fn trend_days(&self, timeperiod: u32) -> u32 {
        if timeperiod == 0 {
            self.default_trend_days
        } else {
            timeperiod.min(self.max_trend_days)
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            default_trend_days: default_trend_days(),
            max_trend_days: default_max_trend_days(),
        }
    }
}

fn default_trend_days() -> u32 {
    30
}

fn default_max_trend_days() -> u32 {
    365
}
