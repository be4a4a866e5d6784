//! DTOs for the link statistics endpoint.

use serde::Serialize;

use crate::api::dto::clicks::ClickInfo;
use crate::api::dto::links::LinkResponse;
use crate::domain::click_analytics::ClickSummary;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub link: LinkResponse,
    pub stats: ClickStats,
}

#[derive(Debug, Serialize)]
pub struct ClickStats {
    pub total_clicks: u64,
    pub today_clicks: u64,
    pub last_7_days_clicks: u64,
    pub top_referrers: Vec<ReferrerCount>,
    pub top_countries: Vec<CountryCount>,
    pub recent_clicks: Vec<ClickInfo>,
}

#[derive(Debug, Serialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

impl From<ClickSummary> for ClickStats {
    fn from(summary: ClickSummary) -> Self {
        Self {
            total_clicks: summary.total_clicks,
            today_clicks: summary.today_clicks,
            last_7_days_clicks: summary.last_7_days_clicks,
            top_referrers: summary
                .top_referrers
                .into_iter()
                .map(|(referrer, count)| ReferrerCount { referrer, count })
                .collect(),
            top_countries: summary
                .top_countries
                .into_iter()
                .map(|(country, count)| CountryCount { country, count })
                .collect(),
            recent_clicks: summary.recent_clicks.into_iter().map(ClickInfo::from).collect(),
        }
    }
}
