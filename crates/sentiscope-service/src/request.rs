//! Search request validation

use sentiscope_collectors::MAX_TIMEPERIOD_DAYS;
use sentiscope_core::{Error, PlatformScope, Result};
use sentiscope_store::PageRequest;
use serde::Deserialize;
use std::str::FromStr;

/// A search as submitted by a caller
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub keyword: String,
    pub timeperiod: u32,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub is_video_title_search: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Comment page to return; all comments when absent
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

fn default_platform() -> String {
    "all".to_string()
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSearch {
    pub keyword: String,
    pub timeperiod: u32,
    pub platform: PlatformScope,
    pub refresh: bool,
    pub video_title_search: bool,
    pub user_id: Option<String>,
    pub comments: PageRequest,
}

/// Comments per page when only a page number is given
pub const DEFAULT_PAGE_SIZE: usize = 20;

impl SearchRequest {
    pub fn new(keyword: impl Into<String>, timeperiod: u32, platform: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            timeperiod,
            platform: platform.into(),
            refresh: false,
            is_video_title_search: false,
            user_id: None,
            page: None,
            page_size: None,
        }
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_video_title_search(mut self, enabled: bool) -> Self {
        self.is_video_title_search = enabled;
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Parse a JSON request body; type errors become invalid input
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::invalid_input(format!("malformed search request: {e}")))
    }

    /// Reject malformed input before any collection happens
    pub fn validate(&self) -> Result<ValidSearch> {
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            return Err(Error::invalid_input("keyword must not be empty"));
        }
        if self.timeperiod == 0 {
            return Err(Error::invalid_input("timeperiod must be a positive number of days"));
        }
        if self.timeperiod > MAX_TIMEPERIOD_DAYS {
            return Err(Error::invalid_input(format!(
                "timeperiod must be at most {MAX_TIMEPERIOD_DAYS} days"
            )));
        }

        // Title search only exists on the video platform
        let platform = if self.is_video_title_search {
            PlatformScope::YouTube
        } else {
            PlatformScope::from_str(&self.platform)?
        };

        let comments = match (self.page, self.page_size) {
            (None, None) => PageRequest::All,
            (page, size) => {
                let page = page.unwrap_or(1);
                let page_size = size.unwrap_or(DEFAULT_PAGE_SIZE);
                if page == 0 || page_size == 0 {
                    return Err(Error::invalid_input("page and pageSize start at 1"));
                }
                PageRequest::page(page, page_size)
            }
        };

        Ok(ValidSearch {
            keyword: keyword.to_string(),
            timeperiod: self.timeperiod,
            platform,
            refresh: self.refresh,
            video_title_search: self.is_video_title_search,
            user_id: self.user_id.clone(),
            comments,
        })
    }
}
