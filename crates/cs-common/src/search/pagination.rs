use crate::config::SearchConfig;

/// Resolved 1-based page of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Out-of-range or missing values fall back to page 1 / the configured
    /// default size; oversized limits are capped.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, config: &SearchConfig) -> Self {
        let page = page
            .filter(|page| *page >= 1)
            .map_or(1, |page| u32::try_from(page).unwrap_or(u32::MAX));
        let limit = limit
            .filter(|limit| *limit >= 1)
            .map_or(config.default_limit, |limit| {
                u32::try_from(limit).unwrap_or(u32::MAX)
            })
            .clamp(1, config.max_limit.max(1));

        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}
