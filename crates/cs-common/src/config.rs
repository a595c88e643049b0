/// Search tuning read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Page size used when a request does not ask for one (default: 20).
    pub default_limit: u32,
    /// Upper bound on the page size a request may ask for (default: 100).
    pub max_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_limit = env_u32("CS_SEARCH_MAX_LIMIT").unwrap_or(defaults.max_limit);
        let default_limit = env_u32("CS_SEARCH_DEFAULT_LIMIT")
            .unwrap_or(defaults.default_limit)
            .min(max_limit);

        Self {
            default_limit,
            max_limit,
        }
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}
