use std::future::Future;
use std::sync::OnceLock;
use std::time::Instant;

use tracing::warn;

fn slow_query_threshold_ms() -> Option<u64> {
    static CACHE: OnceLock<Option<u64>> = OnceLock::new();

    *CACHE.get_or_init(|| {
        std::env::var("CS_DB_LOG_MIN_DURATION_MS")
            .ok()
            .and_then(|raw| parse_threshold(&raw))
    })
}

fn parse_threshold(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .map(|v| v.max(0) as u64)
        .filter(|v| *v > 0)
}

/// Awaits `query` and warns when it took at least
/// `CS_DB_LOG_MIN_DURATION_MS` milliseconds.
pub async fn timed<F, T>(label: &str, query: F) -> T
where
    F: Future<Output = T>,
{
    let started = Instant::now();
    let result = query.await;

    if let Some(threshold_ms) = slow_query_threshold_ms() {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if elapsed_ms >= threshold_ms {
            warn!(query = label, elapsed_ms, "slow_query_detected");
        }
    }

    result
}

/// Escapes `LIKE` metacharacters so user input only ever matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_ignores_zero_negative_and_garbage() {
        assert_eq!(parse_threshold("250"), Some(250));
        assert_eq!(parse_threshold("0"), None);
        assert_eq!(parse_threshold("-5"), None);
        assert_eq!(parse_threshold("slow"), None);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("C++"), "C++");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn timed_passes_the_result_through() {
        assert_eq!(timed("noop", async { 7 }).await, 7);
    }
}
