use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// Average round-trip latency over every pair present in both logs.
/// Returns `None` when nothing matched (for example, the agent never
/// delivered anything).
pub fn average_latency(
    sent: &HashMap<(String, String), DateTime<Utc>>,
    received: &HashMap<(String, String), DateTime<Utc>>,
) -> Option<Duration> {
    let mut total_ms: i64 = 0;
    let mut matched: i64 = 0;

    for (id, sent_at) in sent {
        if let Some(received_at) = received.get(id) {
            total_ms += (*received_at - *sent_at).num_milliseconds();
            matched += 1;
        }
    }

    if matched == 0 {
        return None;
    }

    // A clock skew between send and receive stamps can go negative;
    // clamp rather than panic on the cast.
    Some(Duration::from_millis((total_ms / matched).max(0) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn pair(req: &str, data: &str) -> (String, String) {
        (req.to_string(), data.to_string())
    }

    #[test]
    fn averages_matched_pairs() {
        let sent = HashMap::from([(pair("0", "0"), at(0)), (pair("0", "1"), at(0))]);
        let received = HashMap::from([(pair("0", "0"), at(10)), (pair("0", "1"), at(30))]);

        assert_eq!(
            average_latency(&sent, &received),
            Some(Duration::from_millis(20))
        );
    }

    #[test]
    fn ignores_unmatched_pairs() {
        let sent = HashMap::from([(pair("0", "0"), at(0)), (pair("0", "1"), at(0))]);
        let received = HashMap::from([(pair("0", "0"), at(40))]);

        assert_eq!(
            average_latency(&sent, &received),
            Some(Duration::from_millis(40))
        );
    }

    #[test]
    fn empty_logs_average_to_none() {
        assert_eq!(average_latency(&HashMap::new(), &HashMap::new()), None);
    }
}
