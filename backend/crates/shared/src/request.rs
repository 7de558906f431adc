//! Request Metadata
//!
//! Per-request values every layer may need: the correlation id echoed in
//! error envelopes and the deadline that bounds outbound calls.

use std::time::{Duration, Instant};

/// Header carrying the correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Default request budget.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// リクエストスコープのメタデータ
#[derive(Debug, Clone)]
pub struct RequestMeta {
    request_id: String,
    /// `None` when the budget does not fit in an `Instant`
    deadline: Option<Instant>,
}

impl RequestMeta {
    /// `timeout` 後に期限切れとなるメタデータを作成
    ///
    /// `request_id` が無い・空の場合は UUID v4 を生成します。
    /// `Instant` で表せないほど大きな `timeout` は期限なしとして扱います。
    pub fn new(request_id: Option<&str>, timeout: Duration) -> Self {
        let request_id = match request_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        Self {
            request_id,
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// 期限までの残り時間（期限切れなら 0、期限なしなら `Duration::MAX`）
    pub fn remaining(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        }
    }
}

impl Default for RequestMeta {
    fn default() -> Self {
        Self::new(None, DEFAULT_REQUEST_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_given_request_id() {
        let meta = RequestMeta::new(Some("abc-123"), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(meta.request_id(), "abc-123");
    }

    #[test]
    fn test_generates_request_id_when_blank() {
        let meta = RequestMeta::new(Some("  "), DEFAULT_REQUEST_TIMEOUT);
        assert!(uuid::Uuid::parse_str(meta.request_id()).is_ok());

        let meta = RequestMeta::new(None, DEFAULT_REQUEST_TIMEOUT);
        assert!(uuid::Uuid::parse_str(meta.request_id()).is_ok());
    }

    #[test]
    fn test_deadline() {
        let meta = RequestMeta::new(None, Duration::from_secs(60));
        assert!(meta.remaining() > Duration::from_secs(59));

        let meta = RequestMeta::new(None, Duration::ZERO);
        assert_eq!(meta.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_unrepresentable_timeout_means_no_deadline() {
        let meta = RequestMeta::new(Some("rid"), Duration::from_secs(u64::MAX));
        assert_eq!(meta.remaining(), Duration::MAX);
        assert_eq!(meta.request_id(), "rid");
    }
}
