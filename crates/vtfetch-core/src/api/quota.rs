//! Account quota reconciliation (v3 `overall_quotas`).

use serde::Deserialize;

use super::http;
use super::USER_QUOTA_ENDPOINT;
use crate::config::AccessLevel;
use crate::rate_limit::{FREE_DAILY_LIMIT, FREE_MONTHLY_LIMIT};

/// Usage/limit numbers reported by (or synthesized for) the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaInfo {
    pub daily_used: u64,
    pub daily_limit: u64,
    pub monthly_used: u64,
    pub monthly_limit: u64,
    pub access_level: AccessLevel,
}

impl QuotaInfo {
    /// What a free account sees when the service will not say: nothing
    /// consumed, free-tier caps.
    pub fn free_tier() -> Self {
        Self {
            daily_used: 0,
            daily_limit: u64::from(FREE_DAILY_LIMIT),
            monthly_used: 0,
            monthly_limit: u64::from(FREE_MONTHLY_LIMIT),
            access_level: AccessLevel::Free,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuotaResponse {
    data: Option<QuotaBuckets>,
}

#[derive(Debug, Deserialize)]
struct QuotaBuckets {
    api_requests_hourly: Option<QuotaCounter>,
    api_requests_daily: Option<QuotaCounter>,
    api_requests_monthly: Option<QuotaCounter>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct QuotaCounter {
    used: Option<u64>,
    allowed: Option<u64>,
}

/// Fetch the account's quota numbers; the user id in the path is the
/// key's 16-character prefix, the full key travels in `x-apikey`.
///
/// `None` means "no usable answer": transport failure, an unexpected
/// status, or an unparsable body. Callers fall back to local counters.
/// HTTP 403 is the free-key case and synthesizes the free tier.
pub async fn fetch_quota(api_key: &str) -> Option<QuotaInfo> {
    let user = api_key.chars().take(16).collect::<String>();
    let endpoint = format!("{}/{}/overall_quotas", USER_QUOTA_ENDPOINT, user);
    let key = api_key.to_string();

    let joined = tokio::task::spawn_blocking(move || {
        http::get(&endpoint, &[("x-apikey", key.as_str())])
    })
    .await;

    let response = match joined {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            tracing::debug!("quota fetch failed: {:#}", err);
            return None;
        }
        Err(err) => {
            tracing::debug!("quota fetch task join failed: {}", err);
            return None;
        }
    };

    if response.status == 403 {
        // Free keys cannot read v3 quotas.
        return Some(QuotaInfo::free_tier());
    }
    if !response.is_success() {
        tracing::debug!("quota fetch returned HTTP {}", response.status);
        return None;
    }

    parse_quota_body(&response.body)
}

pub(crate) fn parse_quota_body(body: &[u8]) -> Option<QuotaInfo> {
    let parsed: QuotaResponse = serde_json::from_slice(body).ok()?;
    let buckets = parsed.data?;

    // The daily numbers take the first bucket the service reports.
    let daily = buckets
        .api_requests_hourly
        .or(buckets.api_requests_daily)
        .or(buckets.api_requests_monthly)
        .unwrap_or_default();
    let monthly = buckets.api_requests_monthly.unwrap_or_default();

    let daily_limit = daily.allowed.unwrap_or(u64::from(FREE_DAILY_LIMIT));
    let monthly_limit = monthly.allowed.unwrap_or(u64::from(FREE_MONTHLY_LIMIT));
    let access_level = if daily_limit > u64::from(FREE_DAILY_LIMIT)
        || monthly_limit > u64::from(FREE_MONTHLY_LIMIT)
    {
        AccessLevel::Premium
    } else {
        AccessLevel::Free
    };

    Some(QuotaInfo {
        daily_used: daily.used.unwrap_or(0),
        daily_limit,
        monthly_used: monthly.used.unwrap_or(0),
        monthly_limit,
        access_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_bucket_preferred_for_daily_numbers() {
        let body = br#"{
            "data": {
                "api_requests_hourly": {"used": 3, "allowed": 240},
                "api_requests_daily": {"used": 41, "allowed": 500},
                "api_requests_monthly": {"used": 900, "allowed": 15500}
            }
        }"#;
        let info = parse_quota_body(body).unwrap();
        assert_eq!(info.daily_used, 3);
        assert_eq!(info.daily_limit, 240);
        assert_eq!(info.monthly_used, 900);
        assert_eq!(info.monthly_limit, 15500);
        assert_eq!(info.access_level, AccessLevel::Free);
    }

    #[test]
    fn daily_bucket_used_when_hourly_absent() {
        let body = br#"{
            "data": {
                "api_requests_daily": {"used": 41, "allowed": 500},
                "api_requests_monthly": {"used": 900, "allowed": 15500}
            }
        }"#;
        let info = parse_quota_body(body).unwrap();
        assert_eq!(info.daily_used, 41);
        assert_eq!(info.daily_limit, 500);
    }

    #[test]
    fn limits_above_free_tier_imply_premium() {
        let body = br#"{
            "data": {
                "api_requests_daily": {"used": 100, "allowed": 20000},
                "api_requests_monthly": {"used": 2000, "allowed": 600000}
            }
        }"#;
        let info = parse_quota_body(body).unwrap();
        assert_eq!(info.access_level, AccessLevel::Premium);
    }

    #[test]
    fn missing_allowed_defaults_to_free_limits() {
        let body = br#"{"data": {"api_requests_daily": {"used": 12}}}"#;
        let info = parse_quota_body(body).unwrap();
        assert_eq!(info.daily_used, 12);
        assert_eq!(info.daily_limit, 500);
        assert_eq!(info.monthly_used, 0);
        assert_eq!(info.monthly_limit, 15500);
        assert_eq!(info.access_level, AccessLevel::Free);
    }

    #[test]
    fn missing_data_yields_none() {
        assert!(parse_quota_body(br#"{"error": "nope"}"#).is_none());
        assert!(parse_quota_body(b"not json at all").is_none());
    }

    #[test]
    fn free_tier_synthesis_values() {
        let info = QuotaInfo::free_tier();
        assert_eq!(info.daily_used, 0);
        assert_eq!(info.daily_limit, 500);
        assert_eq!(info.monthly_limit, 15500);
        assert_eq!(info.access_level, AccessLevel::Free);
    }
}
