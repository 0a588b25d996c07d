//! Per-client request rate limiting

use super::response::error_response;
use super::state::AppState;
use crate::config::{RealIpMethod, Settings};
use crate::metrics::Outcome;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use tracing::warn;

/// Keyed rate limiter allowing a fixed number of requests per minute per IP
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    real_ip_method: RealIpMethod,
}

impl ClientRateLimiter {
    pub fn new(requests_per_minute: NonZeroU32, real_ip_method: RealIpMethod) -> Self {
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(requests_per_minute)),
            real_ip_method,
        }
    }

    /// Build the limiter described by the settings, if enabled
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        if !settings.limiter.enabled {
            return None;
        }
        let quota = NonZeroU32::new(settings.limiter.requests_per_minute)?;
        Some(Self::new(quota, settings.server.real_ip_method))
    }

    /// Take one request from the client's quota; false when exhausted
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Drop state for clients whose quota has fully replenished
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }

    pub fn real_ip_method(&self) -> RealIpMethod {
        self.real_ip_method
    }
}

/// Determine the client address according to the configured method.
///
/// Falls back to the connection address when the header is absent or
/// unparseable.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    method: RealIpMethod,
) -> Option<IpAddr> {
    let from_header = match method {
        RealIpMethod::XForwardedFor => headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse().ok()),
        RealIpMethod::XRealIp => headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok()),
        RealIpMethod::Connection => None,
    };

    from_header.or_else(|| peer.map(|addr| addr.ip()))
}

/// Middleware rejecting clients over their quota with 429
pub async fn rate_limit(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.limiter.as_ref() else {
        return next.run(request).await;
    };

    // Clients without a known address share one bucket
    let ip = client_ip(
        request.headers(),
        connect_info.map(|ConnectInfo(addr)| addr),
        limiter.real_ip_method(),
    )
    .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !limiter.check(ip) {
        warn!("Rate limit exceeded for {}", ip);
        state.metrics.record_outcome(Outcome::RateLimited);
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please try again later.",
        );
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_quota_is_per_client() {
        let limiter = ClientRateLimiter::new(NonZeroU32::new(2).unwrap(), RealIpMethod::Connection);
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(a));
        assert!(limiter.check(a));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
        limiter.prune();
    }

    #[test]
    fn test_disabled_limiter() {
        let mut settings = Settings::default();
        assert!(ClientRateLimiter::from_settings(&settings).is_some());
        settings.limiter.enabled = false;
        assert!(ClientRateLimiter::from_settings(&settings).is_none());
    }

    #[test]
    fn test_client_ip_methods() {
        let peer: SocketAddr = "192.168.1.10:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.3"));

        assert_eq!(
            client_ip(&headers, Some(peer), RealIpMethod::Connection),
            Some("192.168.1.10".parse().unwrap())
        );
        assert_eq!(
            client_ip(&headers, Some(peer), RealIpMethod::XForwardedFor),
            Some("203.0.113.7".parse().unwrap())
        );
        assert_eq!(
            client_ip(&headers, Some(peer), RealIpMethod::XRealIp),
            Some("198.51.100.3".parse().unwrap())
        );
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let peer: SocketAddr = "192.168.1.10:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));

        assert_eq!(
            client_ip(&headers, Some(peer), RealIpMethod::XForwardedFor),
            Some(peer.ip())
        );
        assert_eq!(client_ip(&HeaderMap::new(), None, RealIpMethod::XRealIp), None);
    }
}
