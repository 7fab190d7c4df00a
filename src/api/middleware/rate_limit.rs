//! Rate limiting middleware using token bucket algorithm.
//!
//! Keys are client IPs taken from the socket peer address, so the router must
//! be served with `into_make_service_with_connect_info::<SocketAddr>()`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for offer submissions.
///
/// # Limits
///
/// - **Replenish**: one request every 6 seconds
/// - **Burst**: 5 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn submission_layer() -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(6)
            .burst_size(5)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a stricter rate limiter for admin endpoints.
///
/// # Limits
///
/// - **Replenish**: one request per second
/// - **Burst**: 10 requests
///
/// Applied to the admin API, the admin pages and the login form.
///
/// # Example
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/admin/records", get(list_records_handler))
///     .layer(rate_limit::admin_layer());
/// ```
pub fn admin_layer() -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(10)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
