use std::{sync::OnceLock, time::Duration};

use reqwest::{
    Client,
    header::{CONNECTION, HeaderMap, HeaderValue},
};

/// Deadline for a provider request that carries no large body
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Slowest upload rate a media transfer is allowed to sustain
const MIN_TRANSFER_BYTES_PER_SEC: u64 = 64 * 1024;

/// Shared HTTP client so every provider reuses one connection pool
///
/// Requests time out after [`REQUEST_TIMEOUT`] unless the request sets its
/// own deadline, as media uploads do with [`transfer_timeout`].
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            let mut headers = HeaderMap::new();
            headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

            Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .timeout(REQUEST_TIMEOUT)
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .default_headers(headers)
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}

/// Deadline for a request that streams `bytes` of media
///
/// Grows with the body so a large upload that keeps making progress is not
/// cut off by the flat per-request deadline.
pub fn transfer_timeout(base: Duration, bytes: u64) -> Duration {
    base + Duration::from_millis(bytes.saturating_mul(1000) / MIN_TRANSFER_BYTES_PER_SEC)
}
