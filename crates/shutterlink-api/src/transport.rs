// Transport contract shared by every channel implementation.
//
// A session owns exactly one transport. Requests and replies are strictly
// paired (one in flight at a time); events arrive on an independent channel
// and are polled without blocking.

use std::future::Future;

use bytes::Bytes;
use url::Url;

use crate::error::Error;

/// Default request/reply endpoint of a locally running controller.
pub const DEFAULT_REQREP_ENDPOINT: &str = "tcp://127.0.0.1:54544";

/// Default publisher endpoint of a locally running controller.
pub const DEFAULT_PUBLISHER_ENDPOINT: &str = "tcp://127.0.0.1:54543";

/// The two channels a session needs from its controller.
///
/// Implementations must guarantee strict request/reply pairing:
/// [`receive_reply`](Self::receive_reply) yields the reply to the most
/// recent [`send_request`](Self::send_request) and nothing else.
pub trait Transport {
    /// Deliver one encoded command.
    fn send_request(&mut self, payload: Bytes) -> impl Future<Output = Result<(), Error>> + Send;

    /// Block until the reply to the last request is available.
    fn receive_reply(&mut self) -> impl Future<Output = Result<Bytes, Error>> + Send;

    /// Return the next buffered event, or `None` if nothing is pending right now.
    fn try_receive_event(&mut self) -> Result<Option<Bytes>, Error>;

    /// `false` once the remote controller has exited or the session was stopped.
    fn is_alive(&self) -> bool;
}

/// Request/reply and publisher addresses of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub reqrep: Url,
    pub publisher: Url,
}

impl Endpoints {
    /// Parse and validate both endpoints.
    pub fn parse(reqrep: &str, publisher: &str) -> Result<Self, Error> {
        Ok(Self {
            reqrep: parse_endpoint(reqrep)?,
            publisher: parse_endpoint(publisher)?,
        })
    }

    /// A controller running on this machine with its default ports.
    pub fn localhost() -> Result<Self, Error> {
        Self::parse(DEFAULT_REQREP_ENDPOINT, DEFAULT_PUBLISHER_ENDPOINT)
    }
}


fn parse_endpoint(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "tcp" | "ipc" => Ok(url),
        _ => Err(Error::UnsupportedEndpoint {
            endpoint: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_point_at_localhost() {
        let endpoints = Endpoints::localhost().unwrap();
        assert_eq!(endpoints.reqrep.as_str(), DEFAULT_REQREP_ENDPOINT);
        assert_eq!(endpoints.publisher.as_str(), DEFAULT_PUBLISHER_ENDPOINT);
        assert_eq!(endpoints.reqrep.port(), Some(54544));
    }

    #[test]
    fn http_endpoint_is_rejected() {
        let result = Endpoints::parse("http://127.0.0.1:54544", DEFAULT_PUBLISHER_ENDPOINT);
        assert!(
            matches!(result, Err(Error::UnsupportedEndpoint { .. })),
            "expected UnsupportedEndpoint, got: {result:?}"
        );
    }

    #[test]
    fn garbage_endpoint_is_a_parse_error() {
        let result = Endpoints::parse("not an endpoint", DEFAULT_PUBLISHER_ENDPOINT);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
