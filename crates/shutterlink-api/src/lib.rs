// shutterlink-api: Transports between a client session and a camera controller

pub mod error;
pub mod local;
pub mod transport;
pub mod zmq;

pub use error::Error;
pub use local::{LocalPublisher, LocalRemote, LocalTransport, local_pair};
pub use transport::{Endpoints, Transport};
pub use zmq::ZmqTransport;
