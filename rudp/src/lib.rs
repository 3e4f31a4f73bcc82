//! A minimal reliable, ordered, byte-stream transport layered on top of an
//! unreliable datagram service (UDP).
//!
//! Two [`Endpoint`]s, each bound to a local address and targeting a remote
//! peer, expose a stream abstraction: append bytes to the outbound stream
//! ([`Endpoint::send`]), consume a fixed number of bytes from the inbound
//! stream ([`Endpoint::recv`]), and tear the endpoint down
//! ([`Endpoint::close`]). The protocol delivers every byte exactly once, in
//! order, despite datagram loss, reordering, and duplication on the wire.
//!
//! Each direction is driven by a dedicated listener thread that decodes
//! incoming segments, deposits data into the receive buffer, and answers
//! the peer's retransmission requests; there is no handshake, no
//! congestion control, and no encryption.

#[macro_use]
extern crate log;
extern crate byteorder;
#[macro_use]
extern crate failure;

pub mod error;

mod config;
mod endpoint;
mod framer;
mod listener;
mod port;
mod recv;
mod send;

pub use config::Config;
pub use endpoint::Endpoint;
pub use port::{DatagramPort, UdpDatagramPort};
