//! Error types associated with `rudp` endpoints.
//!
//! The stream API itself (`send`/`recv`) is total: in a well-formed run it
//! always returns normally, since lost segments are resolved by
//! re-requesting rather than by surfacing an error to the caller. The one
//! place a `rudp::Endpoint` can genuinely fail is construction, where
//! binding the underlying datagram port can fail the way any socket
//! operation can.

use std::io;

/// An endpoint failed to start.
#[derive(Debug, Fail)]
pub enum InitError {
    /// Binding or connecting the underlying datagram port failed.
    #[fail(display = "failed to set up the datagram port: {}", _0)]
    IoError(#[cause] io::Error),
}

impl From<io::Error> for InitError {
    fn from(err: io::Error) -> Self {
        InitError::IoError(err)
    }
}

/// The datagram port failed to release its resources on close.
///
/// Never propagated by [`crate::Endpoint::close`]: a close failure is
/// logged and otherwise ignored, since the endpoint is already tearing
/// down and there is nothing a caller could usefully do differently.
#[derive(Debug, Fail)]
#[fail(display = "failed to close the datagram port: {}", _0)]
pub struct CloseError(#[cause] pub(crate) io::Error);
