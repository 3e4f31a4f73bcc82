//! The datagram port: the unreliable, message-oriented carrier this
//! transport is layered on top of.
//!
//! `rudp`'s core state machine only ever talks to a [`DatagramPort`] trait
//! object, never to `std::net::UdpSocket` directly. That keeps the socket
//! itself an external collaborator, as the protocol intends, and lets tests
//! swap in a fault-injecting port (see `tests/support` and the doc example
//! in this module) without touching a real network stack.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// A fixed-peer datagram transport: send a whole message, receive a whole
/// message, with a timeout on idle reads.
pub trait DatagramPort: Send + Sync {
    /// Sends a complete datagram to the peer this port is wired to.
    fn send_to(&self, datagram: &[u8]) -> io::Result<usize>;

    /// Waits for the next datagram, up to the port's configured timeout.
    ///
    /// Returns `Err` with `io::ErrorKind::WouldBlock` or `TimedOut` when no
    /// datagram arrives before the timeout elapses; the listener treats
    /// either as an idle poll.
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Releases the port. Called once by `Endpoint::close`, after the
    /// listener thread has been joined.
    ///
    /// The default implementation does nothing; a real socket's file
    /// descriptor is released by its own `Drop` impl regardless, so this
    /// hook exists for ports that need an explicit teardown step (e.g. a
    /// simulated port unregistering itself from a shared fault-injecting
    /// network).
    fn close(&self) -> io::Result<()> {
        Ok(())
    }
}

/// A [`DatagramPort`] backed by a connected `std::net::UdpSocket`.
///
/// This is the production implementation; it binds to `local_addr` and
/// connects to `peer_addr` so that `send`/`recv` never need to name the peer
/// again and stray datagrams from other sources are filtered by the kernel.
pub struct UdpDatagramPort {
    socket: UdpSocket,
}

impl UdpDatagramPort {
    /// Binds a UDP socket at `local_addr`, connects it to `peer_addr`, and
    /// sets its read timeout to `poll_timeout`.
    pub fn bind(local_addr: SocketAddr, peer_addr: SocketAddr, poll_timeout: Duration) -> io::Result<Self> {
        debug!("binding datagram port on {}, peer {}", local_addr, peer_addr);
        let socket = UdpSocket::bind(local_addr)?;
        socket.connect(peer_addr)?;
        socket.set_read_timeout(Some(poll_timeout))?;
        Ok(UdpDatagramPort { socket })
    }
}

impl DatagramPort for UdpDatagramPort {
    fn send_to(&self, datagram: &[u8]) -> io::Result<usize> {
        self.socket.send(datagram)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.recv(buf)
    }
}
