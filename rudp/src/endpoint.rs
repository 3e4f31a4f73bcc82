use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once, OnceLock};
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::error::InitError;
use crate::listener;
use crate::port::{DatagramPort, UdpDatagramPort};
use crate::recv::Receiver;
use crate::send::Sender;

/// One side of a reliable, ordered byte-stream connection carried over an
/// unreliable datagram port.
///
/// An `Endpoint` owns an outbound byte stream (`send`) and an inbound byte
/// stream (`recv`), each backed by its own cursor, plus a background
/// listener thread that keeps the receive side fed and answers the peer's
/// retransmission requests. The listener is started lazily, on the first
/// call to `send` or `recv`, and stopped by `close` (also run on `Drop`).
pub struct Endpoint<P: DatagramPort + 'static = UdpDatagramPort> {
    port: Arc<P>,
    sender: Arc<Sender<P>>,
    receiver: Arc<Receiver>,
    segment_size: OnceLock<usize>,
    config: Config,
    running: Arc<AtomicBool>,
    listener_started: Once,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<P: DatagramPort + 'static> Endpoint<P> {
    /// Builds an endpoint directly on top of a [`DatagramPort`] of the
    /// caller's choosing. Used in production via [`Endpoint::bind`]; used in
    /// tests to wire two endpoints through a simulated, fault-injecting
    /// port instead of a real socket.
    pub fn with_port(port: P, config: Config) -> Self {
        let port = Arc::new(port);
        let sender = Arc::new(Sender::new(port.clone(), config.initial_buffer_capacity));
        let receiver = Arc::new(Receiver::new(config.initial_buffer_capacity));

        Endpoint {
            port,
            sender,
            receiver,
            segment_size: OnceLock::new(),
            config,
            running: Arc::new(AtomicBool::new(true)),
            listener_started: Once::new(),
            listener: Mutex::new(None),
        }
    }

    /// Appends `bytes` to the outbound stream. Always accepts the whole
    /// slice and returns its length; infallible except through `close`.
    pub fn send(&self, bytes: &[u8]) -> usize {
        let segment_size = self.negotiate_segment_size(bytes.len());
        self.ensure_listener_started(segment_size);
        self.sender.append(bytes, segment_size)
    }

    /// Blocks until `n` bytes are available on the inbound stream, in
    /// order, and returns them.
    pub fn recv(&self, n: usize) -> Vec<u8> {
        let segment_size = self.negotiate_segment_size(n);
        self.ensure_listener_started(segment_size);
        self.receiver.consume(n, segment_size)
    }

    /// Stops the listener thread and releases the datagram port.
    /// Idempotent; also run automatically on `Drop`.
    pub fn close(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            debug!("closing endpoint");
            if let Some(handle) = self.listener.lock().unwrap().take() {
                let _ = handle.join();
            }
            if let Err(e) = self.port.close() {
                warn!("{}", crate::error::CloseError(e));
            }
        }
    }

    /// The segment size negotiated by the first call to `send` or `recv`,
    /// if one has happened yet.
    pub fn segment_size(&self) -> Option<usize> {
        self.segment_size.get().copied()
    }

    /// Total bytes ever appended to the outbound stream (`send_start` in
    /// the protocol's terms). A lock-free diagnostic read; not otherwise
    /// observable through the stream API.
    pub fn bytes_sent(&self) -> usize {
        self.sender.send_start()
    }

    fn negotiate_segment_size(&self, first_call_len: usize) -> usize {
        *self.segment_size.get_or_init(|| {
            let size = first_call_len.min(self.config.max_segment_size);
            debug!("negotiated segment size {}", size);
            size
        })
    }

    fn ensure_listener_started(&self, segment_size: usize) {
        self.listener_started.call_once(|| {
            debug!("starting listener thread");
            let port = self.port.clone();
            let sender = self.sender.clone();
            let receiver = self.receiver.clone();
            let running = self.running.clone();
            let handle = thread::spawn(move || {
                listener::run(port, sender, receiver, segment_size, running);
            });
            *self.listener.lock().unwrap() = Some(handle);
        });
    }
}

impl Endpoint<UdpDatagramPort> {
    /// Binds a UDP socket at `local_addr`, connects it to `peer_addr`, and
    /// wraps it in an `Endpoint` using the default [`Config`].
    pub fn bind(local_addr: SocketAddr, peer_addr: SocketAddr) -> Result<Self, InitError> {
        Self::bind_with_config(local_addr, peer_addr, Config::default())
    }

    /// Like [`Endpoint::bind`], with an explicit [`Config`].
    pub fn bind_with_config(local_addr: SocketAddr, peer_addr: SocketAddr, config: Config) -> Result<Self, InitError> {
        let port = UdpDatagramPort::bind(local_addr, peer_addr, config.poll_timeout)?;
        Ok(Self::with_port(port, config))
    }
}

impl<P: DatagramPort + 'static> Drop for Endpoint<P> {
    fn drop(&mut self) {
        self.close();
    }
}
