//! The send side: an append-only outbound byte buffer, eager transmission
//! of newly appended data, and retransmission on request.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::framer;
use crate::port::DatagramPort;

/// State guarded together so a retransmit always reads a region that has
/// been fully published before `send_start` advanced past it.
struct Inner {
    buf: Vec<u8>,
    /// The highest `begin` ever honored by `retransmit`, or `None` before
    /// the first request is honored. Monotonic: retransmit never serves a
    /// request whose `begin` regresses past this, which prevents a
    /// reordered or duplicate request from triggering backward
    /// retransmission loops.
    highest_requested_begin: Option<i32>,
}

/// The outbound half of an endpoint's byte stream.
pub(crate) struct Sender<P> {
    port: Arc<P>,
    inner: Mutex<Inner>,
    /// Total bytes ever appended. Kept outside the buffer mutex as well so
    /// callers (and `Endpoint::segment_size` negotiation) can read it
    /// without contending with in-flight retransmits.
    send_start: AtomicUsize,
}

impl<P: DatagramPort> Sender<P> {
    pub fn new(port: Arc<P>, initial_capacity: usize) -> Self {
        Sender {
            port,
            inner: Mutex::new(Inner {
                buf: Vec::with_capacity(initial_capacity),
                highest_requested_begin: None,
            }),
            send_start: AtomicUsize::new(0),
        }
    }

    pub fn send_start(&self) -> usize {
        self.send_start.load(Ordering::Acquire)
    }

    /// Appends `bytes` to the outbound buffer and eagerly transmits the
    /// newly appended range as `ceil(len / segment_size)` data datagrams.
    /// Always accepts the whole slice.
    pub fn append(&self, bytes: &[u8], segment_size: usize) -> usize {
        let begin0;
        {
            let mut inner = self.inner.lock().unwrap();
            begin0 = inner.buf.len();
            inner.buf.extend_from_slice(bytes);
            self.send_start.store(inner.buf.len(), Ordering::Release);
        }

        let len = bytes.len();
        let mut offset = 0;
        while offset < len {
            let seg_end = (offset + segment_size).min(len);
            let begin = (begin0 + offset) as i32;
            let end = (begin0 + seg_end) as i32;
            trace!("eagerly sending segment [{}, {})", begin, end);
            let datagram = framer::encode(begin, end, false, &bytes[offset..seg_end], segment_size);
            if let Err(e) = self.port.send_to(&datagram) {
                warn!("failed to send data segment [{}, {}): {}", begin, end, e);
            }
            offset = seg_end;
        }

        len
    }

    /// Serves a retransmission request for `[begin, end)`, invoked by the
    /// listener when it decodes a request datagram.
    ///
    /// Ignored if the range hasn't been fully appended yet (the requester
    /// will retry) or if `begin` regresses behind the highest `begin` ever
    /// honored (stale or reordered request).
    pub fn retransmit(&self, begin: i32, end: i32, segment_size: usize) {
        let mut inner = self.inner.lock().unwrap();

        if let Some(highest) = inner.highest_requested_begin {
            if begin < highest {
                debug!("ignoring stale retransmit request for {} < {}", begin, highest);
                return;
            }
        }

        if (inner.buf.len() as i64) < end as i64 || begin < 0 {
            debug!("ignoring retransmit request for unproduced range [{}, {})", begin, end);
            return;
        }

        let payload = inner.buf[begin as usize..end as usize].to_vec();
        inner.highest_requested_begin = Some(begin);
        drop(inner);

        debug!("retransmitting segment [{}, {})", begin, end);
        let datagram = framer::encode(begin, end, false, &payload, segment_size);
        if let Err(e) = self.port.send_to(&datagram) {
            warn!("failed to retransmit segment [{}, {}): {}", begin, end, e);
        }
    }
}
