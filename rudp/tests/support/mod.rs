//! A simulated, fault-injecting `DatagramPort` pair for driving two
//! `Endpoint`s against each other without a real socket.
//!
//! Each side of a [`wire`] pair hands datagrams to the other side through
//! an `mpsc` channel; loss, reordering, and duplication are applied on the
//! sending side before the datagram is handed off, matching how the spec's
//! end-to-end scenarios describe the simulated port's fault model.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;
use rudp::DatagramPort;

/// Independent fault-injection knobs for one direction of a [`wire`] pair.
#[derive(Clone, Copy, Default)]
pub struct Faults {
    /// Probability, in `[0.0, 1.0)`, that an outgoing datagram is dropped.
    pub drop_probability: f64,
    /// When > 1, outgoing datagrams are buffered until this many have
    /// accumulated, then flushed to the peer in shuffled order.
    pub reorder_window: usize,
}

struct Outbox {
    peer: Sender<Vec<u8>>,
    faults: Faults,
    pending: Vec<Vec<u8>>,
}

/// One side of a simulated link; implements [`DatagramPort`].
pub struct FaultyPort {
    outbox: Mutex<Outbox>,
    inbox: Mutex<Receiver<Vec<u8>>>,
    poll_timeout: Duration,
}

impl DatagramPort for FaultyPort {
    fn send_to(&self, datagram: &[u8]) -> io::Result<usize> {
        let mut outbox = self.outbox.lock().unwrap();
        let len = datagram.len();

        if outbox.faults.drop_probability > 0.0 && rand::thread_rng().gen_bool(outbox.faults.drop_probability) {
            return Ok(len);
        }

        if outbox.faults.reorder_window > 1 {
            outbox.pending.push(datagram.to_vec());
            if outbox.pending.len() >= outbox.faults.reorder_window {
                let mut batch = std::mem::take(&mut outbox.pending);
                shuffle(&mut batch);
                for d in batch {
                    let _ = outbox.peer.send(d);
                }
            }
        } else {
            let _ = outbox.peer.send(datagram.to_vec());
        }

        Ok(len)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let inbox = self.inbox.lock().unwrap();
        match inbox.recv_timeout(self.poll_timeout) {
            Ok(datagram) => {
                let n = datagram.len().min(buf.len());
                buf[..n].copy_from_slice(&datagram[..n]);
                Ok(n)
            }
            Err(RecvTimeoutError::Timeout) => Err(io::Error::new(io::ErrorKind::TimedOut, "no datagram")),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone")),
        }
    }
}

/// A Fisher-Yates shuffle using the thread-local RNG, kept local to this
/// support module so the `rand` dev-dependency doesn't need `SliceRandom`
/// pulled in just for one call site.
fn shuffle<T>(items: &mut [T]) {
    let mut rng = rand::thread_rng();
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0, i + 1);
        items.swap(i, j);
    }
}

/// Builds a pair of connected [`FaultyPort`]s, one fault profile per
/// direction: `a_to_b` governs datagrams `a` sends (and `b` receives),
/// `b_to_a` the reverse.
pub fn wire(a_to_b: Faults, b_to_a: Faults) -> (FaultyPort, FaultyPort) {
    let (tx_ab, rx_ab) = mpsc::channel();
    let (tx_ba, rx_ba) = mpsc::channel();

    let poll_timeout = Duration::from_micros(200);

    let a = FaultyPort {
        outbox: Mutex::new(Outbox { peer: tx_ab, faults: a_to_b, pending: Vec::new() }),
        inbox: Mutex::new(rx_ba),
        poll_timeout,
    };
    let b = FaultyPort {
        outbox: Mutex::new(Outbox { peer: tx_ba, faults: b_to_a, pending: Vec::new() }),
        inbox: Mutex::new(rx_ab),
        poll_timeout,
    };
    (a, b)
}
