//! The background listener activity.
//!
//! One dedicated thread per endpoint: it polls the datagram port with a
//! short timeout, dispatches data into the receive side and retransmission
//! requests into the send side, and emits the receiver's pending request as
//! a beacon whenever the port read times out.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::framer;
use crate::port::DatagramPort;
use crate::recv::Receiver;
use crate::send::Sender;

pub(crate) fn run<P: DatagramPort>(
    port: Arc<P>,
    sender: Arc<Sender<P>>,
    receiver: Arc<Receiver>,
    segment_size: usize,
    running: Arc<AtomicBool>,
) {
    let mut buf = vec![0u8; segment_size + framer::HEADER_SIZE];

    while running.load(Ordering::Acquire) {
        match port.recv(&mut buf) {
            Ok(count) => match framer::decode(&buf[..count], segment_size) {
                Some(segment) if segment.is_request => {
                    trace!("received request for [{}, {})", segment.begin, segment.end);
                    sender.retransmit(segment.begin, segment.end, segment_size);
                }
                Some(segment) => {
                    trace!("received data for offset {}", segment.begin);
                    receiver.deliver(segment.begin, segment.payload);
                }
                None => {
                    debug!("dropping malformed datagram of {} bytes", count);
                }
            },
            Err(ref e) if is_timeout(e) => {
                if let Some((begin, end)) = receiver.pending_request() {
                    trace!("beaconing pending request [{}, {})", begin, end);
                    let datagram = framer::encode(begin, end, true, &[], segment_size);
                    if let Err(e) = port.send_to(&datagram) {
                        warn!("failed to send beacon request: {}", e);
                    }
                }
            }
            Err(e) => {
                error!("listener socket error, terminating listener: {}", e);
                break;
            }
        }
    }

    debug!("listener thread exiting");
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
