use std::time::Duration;

/// The maximum payload carried by a single segment.
///
/// `sizeflag` reserves 10 bits for the payload length, so this can never
/// exceed 1023, but the protocol caps the negotiated size at 1000 to leave
/// headroom under common MTUs.
pub const MAX_SEGMENT_SIZE: usize = 1000;

/// Tunable knobs that don't change stream semantics.
///
/// Everything in here is an implementation choice the protocol leaves open;
/// `Config::default()` reproduces the behavior described by the protocol
/// itself.
#[derive(Debug, Clone)]
pub struct Config {
    /// How long the listener blocks on the datagram port before treating the
    /// read as idle and re-emitting the pending request beacon.
    pub poll_timeout: Duration,

    /// The largest segment size negotiation will settle on, regardless of
    /// what the first `send`/`recv` call asks for.
    pub max_segment_size: usize,

    /// Initial capacity to reserve in the outbound and inbound byte buffers.
    ///
    /// Purely an allocation hint; both buffers grow as needed past this.
    pub initial_buffer_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            poll_timeout: Duration::from_micros(10),
            max_segment_size: MAX_SEGMENT_SIZE,
            initial_buffer_capacity: 64 * 1024,
        }
    }
}
