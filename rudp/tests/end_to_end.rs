//! End-to-end scenarios: two `Endpoint`s wired through a simulated,
//! fault-injecting datagram port (see `support`), with no network involved.

mod support;

use rudp::{Config, Endpoint};
use support::{wire, Faults};

fn endpoints(a_to_b: Faults, b_to_a: Faults) -> (Endpoint<support::FaultyPort>, Endpoint<support::FaultyPort>) {
    let (pa, pb) = wire(a_to_b, b_to_a);
    let a = Endpoint::with_port(pa, Config::default());
    let b = Endpoint::with_port(pb, Config::default());
    (a, b)
}

fn lcg_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_add(0x9E3779B97F4A7C15);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

#[test]
fn happy_path_small() {
    let (a, b) = endpoints(Faults::default(), Faults::default());
    a.send(b"hello");
    assert_eq!(b.recv(5), b"hello");
    a.close();
    b.close();
}

#[test]
fn happy_path_exactly_one_segment() {
    let (a, b) = endpoints(Faults::default(), Faults::default());
    let data = vec![0x41u8; 1000];
    a.send(&data);
    assert_eq!(b.recv(1000), data);
    a.close();
    b.close();
}

#[test]
fn multi_segment() {
    let (a, b) = endpoints(Faults::default(), Faults::default());
    let data = lcg_bytes(2500, 1);
    a.send(&data);
    assert_eq!(b.recv(2500), data);
    a.close();
    b.close();
}

#[test]
fn lossy_channel() {
    let faults = Faults { drop_probability: 0.3, reorder_window: 0 };
    let (a, b) = endpoints(faults, Faults::default());
    let data = lcg_bytes(10_000, 2);
    a.send(&data);
    assert_eq!(b.recv(10_000), data);
    a.close();
    b.close();
}

#[test]
fn reordering() {
    let faults = Faults { drop_probability: 0.0, reorder_window: 4 };
    let (a, b) = endpoints(faults, Faults::default());
    let data = lcg_bytes(4000, 3);
    a.send(&data);
    assert_eq!(b.recv(4000), data);
    a.close();
    b.close();
}

#[test]
fn lossy_and_reordered() {
    let faults = Faults { drop_probability: 0.2, reorder_window: 3 };
    let (a, b) = endpoints(faults, faults);
    let data = lcg_bytes(6000, 4);
    a.send(&data);
    assert_eq!(b.recv(6000), data);
    a.close();
    b.close();
}

#[test]
fn interleaved_directions() {
    let (a, b) = endpoints(Faults::default(), Faults::default());

    let p = lcg_bytes(800, 5);
    a.send(&p);
    assert_eq!(b.recv(800), p);

    let q = lcg_bytes(1200, 6);
    b.send(&q);
    assert_eq!(a.recv(1200), q);

    assert_eq!(a.segment_size(), Some(800));
    assert_eq!(b.segment_size(), Some(800));

    a.close();
    b.close();
}

/// Appends made in several separate `send` calls must still show up as a
/// single contiguous run to a `recv` spanning all of them — per §8's
/// concatenation law. Chunk sizes are kept as multiples of the segment
/// size the first call establishes, since `begin` is only ever a multiple
/// of `S` when every append before the last is itself segment-aligned.
#[test]
fn concatenated_appends_are_delivered_in_order() {
    let (a, b) = endpoints(Faults::default(), Faults::default());

    let first = lcg_bytes(200, 7);
    a.send(&first);
    assert_eq!(b.recv(200), first);

    let chunks = [lcg_bytes(200, 8), lcg_bytes(200, 9), lcg_bytes(50, 10)];
    for chunk in &chunks {
        a.send(chunk);
    }

    let total: usize = chunks.iter().map(Vec::len).sum();
    let received = b.recv(total);
    let expected: Vec<u8> = chunks.concat();
    assert_eq!(received, expected);

    a.close();
    b.close();
}
