mod common;

use common::SimDevice;
use rshfiq_cat::{freq, DispatchOutcome, Dispatcher, Error, Vfo, Wait};

fn dispatcher(sim: &SimDevice) -> Dispatcher<SimDevice> {
    Dispatcher::new(sim.clone(), freq(7_074_000), Wait::NonBlocking)
}

fn feed_all(
    cat: &mut Dispatcher<SimDevice>,
    bytes: &[u8],
) -> Vec<Result<DispatchOutcome, Error>> {
    bytes.iter().filter_map(|&b| cat.feed(b)).collect()
}

#[test]
fn sentinel_recovery_dispatches_exactly_once() {
    let sim = SimDevice::new();
    let mut cat = dispatcher(&sim);

    // A half-sent command, a spurious sentinel, then a complete one.
    let mut outcomes = feed_all(&mut cat, b"*FA7");
    outcomes.extend(feed_all(&mut cat, b"*"));
    outcomes.extend(feed_all(&mut cat, b"FB7100000\r"));

    assert_eq!(outcomes.len(), 1);
    assert_eq!(
        outcomes[0].as_ref().unwrap(),
        &DispatchOutcome::FrequencySet {
            vfo: Vfo::B,
            freq: freq(7_100_000),
            band: rshfiq_cat::BandId(3),
        }
    );
    // Only the recovered command reached the device.
    assert_eq!(sim.sent(), b"*F7100000\r");
}

#[test]
fn bytes_arrive_one_at_a_time_or_in_bursts() {
    let sim = SimDevice::new();
    let mut cat = dispatcher(&sim);

    // Byte-at-a-time.
    let outcomes = feed_all(&mut cat, b"*X1\r");
    assert_eq!(outcomes.len(), 1);
    assert!(cat.state().transmit());

    // A burst holding two commands dispatches both, in order.
    let outcomes = feed_all(&mut cat, b"*X0\r*FR1\r");
    assert_eq!(outcomes.len(), 2);
    assert!(!cat.state().transmit());
    assert!(cat.state().split());
}

#[test]
fn overflowed_command_is_reported_not_dispatched() {
    let sim = SimDevice::new();
    let mut cat = dispatcher(&sim);

    // 20 body characters for a 16-byte buffer: clamped, reported,
    // and the mangled line never mutates state.
    let outcomes = feed_all(&mut cat, b"*FA71000000000000000000\r");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(
        outcomes[0].as_ref().unwrap_err(),
        &Error::BufferOverflow { capacity: 15 }
    );
    assert_eq!(cat.state().vfo_a(), freq(7_074_000));
    assert!(sim.sent().is_empty());

    // Framing continues: the next command dispatches normally.
    let outcomes = feed_all(&mut cat, b"*FA7100000\r");
    assert!(outcomes[0].is_ok());
    assert_eq!(cat.state().vfo_a(), freq(7_100_000));
}

#[test]
fn lowercase_input_is_accepted() {
    let sim = SimDevice::new();
    let mut cat = dispatcher(&sim);

    let outcomes = feed_all(&mut cat, b"*fb14074000\n");
    assert!(outcomes[0].is_ok());
    assert_eq!(cat.state().vfo_b(), freq(14_074_000));
}

#[test]
fn noise_before_sentinel_is_ignored() {
    let sim = SimDevice::new();
    let mut cat = dispatcher(&sim);

    let outcomes = feed_all(&mut cat, b"\r\ngarbage\r\n*X1\r");
    assert_eq!(outcomes.len(), 1);
    assert!(cat.state().transmit());
}

#[test]
fn failed_dispatch_discards_the_line() {
    let sim = SimDevice::new();
    let mut cat = dispatcher(&sim);

    // Out-of-band set fails...
    let outcomes = feed_all(&mut cat, b"*FA6000000\r");
    assert!(outcomes[0].is_err());
    // ...and is gone: a bare terminator afterwards redispatches nothing.
    let outcomes = feed_all(&mut cat, b"\r\r");
    assert!(outcomes.is_empty());
}
