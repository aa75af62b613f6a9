#![no_main]
use ifwatch::capture::{FrameMeta, LinkProtocol};
use ifwatch::classify::{classify, FilterState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let protocol = match data[0] % 3 {
        0 => LinkProtocol::Ipv4,
        1 => LinkProtocol::Ipv6,
        _ => LinkProtocol::Other,
    };
    let meta = FrameMeta {
        if_index: 1,
        protocol,
        ethertype: u16::from_be_bytes([data[1], data[2]]),
        hatype: u16::from(data[1]),
    };

    // Arbitrary frames must produce a verdict, never a panic.
    let _ = classify(&data[3..], &meta, &FilterState::default());
    let filter = FilterState {
        v6_in_v4_as_v6: false,
    };
    let _ = classify(&data[3..], &meta, &filter);
});
