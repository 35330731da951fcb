//! # dissect802 - 802.11 monitor-mode capture parsing
//!
//! A read-only parser for raw 802.11 frames captured in monitor mode.
//! Each capture carries two adjacent headers, and each gets its own
//! decoder:
//!
//! - `radiotap`: the self-describing physical-layer metadata header
//!   prepended by the capture driver (channel, rate, signal strength,
//!   modulation details)
//! - `mpdu`: the MAC-layer frame proper, with its type/subtype
//!   dependent address layout, QoS control, management frame bodies,
//!   and layer-2 encryption header/trailer
//!
//! Both decoders are pure functions over a caller-owned byte slice:
//! no I/O, no shared state, no allocation beyond the returned record.
//! Socket acquisition and everything above the MAC layer (LLC/SNAP,
//! IP) are the caller's business.
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use dissect802::CapturedFrame;
//!
//! // a minimal 8-byte radiotap header followed by an RTS frame
//! let mut cap = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
//! cap.extend_from_slice(&[0xb4, 0x00, 0x10, 0x30]);
//! cap.extend_from_slice(&[0xac, 0xb5, 0x7d, 0x8d, 0x3b, 0x30]); // ra
//! cap.extend_from_slice(&[0x3c, 0x46, 0xd8, 0x7e, 0x0e, 0xdd]); // ta
//!
//! let frame = CapturedFrame::parse(Bytes::from(cap))?;
//! assert_eq!(frame.radiotap.sz, 8);
//! assert_eq!(frame.mpdu.subtype_name(), "rts");
//! assert_eq!(frame.mpdu.addr2.unwrap().to_string(), "3c:46:d8:7e:0e:dd");
//! # Ok::<(), dissect802::ParseError>(())
//! ```

pub mod bits;
pub mod dot11u;
pub mod error;
pub mod frame;
pub mod ieee80211;
pub mod mcs;
pub mod mpdu;
pub mod radiotap;

pub use bits::MacAddr;
pub use error::{FieldError, ParseError, Result};
pub use frame::CapturedFrame;
pub use mcs::{Bandwidth, Gi};
pub use mpdu::Mpdu;
pub use radiotap::Radiotap;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Radiotap>();
        assert_send_sync::<Mpdu>();
        assert_send_sync::<CapturedFrame>();
    }
}
