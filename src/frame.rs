//! Capture-level frame object.
//!
//! Ties the two decoders together: the Radiotap header is parsed
//! first, its `flags` field decides whether the MPDU carries a
//! trailing FCS and whether padding sits between the two headers,
//! and the MPDU decoder consumes the rest.

use bytes::Bytes;
use tracing::trace;

use crate::bits;
use crate::error::{ParseError, Result};
use crate::mpdu::Mpdu;
use crate::radiotap::Radiotap;

/// One monitor-mode capture: raw bytes plus both parsed headers.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Raw capture, Radiotap header included.
    pub data: Bytes,
    pub radiotap: Radiotap,
    pub mpdu: Mpdu,
    mpdu_start: usize,
}

impl CapturedFrame {
    /// Parse a complete monitor-mode capture.
    pub fn parse(data: Bytes) -> Result<Self> {
        let radiotap = Radiotap::parse(&data)?;
        let mut start = radiotap.sz;
        if radiotap.flags.map_or(false, |f| f.datapad()) {
            // Atheros pads the MPDU start out to a 4-byte boundary
            start = bits::align(start, 4);
            trace!(start, "datapad flag set, aligning mpdu start");
        }
        if start > data.len() {
            return Err(ParseError::Truncated {
                field: "mpdu",
                needed: start - radiotap.sz,
                available: data.len() - radiotap.sz,
            });
        }
        let mpdu = Mpdu::parse(&data[start..], radiotap.has_fcs())?;
        Ok(Self {
            data,
            radiotap,
            mpdu,
            mpdu_start: start,
        })
    }

    /// Offset of the first MPDU byte within `data`.
    pub fn mpdu_start(&self) -> usize {
        self.mpdu_start
    }

    /// The MSDU payload: everything between the MAC/encryption header
    /// and the stripped trailer bytes.
    pub fn payload(&self) -> Bytes {
        let r = self.mpdu.payload_range();
        self.data
            .slice(self.mpdu_start + r.start..self.mpdu_start + r.end)
    }

    /// Data rate in Mb/s from the capture metadata.
    pub fn rate_mbps(&self) -> Option<f64> {
        self.radiotap.rate_mbps()
    }

    /// Received signal strength in dBm.
    pub fn rssi(&self) -> Option<i8> {
        self.radiotap.rssi()
    }

    /// Channel center frequency in MHz.
    pub fn freq(&self) -> Option<u16> {
        self.radiotap.channel.map(|c| c.freq)
    }

    pub fn is_data(&self) -> bool {
        self.mpdu.framectrl.ftype == crate::mpdu::FrameType::Data
    }

    pub fn is_beacon(&self) -> bool {
        self.mpdu.framectrl.ftype == crate::mpdu::FrameType::Management
            && self.mpdu.framectrl.subtype == crate::ieee80211::mgmt_subtype::BEACON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpdu::{Crypt, FrameType};
    use bytes::BufMut;

    fn radiotap_ofdm(flags: u8) -> Vec<u8> {
        vec![
            0x00, 0x00, 0x12, 0x00, // v0, it_len 18
            0x2e, 0x48, 0x00, 0x00, // flags rate channel antsignal antenna rx-flags
            flags, 0x24, 0x85, 0x09, 0xc0, 0x00, 0xb5, 0x01, 0x00, 0x00,
        ]
    }

    #[test]
    fn test_qos_data_capture_identity() {
        // radiotap + protected qos-data, no fcs
        let mut cap = radiotap_ofdm(0x00);
        cap.put_u8(0x88);
        cap.put_u8(0x41); // to-ds | protected
        cap.put_u16_le(0x002c);
        cap.put_slice(&[0x04, 0xa1, 0x51, 0xd0, 0xdc, 0x0f]);
        cap.put_slice(&[0xb0, 0x34, 0x95, 0x6e, 0x30, 0x02]);
        cap.put_slice(&[0x04, 0xa1, 0x51, 0xd0, 0xdc, 0x0f]);
        cap.put_u16_le(960 << 4);
        cap.put_u16_le(0x0000);
        cap.put_slice(&[0x01, 0x02, 0x00, 0x20, 0x03, 0x04, 0x05, 0x06]);
        cap.put_bytes(0xaa, 111);
        cap.put_slice(&[0u8; 8]);
        assert_eq!(cap.len(), 171);

        let f = CapturedFrame::parse(Bytes::from(cap)).unwrap();
        assert_eq!(f.radiotap.sz, 18);
        assert_eq!(f.rate_mbps(), Some(18.0));
        assert_eq!(f.rssi(), Some(-75));
        assert_eq!(f.freq(), Some(2437));
        assert!(f.is_data());
        assert_eq!(f.mpdu.crypt.as_ref().map(Crypt::kind), Some("ccmp"));
        // radiotap size plus mpdu size covers the whole capture
        assert_eq!(f.radiotap.sz + f.mpdu.size, f.data.len());
        assert_eq!((f.mpdu.offset, f.mpdu.stripped), (34, 8));
        assert_eq!(f.payload().len(), 111);
        assert!(f.payload().iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn test_rts_capture_with_fcs() {
        let mut cap = radiotap_ofdm(0x10); // fcs flag
        cap[9] = 0x30; // rate 24 Mb/s
        cap.put_u8(0xb4);
        cap.put_u8(0x00);
        cap.put_u16_le(0x3010);
        cap.put_slice(&[0xac, 0xb5, 0x7d, 0x8d, 0x3b, 0x30]);
        cap.put_slice(&[0x3c, 0x46, 0xd8, 0x7e, 0x0e, 0xdd]);
        cap.put_u32_le(0xde305585);
        assert_eq!(cap.len(), 38);

        let f = CapturedFrame::parse(Bytes::from(cap)).unwrap();
        assert!(f.radiotap.has_fcs());
        assert_eq!(f.mpdu.framectrl.ftype, FrameType::Control);
        assert_eq!(f.mpdu.framectrl.subtype, 11);
        assert_eq!(f.mpdu.fcs, Some(0xde305585));
        assert_eq!((f.mpdu.size, f.mpdu.offset, f.mpdu.stripped), (20, 16, 4));
        assert_eq!(f.radiotap.sz + f.mpdu.size, 38);
        assert!(f.payload().is_empty());
    }

    #[test]
    fn test_datapad_aligns_mpdu_start() {
        // 18-byte radiotap with the datapad flag: mpdu starts at 20
        let mut cap = radiotap_ofdm(0x20);
        cap.put_slice(&[0x00, 0x00]); // pad to 4-byte boundary
        cap.put_u8(0x48); // null data
        cap.put_u8(0x00);
        cap.put_u16_le(0);
        cap.put_slice(&[0xff; 6]);
        cap.put_slice(&[0xb0, 0x34, 0x95, 0x6e, 0x30, 0x02]);
        cap.put_slice(&[0x04, 0xa1, 0x51, 0xd0, 0xdc, 0x0f]);
        cap.put_u16_le(0);
        let f = CapturedFrame::parse(Bytes::from(cap)).unwrap();
        assert_eq!(f.mpdu_start(), 20);
        assert_eq!(f.mpdu.framectrl.ftype, FrameType::Data);
        assert_eq!(f.mpdu.framectrl.subtype, 4);
        assert!(f.mpdu.error.is_empty());
    }

    #[test]
    fn test_beacon_predicate() {
        let mut cap = radiotap_ofdm(0x00);
        cap.put_u8(0x80);
        cap.put_u8(0x00);
        cap.put_u16_le(0);
        cap.put_slice(&[0xff; 6]);
        cap.put_slice(&[0x04, 0xa1, 0x51, 0xd0, 0xdc, 0x0f]);
        cap.put_slice(&[0x04, 0xa1, 0x51, 0xd0, 0xdc, 0x0f]);
        cap.put_u16_le(0);
        cap.put_u64_le(1);
        cap.put_u16_le(100);
        cap.put_u16_le(0x0001);
        cap.put_slice(&[0x00, 0x02, b'h', b'i']);
        let f = CapturedFrame::parse(Bytes::from(cap)).unwrap();
        assert!(f.is_beacon());
        assert!(!f.is_data());
        assert_eq!(f.mpdu.ssid(), Some(&b"hi"[..]));
    }

    #[test]
    fn test_truncated_mpdu_is_fatal() {
        let mut cap = radiotap_ofdm(0x00);
        cap.put_slice(&[0x88, 0x41, 0x00]); // 3 mpdu bytes
        let err = CapturedFrame::parse(Bytes::from(cap)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Truncated {
                field: "framectrl",
                ..
            }
        ));
    }
}
