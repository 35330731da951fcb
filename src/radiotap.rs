//! Radiotap pseudo-header parsing.
//!
//! Radiotap is the de-facto standard capture metadata header
//! prepended to 802.11 frames received in monitor mode: a versioned,
//! little-endian, self-describing structure whose chained presence
//! bitmaps announce which fields follow, each aligned to its natural
//! boundary relative to the start of the header.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::bits;
use crate::error::{FieldError, ParseError, Result};
use crate::mcs::{self, Bandwidth, Gi};

/// Presence bits of the canonical namespace.
pub mod present {
    pub const TSFT: u32 = 1 << 0;
    pub const FLAGS: u32 = 1 << 1;
    pub const RATE: u32 = 1 << 2;
    pub const CHANNEL: u32 = 1 << 3;
    pub const FHSS: u32 = 1 << 4;
    pub const DBM_ANTSIGNAL: u32 = 1 << 5;
    pub const DBM_ANTNOISE: u32 = 1 << 6;
    pub const LOCK_QUALITY: u32 = 1 << 7;
    pub const TX_ATTENUATION: u32 = 1 << 8;
    pub const DB_TX_ATTENUATION: u32 = 1 << 9;
    pub const DBM_TX_POWER: u32 = 1 << 10;
    pub const ANTENNA: u32 = 1 << 11;
    pub const DB_ANTSIGNAL: u32 = 1 << 12;
    pub const DB_ANTNOISE: u32 = 1 << 13;
    pub const RX_FLAGS: u32 = 1 << 14;
    pub const MCS: u32 = 1 << 19;
    pub const AMPDU: u32 = 1 << 20;
    pub const VHT: u32 = 1 << 21;
    pub const RADIOTAP_NS: u32 = 1 << 29;
    pub const VENDOR_NS: u32 = 1 << 30;
    pub const EXT: u32 = 1 << 31;
}

/// Bits of the `flags` field.
pub mod flag {
    pub const CFP: u8 = 0x01;
    pub const SHORT_PREAMBLE: u8 = 0x02;
    pub const WEP: u8 = 0x04;
    pub const FRAG: u8 = 0x08;
    pub const FCS: u8 = 0x10;
    pub const DATAPAD: u8 = 0x20;
    pub const BAD_FCS: u8 = 0x40;
    pub const SHORT_GI: u8 = 0x80;
}

/// Known bits of the MCS field.
pub mod mcs_known {
    pub const BW: u8 = 0x01;
    pub const INDEX: u8 = 0x02;
    pub const GI: u8 = 0x04;
    pub const FORMAT: u8 = 0x08;
    pub const FEC: u8 = 0x10;
    pub const STBC: u8 = 0x20;
    pub const NESS: u8 = 0x40;
}

/// Flag bits of the MCS field.
pub mod mcs_flag {
    pub const BW_MASK: u8 = 0x03;
    pub const SHORT_GI: u8 = 0x04;
    pub const GREENFIELD: u8 = 0x08;
    pub const LDPC: u8 = 0x10;
    pub const STBC_MASK: u8 = 0x60;
    pub const NESS_BIT0: u8 = 0x80;
}

/// Canonical field tags, in presence-bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RtapField {
    Tsft,
    Flags,
    Rate,
    Channel,
    Fhss,
    AntSignal,
    AntNoise,
    LockQuality,
    TxAttenuation,
    DbTxAttenuation,
    DbmTxPower,
    Antenna,
    DbAntSignal,
    DbAntNoise,
    RxFlags,
    Mcs,
    Ampdu,
    Vht,
}

impl RtapField {
    pub fn name(&self) -> &'static str {
        match self {
            RtapField::Tsft => "tsft",
            RtapField::Flags => "flags",
            RtapField::Rate => "rate",
            RtapField::Channel => "channel",
            RtapField::Fhss => "fhss",
            RtapField::AntSignal => "antsignal",
            RtapField::AntNoise => "antnoise",
            RtapField::LockQuality => "lock-quality",
            RtapField::TxAttenuation => "tx-attenuation",
            RtapField::DbTxAttenuation => "db-tx-attenuation",
            RtapField::DbmTxPower => "dbm-tx-power",
            RtapField::Antenna => "antenna",
            RtapField::DbAntSignal => "db-antsignal",
            RtapField::DbAntNoise => "db-antnoise",
            RtapField::RxFlags => "rx-flags",
            RtapField::Mcs => "mcs",
            RtapField::Ampdu => "a-mpdu",
            RtapField::Vht => "vht",
        }
    }
}

// bit -> (tag, alignment, size)
const CATALOG: [(u32, RtapField, usize, usize); 18] = [
    (0, RtapField::Tsft, 8, 8),
    (1, RtapField::Flags, 1, 1),
    (2, RtapField::Rate, 1, 1),
    (3, RtapField::Channel, 2, 4),
    (4, RtapField::Fhss, 1, 2),
    (5, RtapField::AntSignal, 1, 1),
    (6, RtapField::AntNoise, 1, 1),
    (7, RtapField::LockQuality, 2, 2),
    (8, RtapField::TxAttenuation, 2, 2),
    (9, RtapField::DbTxAttenuation, 2, 2),
    (10, RtapField::DbmTxPower, 1, 1),
    (11, RtapField::Antenna, 1, 1),
    (12, RtapField::DbAntSignal, 1, 1),
    (13, RtapField::DbAntNoise, 1, 1),
    (14, RtapField::RxFlags, 2, 2),
    (19, RtapField::Mcs, 1, 3),
    (20, RtapField::Ampdu, 4, 8),
    (21, RtapField::Vht, 2, 12),
];

fn catalog_entry(bit: u32) -> Option<(RtapField, usize, usize)> {
    CATALOG
        .iter()
        .find(|(b, _, _, _)| *b == bit)
        .map(|&(_, tag, align, size)| (tag, align, size))
}

/// The `flags` field: capture-level properties of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flags(pub u8);

impl Flags {
    pub fn is_set(&self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    /// Frame includes a trailing FCS.
    pub fn fcs(&self) -> bool {
        self.is_set(flag::FCS)
    }

    /// Frame has padding between the 802.11 header and the payload.
    pub fn datapad(&self) -> bool {
        self.is_set(flag::DATAPAD)
    }

    pub fn bad_fcs(&self) -> bool {
        self.is_set(flag::BAD_FCS)
    }

    /// Names of the set bits, ascending bit order.
    pub fn names(&self) -> Vec<&'static str> {
        const NAMES: [(u8, &str); 8] = [
            (flag::CFP, "cfp"),
            (flag::SHORT_PREAMBLE, "preamble"),
            (flag::WEP, "wep"),
            (flag::FRAG, "frag"),
            (flag::FCS, "fcs"),
            (flag::DATAPAD, "datapad"),
            (flag::BAD_FCS, "badfcs"),
            (flag::SHORT_GI, "shortgi"),
        ];
        NAMES
            .iter()
            .filter(|(m, _)| self.0 & m != 0)
            .map(|&(_, n)| n)
            .collect()
    }
}

/// Channel flag tags, in mask order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelFlag {
    Turbo,
    Cck,
    Ofdm,
    Ism,
    Unii,
    Passive,
    Dcck,
    Gfsk,
    Gsm,
    Scck,
    Sofdm,
    Quarter,
    Half,
    Ht,
}

const CHANNEL_FLAGS: [(u32, ChannelFlag); 14] = [
    (0x0000_0010, ChannelFlag::Turbo),
    (0x0000_0020, ChannelFlag::Cck),
    (0x0000_0040, ChannelFlag::Ofdm),
    (0x0000_0080, ChannelFlag::Ism),
    (0x0000_0100, ChannelFlag::Unii),
    (0x0000_0200, ChannelFlag::Passive),
    (0x0000_0400, ChannelFlag::Dcck),
    (0x0000_0800, ChannelFlag::Gfsk),
    (0x0000_1000, ChannelFlag::Gsm),
    (0x0000_2000, ChannelFlag::Scck),
    (0x0000_4000, ChannelFlag::Sofdm),
    (0x0000_8000, ChannelFlag::Quarter),
    (0x0001_0000, ChannelFlag::Half),
    (0x0002_0000, ChannelFlag::Ht),
];

impl ChannelFlag {
    /// Decode a channel flags bitmap into the set of tags present.
    pub fn from_mask(mask: u32) -> Vec<ChannelFlag> {
        CHANNEL_FLAGS
            .iter()
            .filter(|(m, _)| mask & m != 0)
            .map(|&(_, f)| f)
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChannelFlag::Turbo => "turbo",
            ChannelFlag::Cck => "cck",
            ChannelFlag::Ofdm => "ofdm",
            ChannelFlag::Ism => "ism",
            ChannelFlag::Unii => "unii",
            ChannelFlag::Passive => "passive",
            ChannelFlag::Dcck => "dcck",
            ChannelFlag::Gfsk => "gfsk",
            ChannelFlag::Gsm => "gsm",
            ChannelFlag::Scck => "scck",
            ChannelFlag::Sofdm => "sofdm",
            ChannelFlag::Quarter => "quarter",
            ChannelFlag::Half => "half",
            ChannelFlag::Ht => "ht",
        }
    }
}

/// Tuned channel: center frequency in MHz plus flag bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub freq: u16,
    pub flags: u16,
}

/// Frequency-hopping set and pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fhss {
    pub hop_set: u8,
    pub hop_pattern: u8,
}

/// Raw MCS field bytes as captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct McsField {
    pub known: u8,
    pub flags: u8,
    pub index: u8,
}

/// Projection of the MCS known/flags bytes: only parameters whose
/// known bit is set are populated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct McsParams {
    pub bw: Option<Bandwidth>,
    pub gi: Option<Gi>,
    pub greenfield: Option<bool>,
    pub ldpc_fec: Option<bool>,
    pub stbc: Option<u8>,
    pub ness: Option<u8>,
}

/// A-MPDU status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ampdu {
    pub reference: u32,
    pub flags: u16,
    pub delim_crc: u8,
    pub reserved: u8,
}

/// VHT field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vht {
    pub known: u16,
    pub flags: u8,
    pub bw: u8,
    pub mcs_nss: [u8; 4],
    pub coding: u8,
    pub group_id: u8,
    pub partial_aid: u16,
}

/// A vendor namespace encountered in the presence chain. Its field
/// data is opaque and skipped via the advertised length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorNamespace {
    pub oui: [u8; 3],
    pub sub_namespace: u8,
    pub skip_len: u16,
}

/// One parsed Radiotap pseudo-header.
///
/// A field tag appears in `present` exactly when the matching typed
/// field is populated; decode failures for individual fields land in
/// `error` instead and never abort the walk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Radiotap {
    /// Header version, always 0.
    pub vers: u8,
    /// Total header length in bytes, including padding.
    pub sz: usize,
    /// Decoded fields in walk order.
    pub present: Vec<RtapField>,
    pub tsft: Option<u64>,
    pub flags: Option<Flags>,
    /// Data rate in units of 500 kb/s.
    pub rate: Option<u8>,
    pub channel: Option<Channel>,
    pub fhss: Option<Fhss>,
    /// Signal power at the antenna in dBm.
    pub antsignal: Option<i8>,
    /// Noise power at the antenna in dBm.
    pub antnoise: Option<i8>,
    pub lock_quality: Option<u16>,
    pub tx_attenuation: Option<u16>,
    pub db_tx_attenuation: Option<u16>,
    pub dbm_tx_power: Option<i8>,
    pub antenna: Option<u8>,
    pub db_antsignal: Option<u8>,
    pub db_antnoise: Option<u8>,
    pub rx_flags: Option<u16>,
    pub mcs: Option<McsField>,
    pub ampdu: Option<Ampdu>,
    pub vht: Option<Vht>,
    /// Vendor namespaces encountered and skipped.
    pub vendor: Vec<VendorNamespace>,
    /// Recoverable per-field decode errors.
    pub error: Vec<FieldError>,
}

impl Radiotap {
    /// Parse a Radiotap header from the start of `buf`.
    ///
    /// Fails outright only on a bad version or an `it_len` that is
    /// below the 8-byte minimum, beyond the buffer, or inconsistent
    /// with the presence chain. Per-field problems are recorded in
    /// [`Radiotap::error`] and the record is still returned.
    pub fn parse(buf: &[u8]) -> Result<Radiotap> {
        if buf.len() < 8 {
            return Err(ParseError::Truncated {
                field: "radiotap",
                needed: 8,
                available: buf.len(),
            });
        }
        let vers = buf[0];
        if vers != 0 {
            return Err(ParseError::BadVersion(vers));
        }
        let sz = bits::read_u16_le(buf, 2, "radiotap.it_len")? as usize;
        if sz < 8 || sz > buf.len() {
            return Err(ParseError::BadLength {
                len: sz,
                available: buf.len(),
            });
        }
        let hdr = &buf[..sz];

        // Presence chain: bit 31 announces another word.
        let mut words = Vec::new();
        let mut cursor = 4usize;
        loop {
            let w = bits::read_u32_le(hdr, cursor, "radiotap.present").map_err(|_| {
                ParseError::BadLength {
                    len: sz,
                    available: buf.len(),
                }
            })?;
            cursor += 4;
            words.push(w);
            if w & present::EXT == 0 {
                break;
            }
        }

        let mut rt = Radiotap {
            vers,
            sz,
            ..Radiotap::default()
        };

        let mut in_vendor_ns = false;
        'words: for &w in &words {
            if w & present::RADIOTAP_NS != 0 {
                in_vendor_ns = false;
            }
            for bit in 0..29u32 {
                if w & (1 << bit) == 0 {
                    continue;
                }
                if in_vendor_ns {
                    // data already skipped via the namespace length
                    continue;
                }
                let (tag, align, size) = match catalog_entry(bit) {
                    Some(e) => e,
                    None => {
                        debug!(bit, "presence bit without catalog entry, abandoning word");
                        rt.error.push(FieldError::new(
                            format!("radiotap.bit{bit}"),
                            ParseError::UnknownField(bit),
                        ));
                        continue 'words;
                    }
                };
                let off = bits::align(cursor, align);
                cursor = off + size;
                if cursor > hdr.len() {
                    trace!(field = tag.name(), "field body past it_len");
                    rt.error.push(FieldError::new(
                        format!("radiotap.{}", tag.name()),
                        ParseError::Truncated {
                            field: tag.name(),
                            needed: size,
                            available: hdr.len().saturating_sub(off),
                        },
                    ));
                    continue;
                }
                rt.decode_field(tag, &hdr[off..off + size]);
                rt.present.push(tag);
            }
            if w & present::VENDOR_NS != 0 {
                let off = bits::align(cursor, 2);
                match bits::take(hdr, off, 6, "radiotap.vendor-ns") {
                    Ok(v) => {
                        let skip_len = u16::from_le_bytes([v[4], v[5]]);
                        rt.vendor.push(VendorNamespace {
                            oui: [v[0], v[1], v[2]],
                            sub_namespace: v[3],
                            skip_len,
                        });
                        cursor = off + 6 + skip_len as usize;
                        in_vendor_ns = true;
                    }
                    Err(e) => {
                        rt.error.push(FieldError::new("radiotap.vendor-ns", e));
                        break 'words;
                    }
                }
            }
        }
        // anything between the last field and it_len is padding

        Ok(rt)
    }

    // `body` is exactly the field's catalog size.
    fn decode_field(&mut self, tag: RtapField, body: &[u8]) {
        match tag {
            RtapField::Tsft => {
                let mut b = [0u8; 8];
                b.copy_from_slice(body);
                self.tsft = Some(u64::from_le_bytes(b));
            }
            RtapField::Flags => self.flags = Some(Flags(body[0])),
            RtapField::Rate => self.rate = Some(body[0]),
            RtapField::Channel => {
                self.channel = Some(Channel {
                    freq: u16::from_le_bytes([body[0], body[1]]),
                    flags: u16::from_le_bytes([body[2], body[3]]),
                })
            }
            RtapField::Fhss => {
                self.fhss = Some(Fhss {
                    hop_set: body[0],
                    hop_pattern: body[1],
                })
            }
            RtapField::AntSignal => self.antsignal = Some(body[0] as i8),
            RtapField::AntNoise => self.antnoise = Some(body[0] as i8),
            RtapField::LockQuality => self.lock_quality = Some(u16::from_le_bytes([body[0], body[1]])),
            RtapField::TxAttenuation => {
                self.tx_attenuation = Some(u16::from_le_bytes([body[0], body[1]]))
            }
            RtapField::DbTxAttenuation => {
                self.db_tx_attenuation = Some(u16::from_le_bytes([body[0], body[1]]))
            }
            RtapField::DbmTxPower => self.dbm_tx_power = Some(body[0] as i8),
            RtapField::Antenna => self.antenna = Some(body[0]),
            RtapField::DbAntSignal => self.db_antsignal = Some(body[0]),
            RtapField::DbAntNoise => self.db_antnoise = Some(body[0]),
            RtapField::RxFlags => self.rx_flags = Some(u16::from_le_bytes([body[0], body[1]])),
            RtapField::Mcs => {
                self.mcs = Some(McsField {
                    known: body[0],
                    flags: body[1],
                    index: body[2],
                })
            }
            RtapField::Ampdu => {
                self.ampdu = Some(Ampdu {
                    reference: u32::from_le_bytes([body[0], body[1], body[2], body[3]]),
                    flags: u16::from_le_bytes([body[4], body[5]]),
                    delim_crc: body[6],
                    reserved: body[7],
                })
            }
            RtapField::Vht => {
                self.vht = Some(Vht {
                    known: u16::from_le_bytes([body[0], body[1]]),
                    flags: body[2],
                    bw: body[3],
                    mcs_nss: [body[4], body[5], body[6], body[7]],
                    coding: body[8],
                    group_id: body[9],
                    partial_aid: u16::from_le_bytes([body[10], body[11]]),
                })
            }
        }
    }

    /// Whether the capture carries a trailing FCS, per the flags field.
    pub fn has_fcs(&self) -> bool {
        self.flags.map_or(false, |f| f.fcs())
    }

    /// Data rate in Mb/s: the legacy rate field when present,
    /// otherwise derived from the MCS field.
    pub fn rate_mbps(&self) -> Option<f64> {
        if let Some(r) = self.rate {
            return Some(f64::from(r) * 0.5);
        }
        let m = self.mcs?;
        let gi = if m.flags & mcs_flag::SHORT_GI != 0 {
            Gi::Short
        } else {
            Gi::Long
        };
        mcs::ht_rate(m.index, Bandwidth::from_mcs_flags(m.flags), gi)
    }

    /// Channel flag tags of the channel field.
    pub fn chflags(&self) -> Vec<ChannelFlag> {
        self.channel
            .map(|c| ChannelFlag::from_mask(u32::from(c.flags)))
            .unwrap_or_default()
    }

    /// Received signal strength in dBm.
    pub fn rssi(&self) -> Option<i8> {
        self.antsignal
    }

    /// Project the MCS known/flags bytes into the parameters the
    /// capture actually knows.
    pub fn mcs_params(&self) -> Option<McsParams> {
        let m = self.mcs?;
        let mut p = McsParams::default();
        if m.known & mcs_known::BW != 0 {
            p.bw = Some(Bandwidth::from_mcs_flags(m.flags));
        }
        if m.known & mcs_known::GI != 0 {
            p.gi = Some(if m.flags & mcs_flag::SHORT_GI != 0 {
                Gi::Short
            } else {
                Gi::Long
            });
        }
        if m.known & mcs_known::FORMAT != 0 {
            p.greenfield = Some(m.flags & mcs_flag::GREENFIELD != 0);
        }
        if m.known & mcs_known::FEC != 0 {
            p.ldpc_fec = Some(m.flags & mcs_flag::LDPC != 0);
        }
        if m.known & mcs_known::STBC != 0 {
            p.stbc = Some((m.flags & mcs_flag::STBC_MASK) >> 5);
        }
        if m.known & mcs_known::NESS != 0 {
            p.ness = Some((m.flags & mcs_flag::NESS_BIT0) >> 7);
        }
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // flags | rate | channel | antsignal | antenna | rx-flags
    fn ofdm_header() -> Vec<u8> {
        vec![
            0x00, 0x00, 0x12, 0x00, // v0, pad, it_len 18
            0x2e, 0x48, 0x00, 0x00, // present 0x0000482e
            0x00, // flags
            0x24, // rate: 36 * 500kb/s
            0x85, 0x09, // freq 2437
            0xc0, 0x00, // chan flags: ofdm | ism
            0xb5, // antsignal -75
            0x01, // antenna
            0x00, 0x00, // rx-flags
        ]
    }

    #[test]
    fn test_ofdm_capture_walk() {
        let rt = Radiotap::parse(&ofdm_header()).unwrap();
        assert_eq!(rt.vers, 0);
        assert_eq!(rt.sz, 18);
        assert_eq!(
            rt.present,
            vec![
                RtapField::Flags,
                RtapField::Rate,
                RtapField::Channel,
                RtapField::AntSignal,
                RtapField::Antenna,
                RtapField::RxFlags,
            ]
        );
        assert!(rt.error.is_empty());
        assert_eq!(rt.rate, Some(0x24));
        assert_eq!(rt.rate_mbps(), Some(18.0));
        assert_eq!(rt.chflags(), vec![ChannelFlag::Ofdm, ChannelFlag::Ism]);
        assert_eq!(rt.rssi(), Some(-75));
        assert_eq!(rt.channel.unwrap().freq, 2437);
        assert!(!rt.has_fcs());
    }

    #[test]
    fn test_mcs_rate_derivation() {
        // flags | channel | antsignal | antenna | rx-flags | mcs
        let hdr = vec![
            0x00, 0x00, 0x15, 0x00, // v0, pad, it_len 21
            0x2a, 0x48, 0x08, 0x00, // present 0x0008482a
            0x00, // flags
            0x00, // padding: channel aligns to 10
            0x85, 0x09, // freq 2437
            0x80, 0x04, // chan flags: ism | dcck
            0xb3, // antsignal -77
            0x01, // antenna
            0x00, 0x00, // rx-flags
            0x07, 0x04, 0x05, // mcs: bw/index/gi known, short gi, index 5
        ];
        let rt = Radiotap::parse(&hdr).unwrap();
        assert_eq!(rt.sz, 21);
        assert!(rt.rate.is_none());
        let m = rt.mcs.unwrap();
        assert_eq!((m.known, m.flags, m.index), (0x07, 0x04, 0x05));
        assert_eq!(rt.chflags(), vec![ChannelFlag::Ism, ChannelFlag::Dcck]);
        assert_eq!(rt.rate_mbps(), Some(57.8));
        let p = rt.mcs_params().unwrap();
        assert_eq!(p.bw, Some(Bandwidth::Bw20));
        assert_eq!(p.gi, Some(Gi::Short));
        assert_eq!(p.greenfield, None);
    }

    #[test]
    fn test_fcs_flag() {
        let hdr = vec![
            0x00, 0x00, 0x12, 0x00, 0x2e, 0x48, 0x00, 0x00, //
            0x10, 0x30, 0x85, 0x09, 0xc0, 0x00, 0xb5, 0x01, 0x00, 0x00,
        ];
        let rt = Radiotap::parse(&hdr).unwrap();
        assert!(rt.has_fcs());
        assert!(rt.flags.unwrap().names().contains(&"fcs"));
        assert_eq!(rt.rate_mbps(), Some(24.0));
    }

    #[test]
    fn test_bad_version() {
        let mut hdr = ofdm_header();
        hdr[0] = 1;
        assert_eq!(
            Radiotap::parse(&hdr).unwrap_err(),
            ParseError::BadVersion(1)
        );
    }

    #[test]
    fn test_bad_length() {
        let mut hdr = ofdm_header();
        hdr[2] = 4; // below minimum
        assert!(matches!(
            Radiotap::parse(&hdr),
            Err(ParseError::BadLength { len: 4, .. })
        ));

        let mut hdr = ofdm_header();
        hdr[2] = 64; // past the buffer
        assert!(matches!(
            Radiotap::parse(&hdr),
            Err(ParseError::BadLength { len: 64, .. })
        ));
    }

    #[test]
    fn test_short_buffer() {
        assert!(matches!(
            Radiotap::parse(&[0x00, 0x00, 0x08]),
            Err(ParseError::Truncated { .. })
        ));
    }

    #[test]
    fn test_tsft_alignment() {
        // presence chain of two words forces field start past an
        // 8-byte boundary: tsft must align to 16, not start at 12
        let hdr = vec![
            0x00, 0x00, 0x18, 0x00, // it_len 24
            0x01, 0x00, 0x00, 0x80, // word 0: tsft | ext
            0x00, 0x00, 0x00, 0x20, // word 1: radiotap ns, nothing set
            0x00, 0x00, 0x00, 0x00, // alignment padding
            0xef, 0xcd, 0xab, 0x89, 0x67, 0x45, 0x23, 0x01, // tsft
        ];
        let rt = Radiotap::parse(&hdr).unwrap();
        assert_eq!(rt.tsft, Some(0x0123_4567_89ab_cdef));
        assert!(rt.error.is_empty());
    }

    #[test]
    fn test_unknown_bit_aborts_word() {
        // bit 15 has no catalog entry; rate (bit 2) decodes first,
        // nothing after the unknown bit in the same word does
        let hdr = vec![
            0x00, 0x00, 0x0c, 0x00, // it_len 12
            0x04, 0x80, 0x00, 0x00, // present: rate | bit 15
            0x16, // rate
            0x00, 0x00, 0x00,
        ];
        let rt = Radiotap::parse(&hdr).unwrap();
        assert_eq!(rt.present, vec![RtapField::Rate]);
        assert_eq!(rt.error.len(), 1);
        assert_eq!(rt.error[0].error, ParseError::UnknownField(15));
        assert_eq!(rt.error[0].field, "radiotap.bit15");
    }

    #[test]
    fn test_field_truncated_by_it_len() {
        // channel advertised but it_len stops after the rate byte
        let hdr = vec![
            0x00, 0x00, 0x09, 0x00, // it_len 9
            0x0c, 0x00, 0x00, 0x00, // present: rate | channel
            0x0b, // rate only
        ];
        let rt = Radiotap::parse(&hdr).unwrap();
        assert_eq!(rt.rate, Some(0x0b));
        assert!(rt.channel.is_none());
        assert_eq!(rt.present, vec![RtapField::Rate]);
        assert_eq!(rt.error.len(), 1);
        assert!(rt.error[0].field.contains("channel"));
    }

    #[test]
    fn test_vendor_namespace_skip() {
        let hdr = vec![
            0x00, 0x00, 0x18, 0x00, // it_len 24
            0x04, 0x00, 0x00, 0xc0, // word 0: rate | vendor ns | ext
            0x03, 0x00, 0x00, 0x00, // word 1: two vendor-defined bits
            0x16, // rate
            0x00, // align for vendor header
            0xaa, 0xbb, 0xcc, // oui
            0x01, // sub namespace
            0x04, 0x00, // skip 4
            0xde, 0xad, 0xbe, 0xef, // opaque vendor data
        ];
        let rt = Radiotap::parse(&hdr).unwrap();
        assert_eq!(rt.rate, Some(0x16));
        assert_eq!(rt.present, vec![RtapField::Rate]);
        assert_eq!(rt.vendor.len(), 1);
        assert_eq!(rt.vendor[0].oui, [0xaa, 0xbb, 0xcc]);
        assert_eq!(rt.vendor[0].skip_len, 4);
        assert!(rt.error.is_empty());
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let mut hdr = ofdm_header();
        hdr[2] = 0x20; // it_len 32, rest is padding
        hdr.resize(32, 0);
        let rt = Radiotap::parse(&hdr).unwrap();
        assert_eq!(rt.sz, 32);
        assert_eq!(rt.rate_mbps(), Some(18.0));
        assert!(rt.error.is_empty());
    }

    #[test]
    fn test_presence_chain_exceeds_length() {
        // ext bit set but it_len leaves no room for the next word
        let hdr = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x80];
        assert!(matches!(
            Radiotap::parse(&hdr),
            Err(ParseError::BadLength { .. })
        ));
    }
}
