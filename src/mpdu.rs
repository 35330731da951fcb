//! 802.11 MAC Protocol Data Unit parsing.
//!
//! Decodes the MAC header of a monitor-mode frame: frame control,
//! duration, the type/subtype-dependent address layout, sequence and
//! QoS control, management frame bodies, and the layer-2 encryption
//! header and trailer. The MSDU payload itself is left to the caller
//! as the window between `offset` and `size - stripped`. Frames that
//! carry an HT control field (order flag on management and QoS data
//! frames) are reported as unsupported rather than decoded.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::bits::{self, MacAddr};
use crate::dot11u;
use crate::error::{FieldError, ParseError, Result};
use crate::ieee80211::{self, ctrl_subtype, data_subtype, eid, ftype, mgmt_subtype};

/// Shortest parseable MPDU: frame control, duration and one address.
pub const MIN_MPDU: usize = 10;

/// Largest MPDU the standard allows.
pub const MAX_MPDU: usize = 7991;

fn fe<S: Into<String>>(path: S) -> impl FnOnce(ParseError) -> FieldError {
    move |e| FieldError::new(path, e)
}

fn arr<const N: usize>(s: &[u8]) -> [u8; N] {
    let mut a = [0u8; N];
    a.copy_from_slice(s);
    a
}

/// Frame type from frame control bits 2-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    Management,
    Control,
    Data,
    Reserved,
}

impl FrameType {
    pub fn from_bits(v: u8) -> Self {
        match v & 0x03 {
            0 => FrameType::Management,
            1 => FrameType::Control,
            2 => FrameType::Data,
            _ => FrameType::Reserved,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            FrameType::Management => ftype::MGMT,
            FrameType::Control => ftype::CTRL,
            FrameType::Data => ftype::DATA,
            FrameType::Reserved => ftype::RSRV,
        }
    }

    pub fn name(&self) -> &'static str {
        ieee80211::FT_TYPES[self.bits() as usize]
    }
}

/// Frame control flag bits (second octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FcFlags {
    pub to_ds: bool,
    pub from_ds: bool,
    pub more_frag: bool,
    pub retry: bool,
    pub pwr_mgmt: bool,
    pub more_data: bool,
    pub protected: bool,
    pub order: bool,
}

impl FcFlags {
    pub fn from_byte(b: u8) -> Self {
        Self {
            to_ds: b & 0x01 != 0,
            from_ds: b & 0x02 != 0,
            more_frag: b & 0x04 != 0,
            retry: b & 0x08 != 0,
            pwr_mgmt: b & 0x10 != 0,
            more_data: b & 0x20 != 0,
            protected: b & 0x40 != 0,
            order: b & 0x80 != 0,
        }
    }
}

/// Frame control: the first two octets of every MPDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameControl {
    pub vers: u8,
    pub ftype: FrameType,
    pub subtype: u8,
    pub flags: FcFlags,
}

impl FrameControl {
    pub fn from_bytes(b0: u8, b1: u8) -> Self {
        Self {
            vers: b0 & 0x03,
            ftype: FrameType::from_bits(b0 >> 2),
            subtype: b0 >> 4,
            flags: FcFlags::from_byte(b1),
        }
    }
}

/// Duration/ID field, interpreted by its high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationId {
    /// Virtual carrier sense duration in microseconds.
    Vcs { usec: u16 },
    /// Fixed value transmitted during the contention-free period.
    Cfp,
    /// Association ID in a PS-Poll.
    Aid { aid: u16 },
    Reserved,
}

impl DurationId {
    pub fn from_raw(v: u16) -> Self {
        if v & 0x8000 == 0 {
            return DurationId::Vcs { usec: v & 0x7fff };
        }
        if v & 0x4000 == 0 {
            if v == 0x8000 {
                return DurationId::Cfp;
            }
        } else {
            let aid = v & 0x3fff;
            if (1..=2007).contains(&aid) {
                return DurationId::Aid { aid };
            }
        }
        DurationId::Reserved
    }
}

/// Sequence control: fragment and sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqCtrl {
    pub frag_no: u8,
    pub seq_no: u16,
}

impl SeqCtrl {
    pub fn from_raw(v: u16) -> Self {
        Self {
            frag_no: (v & 0x0f) as u8,
            seq_no: v >> 4,
        }
    }
}

/// QoS control field of QoS data subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosCtrl {
    pub tid: u8,
    pub eosp: bool,
    pub ack_policy: u8,
    pub amsdu: bool,
    /// Bits 8-15; meaning varies with the frame's direction and TID.
    pub txop: u8,
}

impl QosCtrl {
    pub fn from_bytes(lsb: u8, msb: u8) -> Self {
        Self {
            tid: lsb & 0x0f,
            eosp: lsb & 0x10 != 0,
            ack_policy: (lsb >> 5) & 0x03,
            amsdu: lsb & 0x80 != 0,
            txop: msb,
        }
    }
}

/// BA/BAR control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaControl {
    pub ack_policy: bool,
    pub multi_tid: bool,
    pub compressed: bool,
    pub tid_info: u8,
}

impl BaControl {
    pub fn from_raw(v: u16) -> Self {
        Self {
            ack_policy: v & 0x0001 != 0,
            multi_tid: v & 0x0002 != 0,
            compressed: v & 0x0004 != 0,
            tid_info: (v >> 12) as u8,
        }
    }
}

/// Per-TID entry of a multi-TID BlockAckReq.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarTid {
    pub tid: u8,
    pub seqctrl: SeqCtrl,
}

/// BAR information, shaped by the multi-TID/compressed control bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockAckReqInfo {
    Basic(SeqCtrl),
    Compressed(SeqCtrl),
    MultiTid(Vec<BarTid>),
    Reserved(Vec<u8>),
}

/// A BlockAckReq body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAckReq {
    pub control: BaControl,
    pub info: BlockAckReqInfo,
}

/// Per-TID entry of a multi-TID BlockAck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaTid {
    pub tid: u8,
    pub seqctrl: SeqCtrl,
    pub bitmap: [u8; 8],
}

/// BA information, shaped by the multi-TID/compressed control bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockAckInfo {
    Basic { seqctrl: SeqCtrl, bitmap: Vec<u8> },
    Compressed { seqctrl: SeqCtrl, bitmap: [u8; 8] },
    MultiTid(Vec<BaTid>),
    Reserved(Vec<u8>),
}

/// A BlockAck body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAck {
    pub control: BaControl,
    pub info: BlockAckInfo,
}

/// Fixed (non-element) parameters of a management frame body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedParams {
    AssocReq {
        capability: u16,
        listen_interval: u16,
    },
    AssocResp {
        capability: u16,
        status_code: u16,
        aid: u16,
    },
    ReassocReq {
        capability: u16,
        listen_interval: u16,
        current_ap: MacAddr,
    },
    TimingAdv {
        timestamp: u64,
        capability: u16,
    },
    Beacon {
        timestamp: u64,
        /// Beacon interval converted from time units to microseconds.
        beacon_interval_us: u32,
        capability: u16,
    },
    Disassoc {
        reason_code: u16,
    },
    Auth {
        algorithm: u16,
        auth_seq: u16,
        status_code: u16,
    },
    Action {
        category: u8,
        action: u8,
        data: Vec<u8>,
    },
}

/// Interworking element body (Std 8.4.2.94, 802.11u).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interworking {
    /// Access network type code, see [`dot11u::access_net`].
    pub access_net: u8,
    pub internet: bool,
    pub asra: bool,
    pub esr: bool,
    pub uesa: bool,
    pub venue_group: Option<u8>,
    pub venue_type: Option<u8>,
    pub hessid: Option<MacAddr>,
}

impl Interworking {
    // 1-byte options octet, then optional venue info (2) and/or
    // hessid (6); any other length is not an interworking body
    fn decode(data: &[u8]) -> Option<Self> {
        let opts = *data.first()?;
        let mut iw = Interworking {
            access_net: opts & 0x0f,
            internet: opts & dot11u::access_net_opts::INTERNET != 0,
            asra: opts & dot11u::access_net_opts::ASRA != 0,
            esr: opts & dot11u::access_net_opts::ESR != 0,
            uesa: opts & dot11u::access_net_opts::UESA != 0,
            venue_group: None,
            venue_type: None,
            hessid: None,
        };
        let rest = &data[1..];
        match rest.len() {
            0 => {}
            2 => {
                iw.venue_group = Some(rest[0]);
                iw.venue_type = Some(rest[1]);
            }
            6 => iw.hessid = Some(MacAddr(arr::<6>(rest))),
            8 => {
                iw.venue_group = Some(rest[0]);
                iw.venue_type = Some(rest[1]);
                iw.hessid = Some(MacAddr(arr::<6>(&rest[2..])));
            }
            _ => return None,
        }
        Some(iw)
    }

    /// Venue group name per [`dot11u::venue_group_name`].
    pub fn venue_group_name(&self) -> Option<&'static str> {
        self.venue_group.map(dot11u::venue_group_name)
    }
}

/// One advertisement protocol tuple (Std 8.4.2.95).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvProtocolTuple {
    pub query_response_limit: u8,
    pub pame_bi: bool,
    /// Protocol ID, see [`dot11u::adv_proto`].
    pub protocol_id: u8,
}

fn adv_protocol(data: &[u8]) -> Option<Vec<AdvProtocolTuple>> {
    if data.is_empty() || data.len() % 2 != 0 {
        return None;
    }
    Some(
        data.chunks_exact(2)
            .map(|c| AdvProtocolTuple {
                query_response_limit: c[0] & 0x7f,
                pame_bi: c[0] & 0x80 != 0,
                protocol_id: c[1],
            })
            .collect(),
    )
}

/// Roaming consortium element body (Std 8.4.2.98).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoamingConsortium {
    /// Further OIs obtainable via an ANQP roaming consortium query.
    pub anqp_oi_count: u8,
    /// The organization identifiers carried inline, up to three.
    pub ois: Vec<Vec<u8>>,
}

impl RoamingConsortium {
    fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }
        let len1 = (data[1] & 0x0f) as usize;
        let len2 = (data[1] >> 4) as usize;
        let mut ois = Vec::new();
        let mut off = 2;
        for l in [len1, len2] {
            if l == 0 {
                continue;
            }
            if off + l > data.len() {
                return None;
            }
            ois.push(data[off..off + l].to_vec());
            off += l;
        }
        if off < data.len() {
            ois.push(data[off..].to_vec()); // OI #3 takes the remainder
        }
        Some(RoamingConsortium {
            anqp_oi_count: data[0],
            ois,
        })
    }
}

/// One information element of a management frame body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// SSID bytes; not necessarily valid UTF-8.
    Ssid(Vec<u8>),
    /// Supported rates in Mb/s (basic-rate bit masked off).
    SupportedRates(Vec<f64>),
    ExtendedRates(Vec<f64>),
    /// Current channel from the DSSS parameter set.
    DsssChannel(u8),
    /// 802.11u interworking service advertisement.
    Interworking(Interworking),
    /// 802.11u GAS advertisement protocol list.
    AdvProtocol(Vec<AdvProtocolTuple>),
    /// 802.11u roaming consortium organization identifiers.
    RoamingConsortium(RoamingConsortium),
    Other { eid: u8, data: Vec<u8> },
}

impl Element {
    fn decode(id: u8, data: &[u8]) -> Self {
        let rates = |d: &[u8]| -> Vec<f64> { d.iter().map(|b| f64::from(b & 0x7f) * 0.5).collect() };
        let other = |d: &[u8]| Element::Other {
            eid: id,
            data: d.to_vec(),
        };
        match id {
            eid::SSID => Element::Ssid(data.to_vec()),
            eid::SUPPORTED_RATES => Element::SupportedRates(rates(data)),
            eid::EXTENDED_RATES => Element::ExtendedRates(rates(data)),
            eid::DSSS if data.len() == 1 => Element::DsssChannel(data[0]),
            eid::INTERWORKING => match Interworking::decode(data) {
                Some(iw) => Element::Interworking(iw),
                None => other(data),
            },
            eid::ADV_PROTOCOL => match adv_protocol(data) {
                Some(ts) => Element::AdvProtocol(ts),
                None => other(data),
            },
            eid::ROAMING_CONS => match RoamingConsortium::decode(data) {
                Some(rc) => Element::RoamingConsortium(rc),
                None => other(data),
            },
            _ => other(data),
        }
    }

    pub fn eid(&self) -> u8 {
        match self {
            Element::Ssid(_) => eid::SSID,
            Element::SupportedRates(_) => eid::SUPPORTED_RATES,
            Element::ExtendedRates(_) => eid::EXTENDED_RATES,
            Element::DsssChannel(_) => eid::DSSS,
            Element::Interworking(_) => eid::INTERWORKING,
            Element::AdvProtocol(_) => eid::ADV_PROTOCOL,
            Element::RoamingConsortium(_) => eid::ROAMING_CONS,
            Element::Other { eid, .. } => *eid,
        }
    }
}

/// WEP header and trailer (Std 11.2.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WepHeader {
    pub iv: [u8; 3],
    pub key_id: u8,
    pub icv: [u8; 4],
}

/// TKIP header and trailer (Std 11.4.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TkipHeader {
    pub tsc1: u8,
    pub wep_seed: u8,
    pub tsc0: u8,
    pub key_id: u8,
    pub ext_iv: bool,
    pub tsc2: u8,
    pub tsc3: u8,
    pub tsc4: u8,
    pub tsc5: u8,
    pub mic: [u8; 8],
    pub icv: [u8; 4],
}

/// CCMP header and trailer (Std 11.4.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcmpHeader {
    /// Packet number, PN0 first.
    pub pn: [u8; 6],
    pub reserved: u8,
    pub key_id: u8,
    pub ext_iv: bool,
    pub mic: [u8; 8],
}

/// Layer-2 encryption header, one case per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crypt {
    Wep(WepHeader),
    Tkip(TkipHeader),
    Ccmp(CcmpHeader),
}

impl Crypt {
    pub fn kind(&self) -> &'static str {
        match self {
            Crypt::Wep(_) => "wep",
            Crypt::Tkip(_) => "tkip",
            Crypt::Ccmp(_) => "ccmp",
        }
    }

    /// Bytes the header occupies after the MAC header.
    pub fn header_len(&self) -> usize {
        match self {
            Crypt::Wep(_) => 4,
            Crypt::Tkip(_) | Crypt::Ccmp(_) => 8,
        }
    }

    /// Trailer bytes (MIC and/or ICV) before any FCS.
    pub fn trailer_len(&self) -> usize {
        match self {
            Crypt::Wep(_) => 4,
            Crypt::Tkip(_) => 12,
            Crypt::Ccmp(_) => 8,
        }
    }
}

/// Field tags for the `present` list, in decode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MpduField {
    FrameCtrl,
    Duration,
    Addr1,
    Addr2,
    Addr3,
    SeqCtrl,
    Addr4,
    Qos,
    FixedParams,
    InfoElements,
    BarCtrl,
    BaCtrl,
    Crypt,
    Fcs,
}

impl MpduField {
    pub fn name(&self) -> &'static str {
        match self {
            MpduField::FrameCtrl => "framectrl",
            MpduField::Duration => "duration",
            MpduField::Addr1 => "addr1",
            MpduField::Addr2 => "addr2",
            MpduField::Addr3 => "addr3",
            MpduField::SeqCtrl => "seqctrl",
            MpduField::Addr4 => "addr4",
            MpduField::Qos => "qos",
            MpduField::FixedParams => "fixed-params",
            MpduField::InfoElements => "info-elements",
            MpduField::BarCtrl => "barctrl",
            MpduField::BaCtrl => "bactrl",
            MpduField::Crypt => "crypt",
            MpduField::Fcs => "fcs",
        }
    }
}

/// One parsed MAC frame.
///
/// `offset` counts header bytes consumed from the front (including
/// any encryption header); `stripped` counts trailer bytes consumed
/// from the back (MIC/ICV and FCS). The payload, if any, is
/// `offset .. size - stripped` of the input.
#[derive(Debug, Clone, Serialize)]
pub struct Mpdu {
    pub framectrl: FrameControl,
    pub duration: DurationId,
    pub addr1: Option<MacAddr>,
    pub addr2: Option<MacAddr>,
    pub addr3: Option<MacAddr>,
    pub addr4: Option<MacAddr>,
    pub seqctrl: Option<SeqCtrl>,
    pub qos: Option<QosCtrl>,
    /// Management body fixed parameters, by subtype.
    pub fixed_params: Option<FixedParams>,
    /// Management body information elements, in wire order.
    pub elements: Vec<Element>,
    pub bar: Option<BlockAckReq>,
    pub ba: Option<BlockAck>,
    pub crypt: Option<Crypt>,
    pub fcs: Option<u32>,
    /// Total input bytes.
    pub size: usize,
    /// Bytes consumed from the front.
    pub offset: usize,
    /// Bytes consumed from the back.
    pub stripped: usize,
    /// Decoded fields in decode order.
    pub present: Vec<MpduField>,
    /// Recoverable decode errors, in occurrence order.
    pub error: Vec<FieldError>,
}

impl Mpdu {
    /// Parse one MPDU from `buf`. `has_fcs` signals that the capture
    /// kept the trailing 32-bit FCS (Radiotap `flags` bit 0x10).
    ///
    /// Only a buffer too short for frame control, duration and the
    /// first address is fatal; any later decode problem is recorded
    /// in [`Mpdu::error`] and the partial record is returned.
    pub fn parse(buf: &[u8], has_fcs: bool) -> Result<Mpdu> {
        if buf.len() < MIN_MPDU {
            return Err(ParseError::Truncated {
                field: "framectrl",
                needed: MIN_MPDU,
                available: buf.len(),
            });
        }
        let framectrl = FrameControl::from_bytes(buf[0], buf[1]);
        let duration = DurationId::from_raw(u16::from_le_bytes([buf[2], buf[3]]));
        let mut m = Mpdu {
            framectrl,
            duration,
            addr1: None,
            addr2: None,
            addr3: None,
            addr4: None,
            seqctrl: None,
            qos: None,
            fixed_params: None,
            elements: Vec::new(),
            bar: None,
            ba: None,
            crypt: None,
            fcs: None,
            size: buf.len(),
            offset: 4,
            stripped: 0,
            present: vec![MpduField::FrameCtrl, MpduField::Duration],
            error: Vec::new(),
        };

        let mut body = buf;
        if has_fcs {
            let n = buf.len();
            m.fcs = Some(u32::from_le_bytes([
                buf[n - 4],
                buf[n - 3],
                buf[n - 2],
                buf[n - 1],
            ]));
            m.stripped = 4;
            body = &buf[..n - 4];
        }

        let protected = framectrl.flags.protected;
        let walk = (|| -> std::result::Result<(), FieldError> {
            m.addr1 = Some(bits::read_mac(body, 4, "addr1").map_err(fe("addr1"))?);
            m.offset = 10;
            m.present.push(MpduField::Addr1);
            match framectrl.ftype {
                FrameType::Management => parse_mgmt(body, &mut m)?,
                FrameType::Control => parse_ctrl(body, &mut m)?,
                FrameType::Data => parse_data(body, &mut m)?,
                FrameType::Reserved => {
                    m.error.push(FieldError::new(
                        "framectrl.type",
                        ParseError::Unsupported("reserved frame type"),
                    ));
                }
            }
            if protected {
                parse_crypt(body, &mut m)?;
            }
            Ok(())
        })();
        if let Err(e) = walk {
            debug!(error = %e, "mpdu walk halted");
            m.error.push(e);
        }
        if has_fcs {
            m.present.push(MpduField::Fcs);
        }
        Ok(m)
    }

    /// Byte range of the MSDU payload within the input buffer.
    pub fn payload_range(&self) -> std::ops::Range<usize> {
        self.offset..self.size - self.stripped
    }

    pub fn type_name(&self) -> &'static str {
        self.framectrl.ftype.name()
    }

    pub fn subtype_name(&self) -> &'static str {
        ieee80211::subtype_name(self.framectrl.ftype.bits(), self.framectrl.subtype)
    }

    /// SSID bytes from the information elements, when present.
    pub fn ssid(&self) -> Option<&[u8]> {
        self.elements.iter().find_map(|e| match e {
            Element::Ssid(s) => Some(s.as_slice()),
            _ => None,
        })
    }
}

fn read_seqctrl(body: &[u8], m: &mut Mpdu, path: &str) -> std::result::Result<(), FieldError> {
    let v = bits::read_u16_le(body, m.offset, "seqctrl").map_err(fe(path.to_owned()))?;
    m.seqctrl = Some(SeqCtrl::from_raw(v));
    m.offset += 2;
    m.present.push(MpduField::SeqCtrl);
    Ok(())
}

fn read_addr(
    body: &[u8],
    m: &mut Mpdu,
    path: &str,
    tag: MpduField,
) -> std::result::Result<MacAddr, FieldError> {
    let a = bits::read_mac(body, m.offset, "addr").map_err(fe(path.to_owned()))?;
    m.offset += 6;
    m.present.push(tag);
    Ok(a)
}

fn parse_mgmt(body: &[u8], m: &mut Mpdu) -> std::result::Result<(), FieldError> {
    m.addr2 = Some(read_addr(body, m, "mgmt.addr2", MpduField::Addr2)?);
    m.addr3 = Some(read_addr(body, m, "mgmt.addr3", MpduField::Addr3)?);
    read_seqctrl(body, m, "mgmt.seqctrl")?;
    if m.framectrl.flags.order {
        // +HTC frame; nothing after the sequence control is safe to read
        return Err(FieldError::new(
            "mgmt.htc",
            ParseError::Unsupported("ht-control frame"),
        ));
    }
    if m.framectrl.flags.protected {
        // encrypted body; the encryption step owns the rest
        return Ok(());
    }
    parse_mgmt_fixed(body, m)?;
    parse_elements(body, m)
}

fn parse_mgmt_fixed(body: &[u8], m: &mut Mpdu) -> std::result::Result<(), FieldError> {
    let sub = m.framectrl.subtype;
    let path = || format!("mgmt.{}.fixed-params", ieee80211::subtype_name(ftype::MGMT, sub));
    let fixed = match sub {
        mgmt_subtype::ASSOC_REQ => {
            let capability = bits::read_u16_le(body, m.offset, "capability").map_err(fe(path()))?;
            let listen_interval =
                bits::read_u16_le(body, m.offset + 2, "listen-int").map_err(fe(path()))?;
            m.offset += 4;
            Some(FixedParams::AssocReq {
                capability,
                listen_interval,
            })
        }
        mgmt_subtype::ASSOC_RESP | mgmt_subtype::REASSOC_RESP => {
            let capability = bits::read_u16_le(body, m.offset, "capability").map_err(fe(path()))?;
            let status_code =
                bits::read_u16_le(body, m.offset + 2, "status-code").map_err(fe(path()))?;
            let aid = bits::read_u16_le(body, m.offset + 4, "aid").map_err(fe(path()))? & 0x3fff;
            m.offset += 6;
            Some(FixedParams::AssocResp {
                capability,
                status_code,
                aid,
            })
        }
        mgmt_subtype::REASSOC_REQ => {
            let capability = bits::read_u16_le(body, m.offset, "capability").map_err(fe(path()))?;
            let listen_interval =
                bits::read_u16_le(body, m.offset + 2, "listen-int").map_err(fe(path()))?;
            let current_ap = bits::read_mac(body, m.offset + 4, "current-ap").map_err(fe(path()))?;
            m.offset += 10;
            Some(FixedParams::ReassocReq {
                capability,
                listen_interval,
                current_ap,
            })
        }
        mgmt_subtype::TIMING_ADV => {
            let timestamp = bits::read_u64_le(body, m.offset, "timestamp").map_err(fe(path()))?;
            let capability =
                bits::read_u16_le(body, m.offset + 8, "capability").map_err(fe(path()))?;
            m.offset += 10;
            Some(FixedParams::TimingAdv {
                timestamp,
                capability,
            })
        }
        mgmt_subtype::PROBE_RESP | mgmt_subtype::BEACON => {
            let timestamp = bits::read_u64_le(body, m.offset, "timestamp").map_err(fe(path()))?;
            let interval =
                bits::read_u16_le(body, m.offset + 8, "beacon-int").map_err(fe(path()))?;
            let capability =
                bits::read_u16_le(body, m.offset + 10, "capability").map_err(fe(path()))?;
            m.offset += 12;
            Some(FixedParams::Beacon {
                timestamp,
                beacon_interval_us: u32::from(interval) * 1024,
                capability,
            })
        }
        mgmt_subtype::DISASSOC | mgmt_subtype::DEAUTH => {
            let reason_code =
                bits::read_u16_le(body, m.offset, "reason-code").map_err(fe(path()))?;
            m.offset += 2;
            Some(FixedParams::Disassoc { reason_code })
        }
        mgmt_subtype::AUTH => {
            let algorithm = bits::read_u16_le(body, m.offset, "algorithm-no").map_err(fe(path()))?;
            let auth_seq = bits::read_u16_le(body, m.offset + 2, "auth-seq").map_err(fe(path()))?;
            let status_code =
                bits::read_u16_le(body, m.offset + 4, "status-code").map_err(fe(path()))?;
            m.offset += 6;
            Some(FixedParams::Auth {
                algorithm,
                auth_seq,
                status_code,
            })
        }
        mgmt_subtype::ACTION | mgmt_subtype::ACTION_NOACK => {
            let category = bits::read_u8(body, m.offset, "category").map_err(fe(path()))?;
            let action = bits::read_u8(body, m.offset + 1, "action").map_err(fe(path()))?;
            m.offset += 2;
            let data = body[m.offset..].to_vec();
            m.offset = body.len();
            Some(FixedParams::Action {
                category,
                action,
                data,
            })
        }
        // probe-req, atim and the reserved subtypes carry no fixed fields
        _ => None,
    };
    if let Some(f) = fixed {
        m.fixed_params = Some(f);
        m.present.push(MpduField::FixedParams);
    }
    Ok(())
}

fn parse_elements(body: &[u8], m: &mut Mpdu) -> std::result::Result<(), FieldError> {
    if m.offset >= body.len() {
        return Ok(());
    }
    m.present.push(MpduField::InfoElements);
    while m.offset < body.len() {
        let id = bits::read_u8(body, m.offset, "eid").map_err(fe("mgmt.info-elements"))?;
        let len = bits::read_u8(body, m.offset + 1, "eid-len").map_err(fe("mgmt.info-elements"))?
            as usize;
        let data = bits::take(body, m.offset + 2, len, "info-element")
            .map_err(fe(format!("mgmt.info-elements.eid-{id}")))?;
        m.elements.push(Element::decode(id, data));
        m.offset += 2 + len;
    }
    Ok(())
}

fn parse_ctrl(body: &[u8], m: &mut Mpdu) -> std::result::Result<(), FieldError> {
    let sub = m.framectrl.subtype;
    let name = ieee80211::subtype_name(ftype::CTRL, sub);
    match sub {
        ctrl_subtype::CTS | ctrl_subtype::ACK => {}
        ctrl_subtype::RTS
        | ctrl_subtype::PSPOLL
        | ctrl_subtype::CFEND
        | ctrl_subtype::CFEND_CFACK => {
            m.addr2 = Some(read_addr(
                body,
                m,
                &format!("ctrl.{name}.addr2"),
                MpduField::Addr2,
            )?);
        }
        ctrl_subtype::BLOCK_ACK_REQ => {
            m.addr2 = Some(read_addr(
                body,
                m,
                "ctrl.block-ack-req.addr2",
                MpduField::Addr2,
            )?);
            let v = bits::read_u16_le(body, m.offset, "barctrl")
                .map_err(fe("ctrl.block-ack-req.barctrl"))?;
            m.offset += 2;
            let control = BaControl::from_raw(v);
            m.present.push(MpduField::BarCtrl);
            let info = parse_bar_info(body, m, control)?;
            m.bar = Some(BlockAckReq { control, info });
        }
        ctrl_subtype::BLOCK_ACK => {
            m.addr2 = Some(read_addr(body, m, "ctrl.block-ack.addr2", MpduField::Addr2)?);
            let v = bits::read_u16_le(body, m.offset, "bactrl")
                .map_err(fe("ctrl.block-ack.bactrl"))?;
            m.offset += 2;
            let control = BaControl::from_raw(v);
            m.present.push(MpduField::BaCtrl);
            let info = parse_ba_info(body, m, control)?;
            m.ba = Some(BlockAck { control, info });
        }
        ctrl_subtype::WRAPPER => {
            m.error.push(FieldError::new(
                "ctrl.wrapper",
                ParseError::Unsupported("control wrapper frame"),
            ));
        }
        _ => {
            m.error.push(FieldError::new(
                format!("ctrl.{name}"),
                ParseError::Unsupported("reserved control subtype"),
            ));
        }
    }
    Ok(())
}

fn parse_bar_info(
    body: &[u8],
    m: &mut Mpdu,
    ctl: BaControl,
) -> std::result::Result<BlockAckReqInfo, FieldError> {
    let path = "ctrl.block-ack-req.barinfo";
    Ok(match (ctl.multi_tid, ctl.compressed) {
        (false, compressed) => {
            let v = bits::read_u16_le(body, m.offset, "barinfo").map_err(fe(path))?;
            m.offset += 2;
            let sc = SeqCtrl::from_raw(v);
            if compressed {
                BlockAckReqInfo::Compressed(sc)
            } else {
                BlockAckReqInfo::Basic(sc)
            }
        }
        (true, false) => {
            let rest = body[m.offset..].to_vec();
            m.offset = body.len();
            BlockAckReqInfo::Reserved(rest)
        }
        (true, true) => {
            let mut tids = Vec::new();
            for _ in 0..=ctl.tid_info {
                let pt = bits::read_u16_le(body, m.offset, "per-tid").map_err(fe(path))?;
                let sc = bits::read_u16_le(body, m.offset + 2, "per-tid seqctrl")
                    .map_err(fe(path))?;
                m.offset += 4;
                tids.push(BarTid {
                    tid: (pt >> 12) as u8,
                    seqctrl: SeqCtrl::from_raw(sc),
                });
            }
            BlockAckReqInfo::MultiTid(tids)
        }
    })
}

fn parse_ba_info(
    body: &[u8],
    m: &mut Mpdu,
    ctl: BaControl,
) -> std::result::Result<BlockAckInfo, FieldError> {
    let path = "ctrl.block-ack.bainfo";
    Ok(match (ctl.multi_tid, ctl.compressed) {
        (false, compressed) => {
            let v = bits::read_u16_le(body, m.offset, "bainfo").map_err(fe(path))?;
            m.offset += 2;
            let seqctrl = SeqCtrl::from_raw(v);
            if compressed {
                let bm = bits::take(body, m.offset, 8, "ba bitmap").map_err(fe(path))?;
                m.offset += 8;
                BlockAckInfo::Compressed {
                    seqctrl,
                    bitmap: arr::<8>(bm),
                }
            } else {
                let bm = bits::take(body, m.offset, 128, "ba bitmap").map_err(fe(path))?;
                m.offset += 128;
                BlockAckInfo::Basic {
                    seqctrl,
                    bitmap: bm.to_vec(),
                }
            }
        }
        (true, false) => {
            let rest = body[m.offset..].to_vec();
            m.offset = body.len();
            BlockAckInfo::Reserved(rest)
        }
        (true, true) => {
            let mut tids = Vec::new();
            for _ in 0..=ctl.tid_info {
                let pt = bits::read_u16_le(body, m.offset, "per-tid").map_err(fe(path))?;
                let sc =
                    bits::read_u16_le(body, m.offset + 2, "per-tid seqctrl").map_err(fe(path))?;
                let bm = bits::take(body, m.offset + 4, 8, "per-tid bitmap").map_err(fe(path))?;
                m.offset += 12;
                tids.push(BaTid {
                    tid: (pt >> 12) as u8,
                    seqctrl: SeqCtrl::from_raw(sc),
                    bitmap: arr::<8>(bm),
                });
            }
            BlockAckInfo::MultiTid(tids)
        }
    })
}

// DS bits assign the address roles: (to=0,from=0) DA/SA/BSSID,
// (1,0) BSSID/SA/DA, (0,1) DA/BSSID/SA, (1,1) RA/TA/DA with addr4
// carrying the SA. Roles are documented here, not stored.
fn parse_data(body: &[u8], m: &mut Mpdu) -> std::result::Result<(), FieldError> {
    m.addr2 = Some(read_addr(body, m, "data.addr2", MpduField::Addr2)?);
    m.addr3 = Some(read_addr(body, m, "data.addr3", MpduField::Addr3)?);
    read_seqctrl(body, m, "data.seqctrl")?;
    let flags = m.framectrl.flags;
    if flags.to_ds && flags.from_ds {
        m.addr4 = Some(read_addr(body, m, "data.addr4", MpduField::Addr4)?);
    }
    if m.framectrl.subtype >= data_subtype::QOS_DATA {
        let lsb = bits::read_u8(body, m.offset, "qos").map_err(fe("data.qos"))?;
        let msb = bits::read_u8(body, m.offset + 1, "qos").map_err(fe("data.qos"))?;
        m.qos = Some(QosCtrl::from_bytes(lsb, msb));
        m.offset += 2;
        m.present.push(MpduField::Qos);
        if flags.order {
            // +HTC frame; the header end can't be located without it
            return Err(FieldError::new(
                "data.htc",
                ParseError::Unsupported("ht-control frame"),
            ));
        }
    }
    Ok(())
}

const EXT_IV: u8 = 0x20;

fn parse_crypt(body: &[u8], m: &mut Mpdu) -> std::result::Result<(), FieldError> {
    let off = m.offset;
    let hdr = bits::take(body, off, 4, "crypt header").map_err(fe("crypt"))?;
    let (b0, b1, b2, b3) = (hdr[0], hdr[1], hdr[2], hdr[3]);
    let crypt = if b3 & EXT_IV != 0 {
        // TKIP derives the second octet from TSC1; CCMP keeps a zero
        // reserved octet there instead
        if (b0 | 0x20) & 0x7f == b1 {
            let h = bits::take(body, off, 8, "tkip header").map_err(fe("crypt.tkip"))?;
            if body.len() < off + 8 + 12 {
                return Err(fe("crypt.tkip")(ParseError::Truncated {
                    field: "tkip trailer",
                    needed: 12,
                    available: body.len().saturating_sub(off + 8),
                }));
            }
            let n = body.len();
            Crypt::Tkip(TkipHeader {
                tsc1: h[0],
                wep_seed: h[1],
                tsc0: h[2],
                key_id: h[3] >> 6,
                ext_iv: true,
                tsc2: h[4],
                tsc3: h[5],
                tsc4: h[6],
                tsc5: h[7],
                mic: arr::<8>(&body[n - 12..n - 4]),
                icv: arr::<4>(&body[n - 4..]),
            })
        } else if b2 == 0 {
            let h = bits::take(body, off, 8, "ccmp header").map_err(fe("crypt.ccmp"))?;
            if body.len() < off + 8 + 8 {
                return Err(fe("crypt.ccmp")(ParseError::Truncated {
                    field: "ccmp trailer",
                    needed: 8,
                    available: body.len().saturating_sub(off + 8),
                }));
            }
            let n = body.len();
            Crypt::Ccmp(CcmpHeader {
                pn: [h[0], h[1], h[4], h[5], h[6], h[7]],
                reserved: h[2],
                key_id: (h[3] >> 6) & 0x03,
                ext_iv: true,
                mic: arr::<8>(&body[n - 8..]),
            })
        } else {
            trace!(b0, b1, b2, b3, "extended-iv header matches neither tkip nor ccmp");
            m.error
                .push(FieldError::new("crypt", ParseError::MalformedCrypt));
            return Ok(());
        }
    } else {
        if body.len() < off + 4 + 4 {
            return Err(fe("crypt.wep")(ParseError::Truncated {
                field: "wep trailer",
                needed: 4,
                available: body.len().saturating_sub(off + 4),
            }));
        }
        let n = body.len();
        Crypt::Wep(WepHeader {
            iv: [b0, b1, b2],
            key_id: b3 >> 6,
            icv: arr::<4>(&body[n - 4..]),
        })
    };
    debug!(kind = crypt.kind(), "encryption header identified");
    m.offset += crypt.header_len();
    m.stripped += crypt.trailer_len();
    m.crypt = Some(crypt);
    m.present.push(MpduField::Crypt);
    Ok(())
}
