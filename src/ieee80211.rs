//! Constants from IEEE Std 802.11-2012.

/// Frame types (frame control bits 2-3).
pub mod ftype {
    pub const MGMT: u8 = 0;
    pub const CTRL: u8 = 1;
    pub const DATA: u8 = 2;
    pub const RSRV: u8 = 3;
}

/// Management frame subtypes.
pub mod mgmt_subtype {
    pub const ASSOC_REQ: u8 = 0;
    pub const ASSOC_RESP: u8 = 1;
    pub const REASSOC_REQ: u8 = 2;
    pub const REASSOC_RESP: u8 = 3;
    pub const PROBE_REQ: u8 = 4;
    pub const PROBE_RESP: u8 = 5;
    pub const TIMING_ADV: u8 = 6; // 802.11p
    pub const BEACON: u8 = 8;
    pub const ATIM: u8 = 9;
    pub const DISASSOC: u8 = 10;
    pub const AUTH: u8 = 11;
    pub const DEAUTH: u8 = 12;
    pub const ACTION: u8 = 13;
    pub const ACTION_NOACK: u8 = 14;
}

/// Control frame subtypes.
pub mod ctrl_subtype {
    pub const WRAPPER: u8 = 7;
    pub const BLOCK_ACK_REQ: u8 = 8;
    pub const BLOCK_ACK: u8 = 9;
    pub const PSPOLL: u8 = 10;
    pub const RTS: u8 = 11;
    pub const CTS: u8 = 12;
    pub const ACK: u8 = 13;
    pub const CFEND: u8 = 14;
    pub const CFEND_CFACK: u8 = 15;
}

/// Data frame subtypes. Subtypes 8 and up carry a QoS control field.
pub mod data_subtype {
    pub const DATA: u8 = 0;
    pub const CFACK: u8 = 1;
    pub const CFPOLL: u8 = 2;
    pub const CFACK_CFPOLL: u8 = 3;
    pub const NULL: u8 = 4;
    pub const NULL_CFACK: u8 = 5;
    pub const NULL_CFPOLL: u8 = 6;
    pub const NULL_CFACK_CFPOLL: u8 = 7;
    pub const QOS_DATA: u8 = 8;
    pub const QOS_DATA_CFACK: u8 = 9;
    pub const QOS_DATA_CFPOLL: u8 = 10;
    pub const QOS_DATA_CFACK_CFPOLL: u8 = 11;
    pub const QOS_NULL: u8 = 12;
    pub const QOS_CFPOLL: u8 = 14;
    pub const QOS_CFACK_CFPOLL: u8 = 15;
}

pub const FT_TYPES: [&str; 4] = ["mgmt", "ctrl", "data", "rsrv"];

pub const ST_MGMT_TYPES: [&str; 16] = [
    "assoc-req",
    "assoc-resp",
    "reassoc-req",
    "reassoc-resp",
    "probe-req",
    "probe-resp",
    "timing-adv",
    "mgmt-rsrv-7",
    "beacon",
    "atim",
    "disassoc",
    "auth",
    "deauth",
    "action",
    "action-noack",
    "mgmt-rsrv-15",
];

pub const ST_CTRL_TYPES: [&str; 16] = [
    "ctrl-rsrv-0",
    "ctrl-rsrv-1",
    "ctrl-rsrv-2",
    "ctrl-rsrv-3",
    "ctrl-rsrv-4",
    "ctrl-rsrv-5",
    "ctrl-rsrv-6",
    "wrapper",
    "block-ack-req",
    "block-ack",
    "pspoll",
    "rts",
    "cts",
    "ack",
    "cfend",
    "cfend-cfack",
];

pub const ST_DATA_TYPES: [&str; 16] = [
    "data",
    "cfack",
    "cfpoll",
    "cfack-cfpoll",
    "null",
    "null-cfack",
    "null-cfpoll",
    "null-cfack-cfpoll",
    "qos-data",
    "qos-data-cfack",
    "qos-data-cfpoll",
    "qos-data-cfack-cfpoll",
    "qos-null",
    "data-rsrv-13",
    "qos-cfpoll",
    "qos-cfack-cfpoll",
];

/// Canonical name of a type/subtype pair.
pub fn subtype_name(ft: u8, st: u8) -> &'static str {
    let st = (st & 0x0f) as usize;
    match ft {
        ftype::MGMT => ST_MGMT_TYPES[st],
        ftype::CTRL => ST_CTRL_TYPES[st],
        ftype::DATA => ST_DATA_TYPES[st],
        _ => "rsrv",
    }
}

/// Capability information bits (Std 8.4.1.4).
pub mod capability {
    pub const ESS: u16 = 1 << 0;
    pub const IBSS: u16 = 1 << 1;
    pub const CF_POLLABLE: u16 = 1 << 2;
    pub const CF_POLL_REQ: u16 = 1 << 3;
    pub const PRIVACY: u16 = 1 << 4;
    pub const SHORT_PREAMBLE: u16 = 1 << 5;
    pub const PBCC: u16 = 1 << 6;
    pub const CH_AGILITY: u16 = 1 << 7;
    pub const SPEC_MGMT: u16 = 1 << 8;
    pub const QOS: u16 = 1 << 9;
    pub const SHORT_TIME_SLOT: u16 = 1 << 10;
    pub const APSD: u16 = 1 << 11;
    pub const RADIO_MEAS: u16 = 1 << 12;
    pub const DSSS_OFDM: u16 = 1 << 13;
    pub const DELAYED_BA: u16 = 1 << 14;
    pub const IMMEDIATE_BA: u16 = 1 << 15;
}

const CAPABILITY_NAMES: [(u16, &str); 16] = [
    (capability::ESS, "ess"),
    (capability::IBSS, "ibss"),
    (capability::CF_POLLABLE, "cfpollable"),
    (capability::CF_POLL_REQ, "cf-poll-req"),
    (capability::PRIVACY, "privacy"),
    (capability::SHORT_PREAMBLE, "short-pre"),
    (capability::PBCC, "pbcc"),
    (capability::CH_AGILITY, "ch-agility"),
    (capability::SPEC_MGMT, "spec-mgmt"),
    (capability::QOS, "qos"),
    (capability::SHORT_TIME_SLOT, "time-slot"),
    (capability::APSD, "apsd"),
    (capability::RADIO_MEAS, "rdo-meas"),
    (capability::DSSS_OFDM, "dsss-ofdm"),
    (capability::DELAYED_BA, "delayed-ba"),
    (capability::IMMEDIATE_BA, "immediate-ba"),
];

/// Names of the capability bits set in `mask`, ascending bit order.
pub fn capability_names(mask: u16) -> Vec<&'static str> {
    CAPABILITY_NAMES
        .iter()
        .filter(|(m, _)| mask & m != 0)
        .map(|&(_, n)| n)
        .collect()
}

/// Information element IDs (Std 8.4.2).
pub mod eid {
    pub const SSID: u8 = 0;
    pub const SUPPORTED_RATES: u8 = 1;
    pub const FH: u8 = 2;
    pub const DSSS: u8 = 3;
    pub const CF: u8 = 4;
    pub const TIM: u8 = 5;
    pub const IBSS: u8 = 6;
    pub const COUNTRY: u8 = 7;
    pub const HOP_PARAMS: u8 = 8;
    pub const HOP_TABLE: u8 = 9;
    pub const REQUEST: u8 = 10;
    pub const BSS_LOAD: u8 = 11;
    pub const EDCA: u8 = 12;
    pub const TSPEC: u8 = 13;
    pub const TCLAS: u8 = 14;
    pub const SCHED: u8 = 15;
    pub const CHALLENGE: u8 = 16;
    pub const PWR_CONSTRAINT: u8 = 32;
    pub const PWR_CAPABILITY: u8 = 33;
    pub const TPC_REQ: u8 = 34;
    pub const TPC_RPT: u8 = 35;
    pub const CHANNELS: u8 = 36;
    pub const CH_SWITCH: u8 = 37;
    pub const MEAS_REQ: u8 = 38;
    pub const MEAS_RPT: u8 = 39;
    pub const QUIET: u8 = 40;
    pub const IBSS_DFS: u8 = 41;
    pub const ERP: u8 = 42;
    pub const TS_DELAY: u8 = 43;
    pub const TCLAS_PRO: u8 = 44;
    pub const HT_CAP: u8 = 45;
    pub const QOS_CAP: u8 = 46;
    pub const RSN: u8 = 48;
    pub const EXTENDED_RATES: u8 = 50;
    pub const AP_CH_RPT: u8 = 51;
    pub const NEIGHBOR_RPT: u8 = 52;
    pub const RCPI: u8 = 53;
    pub const MDE: u8 = 54;
    pub const FTE: u8 = 55;
    pub const TIE: u8 = 56;
    pub const RDE: u8 = 57;
    pub const OP_CLASSES: u8 = 59;
    pub const EXT_CH_SWITCH: u8 = 60;
    pub const HT_OP: u8 = 61;
    pub const SEC_CH_OFFSET: u8 = 62;
    pub const RM_ENABLED: u8 = 70;
    pub const MUL_BSSID: u8 = 71;
    pub const COEXIST_20_40: u8 = 72;
    pub const INTOLERANT_20_40: u8 = 73;
    pub const OVERLAPPING_BSS: u8 = 74;
    pub const MGMT_MIC: u8 = 76;
    pub const NONTRANS_BSS: u8 = 83;
    pub const SSID_LIST: u8 = 84;
    pub const BSS_MAX_IDLE: u8 = 90;
    pub const TIME_ZONE: u8 = 98;
    pub const LINK_ID: u8 = 101;
    pub const INTERWORKING: u8 = 107;
    pub const ADV_PROTOCOL: u8 = 108;
    pub const QOS_MAP_SET: u8 = 110;
    pub const ROAMING_CONS: u8 = 111;
    pub const EMERGENCY_ALERT_ID: u8 = 112;
    pub const MESH_CONFIG: u8 = 113;
    pub const MESH_ID: u8 = 114;
    pub const EXT_CAP: u8 = 127;
    pub const VHT_CAP: u8 = 191;
    pub const VHT_OP: u8 = 192;
    pub const VEND_SPEC: u8 = 221;
}

/// Authentication algorithm numbers (Std 8.4.1.1).
pub mod auth_alg {
    pub const OPEN: u16 = 0;
    pub const SHARED_KEY: u16 = 1;
    pub const FAST_BSS: u16 = 2;
    pub const SAE: u16 = 3;
    pub const VENDOR: u16 = 63535;
}

/// Status codes (Std Table 8-37, commonly observed subset).
pub mod status_code {
    pub const SUCCESS: u16 = 0;
    pub const UNSPECIFIED_FAILURE: u16 = 1;
    pub const CAPS_MISMATCH: u16 = 10;
    pub const REASSOC_NO_ASSOC_EXISTS: u16 = 11;
    pub const ASSOC_DENIED_UNSPEC: u16 = 12;
    pub const AUTH_ALG_NOT_SUPPORTED: u16 = 13;
    pub const TRANS_SEQ_UNEXPECTED: u16 = 14;
    pub const CHALLENGE_FAIL: u16 = 15;
    pub const AUTH_TIMEOUT: u16 = 16;
    pub const NO_ADDITIONAL_STAS: u16 = 17;
    pub const BASIC_RATES_MISMATCH: u16 = 18;
    pub const ASSOC_DENIED_NO_SHORT_PREAMBLE: u16 = 19;
    pub const REFUSED_TEMPORARILY: u16 = 30;
    pub const UNSPECIFIED_QOS: u16 = 32;
    pub const ASSOC_DENIED_NO_BANDWIDTH: u16 = 33;
    pub const REQUEST_DECLINED: u16 = 37;
    pub const INVALID_PARAMETERS: u16 = 38;
    pub const INVALID_ELEMENT: u16 = 40;
    pub const INVALID_GROUP_CIPHER: u16 = 41;
    pub const INVALID_PAIRWISE_CIPHER: u16 = 42;
    pub const INVALID_AKMP: u16 = 43;
    pub const CIPHER_SUITE_REJECTED: u16 = 46;
    pub const ANTI_CLOG_TOKEN_REQUIRED: u16 = 76;
}

/// Reason codes (Std Table 8-36, commonly observed subset).
pub mod reason_code {
    pub const UNSPECIFIED: u16 = 1;
    pub const PREV_AUTH_NOT_VALID: u16 = 2;
    pub const DEAUTH_LEAVING: u16 = 3;
    pub const DISASSOC_INACTIVITY: u16 = 4;
    pub const DISASSOC_AP_BUSY: u16 = 5;
    pub const CLASS2_FROM_NONAUTH_STA: u16 = 6;
    pub const CLASS3_FROM_NONASSOC_STA: u16 = 7;
    pub const DISASSOC_STA_LEFT: u16 = 8;
    pub const ASSOC_WITHOUT_AUTH: u16 = 9;
    pub const INVALID_IE: u16 = 13;
    pub const MIC_FAILURE: u16 = 14;
    pub const HANDSHAKE_4WAY_TIMEOUT: u16 = 15;
    pub const GROUP_KEY_TIMEOUT: u16 = 16;
    pub const IE_DIFFERENT: u16 = 17;
    pub const INVALID_GROUP_CIPHER: u16 = 18;
    pub const INVALID_PAIRWISE_CIPHER: u16 = 19;
    pub const INVALID_AKMP: u16 = 20;
    pub const IEEE8021X_FAILED: u16 = 23;
    pub const CIPHER_SUITE_REJECTED: u16 = 24;
    pub const STA_LEAVING: u16 = 36;
    pub const DISASSOC_LOW_ACK: u16 = 34;
}

/// Action frame category codes (Std Table 8-38).
pub mod category {
    pub const SPECTRUM_MGMT: u8 = 0;
    pub const QOS: u8 = 1;
    pub const DLS: u8 = 2;
    pub const BLOCK_ACK: u8 = 3;
    pub const PUBLIC: u8 = 4;
    pub const RADIO_MEAS: u8 = 5;
    pub const FAST_BSS: u8 = 6;
    pub const HT: u8 = 7;
    pub const SA_QUERY: u8 = 8;
    pub const PROTECTED_DUAL: u8 = 9;
    pub const TDLS: u8 = 12;
    pub const MESH: u8 = 13;
    pub const MULTIHOP: u8 = 14;
    pub const SELF_PROTECTED: u8 = 15;
    pub const WMM: u8 = 17;
    pub const VHT: u8 = 21;
    pub const VENDOR_PROTECTED: u8 = 126;
    pub const VENDOR: u8 = 127;
}
