//! HT MCS index to data-rate derivation.
//!
//! Rate values are the 802.11n ones (Std tables 20-30 through 20-37).
//! VHT (802.11ac) rates are not covered.

use serde::{Deserialize, Serialize};

/// Channel bandwidth as signalled in the Radiotap MCS flags.
///
/// `Bw20L`/`Bw20U` are the lower/upper 20 MHz halves of a 40 MHz
/// channel and carry the 20 MHz rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bandwidth {
    Bw20,
    Bw40,
    Bw20L,
    Bw20U,
}

impl Bandwidth {
    /// Decode the two bandwidth bits of the Radiotap MCS flags byte.
    pub fn from_mcs_flags(flags: u8) -> Self {
        match flags & 0x03 {
            0 => Bandwidth::Bw20,
            1 => Bandwidth::Bw40,
            2 => Bandwidth::Bw20L,
            _ => Bandwidth::Bw20U,
        }
    }

    pub fn mhz(&self) -> u16 {
        match self {
            Bandwidth::Bw40 => 40,
            _ => 20,
        }
    }
}

/// Guard interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gi {
    Long = 0,
    Short = 1,
}

/// Modulation and coding per index-within-stream (indices repeat 0-7,
/// 8-15, ...).
const HT_MODULATION: [&str; 8] = [
    "BPSK 1/2",
    "QPSK 1/2",
    "QPSK 3/4",
    "16-QAM 1/2",
    "16-QAM 3/4",
    "64-QAM 2/3",
    "64-QAM 3/4",
    "64-QAM 5/6",
];

// Rates in Mb/s, row = MCS index, columns = (20 long, 20 short,
// 40 long, 40 short). Indices 0-7 one spatial stream, 8-15 two,
// 16-23 three, 24-31 four.
const HT_RATES: [[f64; 4]; 32] = [
    [6.5, 7.2, 13.5, 15.0],
    [13.0, 14.4, 27.0, 30.0],
    [19.5, 21.7, 40.5, 45.0],
    [26.0, 28.9, 54.0, 60.0],
    [39.0, 43.3, 81.0, 90.0],
    [52.0, 57.8, 108.0, 120.0],
    [58.5, 65.0, 121.5, 135.0],
    [65.0, 72.2, 135.0, 150.0],
    [13.0, 14.4, 27.0, 30.0],
    [26.0, 28.9, 54.0, 60.0],
    [39.0, 43.3, 81.0, 90.0],
    [52.0, 57.8, 108.0, 120.0],
    [78.0, 86.7, 162.0, 180.0],
    [104.0, 115.6, 216.0, 240.0],
    [117.0, 130.3, 243.0, 270.0],
    [130.0, 144.4, 270.0, 300.0],
    [19.5, 21.7, 40.5, 45.0],
    [39.0, 43.3, 81.0, 90.0],
    [58.5, 65.0, 121.5, 135.0],
    [78.0, 86.7, 162.0, 180.0],
    [117.0, 130.0, 243.0, 270.0],
    [156.0, 173.3, 324.0, 360.0],
    [175.5, 195.0, 364.5, 405.0],
    [195.0, 216.7, 405.0, 450.0],
    [26.0, 28.9, 54.0, 60.0],
    [52.0, 57.8, 108.0, 120.0],
    [78.0, 86.7, 162.0, 180.0],
    [104.0, 115.6, 216.0, 240.0],
    [156.0, 173.3, 324.0, 360.0],
    [208.0, 231.1, 432.0, 480.0],
    [234.0, 260.0, 486.0, 540.0],
    [260.0, 288.9, 540.0, 600.0],
];

/// Data rate in Mb/s for an HT MCS index, bandwidth and guard
/// interval. `None` for indices outside 0..=31.
pub fn ht_rate(index: u8, bw: Bandwidth, gi: Gi) -> Option<f64> {
    let row = HT_RATES.get(index as usize)?;
    let col = match (bw, gi) {
        (Bandwidth::Bw40, Gi::Long) => 2,
        (Bandwidth::Bw40, Gi::Short) => 3,
        (_, Gi::Long) => 0,
        (_, Gi::Short) => 1,
    };
    Some(row[col])
}

/// Modulation/coding label and spatial stream count for an HT MCS
/// index. `None` for indices outside 0..=31.
pub fn ht_coding(index: u8) -> Option<(&'static str, u8)> {
    if index > 31 {
        return None;
    }
    Some((HT_MODULATION[(index % 8) as usize], index / 8 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_stream_rates() {
        assert_eq!(ht_rate(0, Bandwidth::Bw20, Gi::Long), Some(6.5));
        assert_eq!(ht_rate(0, Bandwidth::Bw20, Gi::Short), Some(7.2));
        assert_eq!(ht_rate(5, Bandwidth::Bw20, Gi::Short), Some(57.8));
        assert_eq!(ht_rate(7, Bandwidth::Bw40, Gi::Short), Some(150.0));
    }

    #[test]
    fn test_half_channels_use_20mhz_column() {
        assert_eq!(ht_rate(7, Bandwidth::Bw20L, Gi::Long), Some(65.0));
        assert_eq!(ht_rate(7, Bandwidth::Bw20U, Gi::Short), Some(72.2));
    }

    #[test]
    fn test_four_stream_top_rate() {
        assert_eq!(ht_rate(31, Bandwidth::Bw40, Gi::Short), Some(600.0));
        assert_eq!(ht_rate(31, Bandwidth::Bw20, Gi::Long), Some(260.0));
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(ht_rate(32, Bandwidth::Bw20, Gi::Long), None);
        assert_eq!(ht_coding(32), None);
    }

    #[test]
    fn test_coding() {
        assert_eq!(ht_coding(0), Some(("BPSK 1/2", 1)));
        assert_eq!(ht_coding(7), Some(("64-QAM 5/6", 1)));
        assert_eq!(ht_coding(8), Some(("BPSK 1/2", 2)));
        assert_eq!(ht_coding(31), Some(("64-QAM 5/6", 4)));
    }

    #[test]
    fn test_bandwidth_from_flags() {
        assert_eq!(Bandwidth::from_mcs_flags(0x00), Bandwidth::Bw20);
        assert_eq!(Bandwidth::from_mcs_flags(0x01), Bandwidth::Bw40);
        assert_eq!(Bandwidth::from_mcs_flags(0x02), Bandwidth::Bw20L);
        assert_eq!(Bandwidth::from_mcs_flags(0x03), Bandwidth::Bw20U);
        assert_eq!(Bandwidth::Bw20L.mhz(), 20);
    }
}
