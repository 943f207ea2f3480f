//! Decoded RTCM2 message model.
//!
//! This module provides:
//! - `Header`: the attributes common to every RTCM2 message
//! - One payload struct per structured message type
//! - `Payload` / `Rtcm2Message`: the variant record handed to callers

/// Maximum number of 30-bit words in one RTCM2 message.
pub const RTCM2_WORDS_MAX: usize = 33;
/// Maximum satellite corrections in a type 1 or 9 message.
pub const MAX_CORRECTIONS: usize = 18;
/// Maximum satellites in a type 5 constellation health message.
pub const MAX_HEALTH: usize = RTCM2_WORDS_MAX - 2;
/// Maximum stations in a type 7 beacon almanac.
pub const MAX_STATIONS: usize = 10;
/// Bound on the datum identifier of a type 4 message, in bytes.
pub const MAX_DATUM_LEN: usize = 6;
/// Bound on the free text of a type 16 message, in bytes.
pub const MAX_TEXT_LEN: usize = (RTCM2_WORDS_MAX - 2) * 4;

/// Header attributes shared by all message types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub msg_type: u32,
    /// Originating device path, bounded by the caller's limit.
    pub device: String,
    pub station_id: u32,
    /// Modified Z-count (seconds within the hour); NaN when absent.
    pub zcount: f64,
    pub seqnum: u32,
    pub length: u32,
    pub station_health: u32,
}

/// Pseudorange correction for one satellite (types 1 and 9).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSat {
    pub ident: u32,
    pub udre: u32,
    pub issuedata: u32,
    pub rangerr: f64,
    pub rangerate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeCorrections {
    pub nentries: usize,
    pub sats: Vec<RangeSat>,
}

/// Reference station position in ECEF coordinates (type 3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EcefReference {
    pub valid: bool,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Reference station datum (type 4).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatumReference {
    pub valid: bool,
    pub system: i32,
    pub sense: i32,
    pub datum: String,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Health record for one satellite (type 5).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthSat {
    pub ident: u32,
    pub iodl: bool,
    pub health: u32,
    pub health_en: bool,
    pub new_data: bool,
    pub los_warning: bool,
    /// Time of unhealth.
    pub tou: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstellationHealth {
    pub nentries: usize,
    pub sats: Vec<HealthSat>,
}

/// One radiobeacon in the station almanac (type 7).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Station {
    pub latitude: f64,
    pub longitude: f64,
    pub range: u32,
    pub frequency: f64,
    pub health: u32,
    pub station_id: u32,
    pub bitrate: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Almanac {
    pub nentries: usize,
    pub stations: Vec<Station>,
}

/// Raw 30-bit words of a message type without a structured schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWords {
    pub words: [u32; RTCM2_WORDS_MAX],
}

impl Default for RawWords {
    fn default() -> Self {
        Self {
            words: [0; RTCM2_WORDS_MAX],
        }
    }
}

impl RawWords {
    /// Number of words up to and including the last non-zero one.
    pub fn used(&self) -> usize {
        self.words
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |i| i + 1)
    }
}

/// The payload of a decoded message. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Ranges(RangeCorrections),
    ReferenceEcef(EcefReference),
    ReferenceDatum(DatumReference),
    ConstellationHealth(ConstellationHealth),
    Keepalive,
    Almanac(Almanac),
    Text(String),
    RawWords(RawWords),
}

impl Payload {
    /// Short variant name, stable for display and tabulation.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Payload::Ranges(_) => "ranges",
            Payload::ReferenceEcef(_) => "reference_ecef",
            Payload::ReferenceDatum(_) => "reference_datum",
            Payload::ConstellationHealth(_) => "constellation_health",
            Payload::Keepalive => "keepalive",
            Payload::Almanac(_) => "almanac",
            Payload::Text(_) => "text",
            Payload::RawWords(_) => "raw_words",
        }
    }

    /// Element count of array-bearing variants.
    pub fn entries(&self) -> Option<usize> {
        match self {
            Payload::Ranges(r) => Some(r.nentries),
            Payload::ConstellationHealth(h) => Some(h.nentries),
            Payload::Almanac(a) => Some(a.nentries),
            _ => None,
        }
    }
}

/// A fully decoded RTCM2 message.
#[derive(Debug, Clone, PartialEq)]
pub struct Rtcm2Message {
    pub header: Header,
    pub payload: Payload,
}

/// Truncates `value` to at most `limit` bytes without splitting a character.
pub(crate) fn truncate_to(mut value: String, limit: usize) -> String {
    if value.len() > limit {
        let mut end = limit;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        value.truncate(end);
    }
    value
}
