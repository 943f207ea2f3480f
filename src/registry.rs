//! Process-wide schemas for every RTCM2 message type with structured support.
//!
//! Each schema is built once, on first use, and never mutated afterwards.
//! All message schemas open with the same header descriptors, produced by
//! `header()`, so the common attributes decode identically in every variant.

use crate::schema::Schema;
use crate::types::*;
use lazy_static::lazy_static;

/// Literal carried by the `class` attribute of every RTCM2 object.
pub const RTCM2_CLASS: &str = "RTCM2";

/// Wire names of the common header, in schema order.
pub const HEADER_FIELDS: [&str; 8] = [
    "class",
    "type",
    "device",
    "station_id",
    "zcount",
    "seqnum",
    "length",
    "station_health",
];

/// Per-call decode target: the header, the payload under construction and
/// the element count reported by the array binding.
#[derive(Debug, Default)]
pub struct Frame<P> {
    /// Bound on the stored device path, in bytes.
    pub path_limit: usize,
    pub header: Header,
    pub payload: P,
    pub count: usize,
}

impl<P: Default> Frame<P> {
    pub fn new(path_limit: usize) -> Self {
        Self {
            path_limit,
            header: Header::default(),
            payload: P::default(),
            count: 0,
        }
    }
}

/// Identifies which schema a message is decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaId {
    Ranges,
    ReferenceEcef,
    ReferenceDatum,
    ConstellationHealth,
    Keepalive,
    Almanac,
    Text,
    Fallback,
}

impl SchemaId {
    /// Schema for a message type number. Types without structured support
    /// map to `Fallback`.
    pub fn for_type(msg_type: u32) -> Self {
        match msg_type {
            1 | 9 => SchemaId::Ranges,
            3 => SchemaId::ReferenceEcef,
            4 => SchemaId::ReferenceDatum,
            5 => SchemaId::ConstellationHealth,
            6 => SchemaId::Keepalive,
            7 => SchemaId::Almanac,
            16 => SchemaId::Text,
            _ => SchemaId::Fallback,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SchemaId::Ranges => RTCM1.name(),
            SchemaId::ReferenceEcef => RTCM3.name(),
            SchemaId::ReferenceDatum => RTCM4.name(),
            SchemaId::ConstellationHealth => RTCM5.name(),
            SchemaId::Keepalive => RTCM6.name(),
            SchemaId::Almanac => RTCM7.name(),
            SchemaId::Text => RTCM16.name(),
            SchemaId::Fallback => RTCM2_FALLBACK.name(),
        }
    }
}

fn header<P: Default + 'static>(name: &'static str) -> crate::schema::SchemaBuilder<Frame<P>> {
    Schema::<Frame<P>>::builder(name)
        .check("class", RTCM2_CLASS)
        .uinteger("type", None, |f, v| f.header.msg_type = v)
        .string("device", None, Some(""), |f, v| {
            f.header.device = truncate_to(v, f.path_limit)
        })
        .uinteger("station_id", None, |f, v| f.header.station_id = v)
        .real("zcount", Some(f64::NAN), |f, v| f.header.zcount = v)
        .uinteger("seqnum", None, |f, v| f.header.seqnum = v)
        .uinteger("length", None, |f, v| f.header.length = v)
        .uinteger("station_health", None, |f, v| f.header.station_health = v)
}

lazy_static! {
    static ref RTCM1_SATELLITE: Schema<RangeSat> = Schema::<RangeSat>::builder("rtcm1_satellite")
        .uinteger("ident", None, |s, v| s.ident = v)
        .uinteger("udre", None, |s, v| s.udre = v)
        .uinteger("issuedata", None, |s, v| s.issuedata = v)
        .real("rangerr", None, |s, v| s.rangerr = v)
        .real("rangerate", None, |s, v| s.rangerate = v)
        .build();

    /// Types 1 and 9: differential GPS corrections.
    pub static ref RTCM1: Schema<Frame<RangeCorrections>> = header::<RangeCorrections>("rtcm1")
        .record_array(
            "satellites",
            &*RTCM1_SATELLITE,
            MAX_CORRECTIONS,
            |f| &mut f.payload.sats,
            |f, n| f.count = n,
        )
        .build();

    /// Type 3: reference station parameters (ECEF).
    pub static ref RTCM3: Schema<Frame<EcefReference>> = header::<EcefReference>("rtcm3")
        .boolean("valid", Some(false), |f, v| f.payload.valid = v)
        .real("x", Some(f64::NAN), |f, v| f.payload.x = v)
        .real("y", Some(f64::NAN), |f, v| f.payload.y = v)
        .real("z", Some(f64::NAN), |f, v| f.payload.z = v)
        .build();

    /// Type 4: reference station datum.
    pub static ref RTCM4: Schema<Frame<DatumReference>> = header::<DatumReference>("rtcm4")
        .boolean("valid", Some(false), |f, v| f.payload.valid = v)
        .integer("system", Some(0), |f, v| f.payload.system = v)
        .integer("sense", Some(0), |f, v| f.payload.sense = v)
        .string("datum", Some(MAX_DATUM_LEN), Some(""), |f, v| f.payload.datum = v)
        .real("dx", Some(f64::NAN), |f, v| f.payload.dx = v)
        .real("dy", Some(f64::NAN), |f, v| f.payload.dy = v)
        .real("dz", Some(f64::NAN), |f, v| f.payload.dz = v)
        .build();

    static ref RTCM5_SATELLITE: Schema<HealthSat> = Schema::<HealthSat>::builder("rtcm5_satellite")
        .uinteger("ident", None, |s, v| s.ident = v)
        .boolean("iodl", None, |s, v| s.iodl = v)
        .uinteger("health", None, |s, v| s.health = v)
        .boolean("health_en", None, |s, v| s.health_en = v)
        .boolean("new_data", None, |s, v| s.new_data = v)
        .boolean("los_warning", None, |s, v| s.los_warning = v)
        .uinteger("tou", None, |s, v| s.tou = v)
        .build();

    /// Type 5: constellation health.
    pub static ref RTCM5: Schema<Frame<ConstellationHealth>> =
        header::<ConstellationHealth>("rtcm5")
            .record_array(
                "satellites",
                &*RTCM5_SATELLITE,
                MAX_HEALTH,
                |f| &mut f.payload.sats,
                |f, n| f.count = n,
            )
            .build();

    /// Type 6: null frame / keepalive. Header only.
    pub static ref RTCM6: Schema<Frame<()>> = header::<()>("rtcm6").build();

    static ref RTCM7_STATION: Schema<Station> = Schema::<Station>::builder("rtcm7_station")
        .real("latitude", None, |s, v| s.latitude = v)
        .real("longitude", None, |s, v| s.longitude = v)
        .uinteger("range", None, |s, v| s.range = v)
        .real("frequency", None, |s, v| s.frequency = v)
        .uinteger("health", None, |s, v| s.health = v)
        .uinteger("station_id", None, |s, v| s.station_id = v)
        .uinteger("bitrate", None, |s, v| s.bitrate = v)
        .build();

    /// Type 7: radiobeacon almanac.
    pub static ref RTCM7: Schema<Frame<Almanac>> = header::<Almanac>("rtcm7")
        .record_array(
            "satellites",
            &*RTCM7_STATION,
            MAX_STATIONS,
            |f| &mut f.payload.stations,
            |f, n| f.count = n,
        )
        .build();

    /// Type 16: special message (free text).
    pub static ref RTCM16: Schema<Frame<String>> = header::<String>("rtcm16")
        .string("message", Some(MAX_TEXT_LEN), Some(""), |f, v| f.payload = v)
        .build();

    /// Any other type: raw words as hex tokens, decoded by `words`.
    pub static ref RTCM2_FALLBACK: Schema<Frame<Vec<String>>> =
        header::<Vec<String>>("rtcm2_fallback")
            .string_array("data", RTCM2_WORDS_MAX, |f, v| f.payload = v)
            .build();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn test_for_type() {
        assert_eq!(SchemaId::for_type(1), SchemaId::Ranges);
        assert_eq!(SchemaId::for_type(9), SchemaId::Ranges);
        assert_eq!(SchemaId::for_type(3), SchemaId::ReferenceEcef);
        assert_eq!(SchemaId::for_type(4), SchemaId::ReferenceDatum);
        assert_eq!(SchemaId::for_type(5), SchemaId::ConstellationHealth);
        assert_eq!(SchemaId::for_type(6), SchemaId::Keepalive);
        assert_eq!(SchemaId::for_type(7), SchemaId::Almanac);
        assert_eq!(SchemaId::for_type(16), SchemaId::Text);
        assert_eq!(SchemaId::for_type(2), SchemaId::Fallback);
        assert_eq!(SchemaId::for_type(99), SchemaId::Fallback);
    }

    #[test]
    fn test_every_schema_starts_with_header() {
        assert!(RTCM1.starts_with(&HEADER_FIELDS));
        assert!(RTCM3.starts_with(&HEADER_FIELDS));
        assert!(RTCM4.starts_with(&HEADER_FIELDS));
        assert!(RTCM5.starts_with(&HEADER_FIELDS));
        assert!(RTCM6.starts_with(&HEADER_FIELDS));
        assert!(RTCM7.starts_with(&HEADER_FIELDS));
        assert!(RTCM16.starts_with(&HEADER_FIELDS));
        assert!(RTCM2_FALLBACK.starts_with(&HEADER_FIELDS));
        assert_eq!(RTCM6.fields().len(), HEADER_FIELDS.len());
    }

    #[test]
    fn test_every_schema_validates() {
        RTCM1_SATELLITE.validate().unwrap();
        RTCM5_SATELLITE.validate().unwrap();
        RTCM7_STATION.validate().unwrap();
        RTCM1.validate().unwrap();
        RTCM3.validate().unwrap();
        RTCM4.validate().unwrap();
        RTCM5.validate().unwrap();
        RTCM6.validate().unwrap();
        RTCM7.validate().unwrap();
        RTCM16.validate().unwrap();
        RTCM2_FALLBACK.validate().unwrap();
    }

    #[test]
    fn test_nested_schema_only_on_record_arrays() {
        let (_, sats) = RTCM1.field("satellites").unwrap();
        assert_eq!(sats.kind(), FieldKind::Array);
        assert_eq!(sats.nested_schema(), Some("rtcm1_satellite"));

        let (_, data) = RTCM2_FALLBACK.field("data").unwrap();
        assert_eq!(data.kind(), FieldKind::Array);
        assert_eq!(data.nested_schema(), None);

        for field in RTCM4.fields() {
            assert_eq!(field.nested_schema(), None);
        }
    }

    #[test]
    fn test_schema_names() {
        assert_eq!(SchemaId::Almanac.name(), "rtcm7");
        assert_eq!(SchemaId::Fallback.name(), "rtcm2_fallback");
    }

    #[test]
    fn test_schemas_are_shareable_across_threads() {
        fn assert_sync<T: Sync>(_: &T) {}
        assert_sync(&*RTCM1);
        assert_sync(&*RTCM2_FALLBACK);
    }
}
