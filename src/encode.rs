//! JSON rendering of decoded messages.
//!
//! The output uses the same wire names the decoder accepts, so a rendered
//! message decodes back to an equal record. Non-finite reals and an empty
//! device are omitted; decoding fills them back in from their defaults.

use crate::registry::RTCM2_CLASS;
use crate::types::*;
use crate::words::encode_word;
use serde_json::{json, Map, Value};

fn put_real(object: &mut Map<String, Value>, key: &str, value: f64) {
    if value.is_finite() {
        object.insert(key.to_string(), json!(value));
    }
}

fn header_json(header: &Header) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("class".to_string(), json!(RTCM2_CLASS));
    object.insert("type".to_string(), json!(header.msg_type));
    if !header.device.is_empty() {
        object.insert("device".to_string(), json!(header.device));
    }
    object.insert("station_id".to_string(), json!(header.station_id));
    put_real(&mut object, "zcount", header.zcount);
    object.insert("seqnum".to_string(), json!(header.seqnum));
    object.insert("length".to_string(), json!(header.length));
    object.insert("station_health".to_string(), json!(header.station_health));
    object
}

fn range_sat_json(sat: &RangeSat) -> Value {
    let mut object = Map::new();
    object.insert("ident".to_string(), json!(sat.ident));
    object.insert("udre".to_string(), json!(sat.udre));
    object.insert("issuedata".to_string(), json!(sat.issuedata));
    put_real(&mut object, "rangerr", sat.rangerr);
    put_real(&mut object, "rangerate", sat.rangerate);
    Value::Object(object)
}

fn health_sat_json(sat: &HealthSat) -> Value {
    json!({
        "ident": sat.ident,
        "iodl": sat.iodl,
        "health": sat.health,
        "health_en": sat.health_en,
        "new_data": sat.new_data,
        "los_warning": sat.los_warning,
        "tou": sat.tou,
    })
}

fn station_json(station: &Station) -> Value {
    let mut object = Map::new();
    put_real(&mut object, "latitude", station.latitude);
    put_real(&mut object, "longitude", station.longitude);
    object.insert("range".to_string(), json!(station.range));
    put_real(&mut object, "frequency", station.frequency);
    object.insert("health".to_string(), json!(station.health));
    object.insert("station_id".to_string(), json!(station.station_id));
    object.insert("bitrate".to_string(), json!(station.bitrate));
    Value::Object(object)
}

impl Rtcm2Message {
    /// Renders the message as a JSON object in the decoder's wire format.
    pub fn to_json(&self) -> Value {
        let mut object = header_json(&self.header);

        match &self.payload {
            Payload::Ranges(ranges) => {
                let sats = ranges.sats.iter().map(range_sat_json).collect();
                object.insert("satellites".to_string(), Value::Array(sats));
            }
            Payload::ReferenceEcef(ecef) => {
                object.insert("valid".to_string(), json!(ecef.valid));
                put_real(&mut object, "x", ecef.x);
                put_real(&mut object, "y", ecef.y);
                put_real(&mut object, "z", ecef.z);
            }
            Payload::ReferenceDatum(datum) => {
                object.insert("valid".to_string(), json!(datum.valid));
                object.insert("system".to_string(), json!(datum.system));
                object.insert("sense".to_string(), json!(datum.sense));
                object.insert("datum".to_string(), json!(datum.datum));
                put_real(&mut object, "dx", datum.dx);
                put_real(&mut object, "dy", datum.dy);
                put_real(&mut object, "dz", datum.dz);
            }
            Payload::ConstellationHealth(health) => {
                let sats = health.sats.iter().map(health_sat_json).collect();
                object.insert("satellites".to_string(), Value::Array(sats));
            }
            Payload::Keepalive => {}
            Payload::Almanac(almanac) => {
                let stations = almanac.stations.iter().map(station_json).collect();
                object.insert("satellites".to_string(), Value::Array(stations));
            }
            Payload::Text(message) => {
                object.insert("message".to_string(), json!(message));
            }
            Payload::RawWords(raw) => {
                let data = raw.words[..raw.used()]
                    .iter()
                    .map(|&w| Value::String(encode_word(w)))
                    .collect();
                object.insert("data".to_string(), Value::Array(data));
            }
        }

        Value::Object(object)
    }

    /// Compact single-line form of `to_json`.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}
