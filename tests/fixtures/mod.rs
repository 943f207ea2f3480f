//! Test fixtures for integration tests
//!
//! Sample RTCM2 JSON messages, one per message type, plus helpers for
//! assembling variations of them.

#![allow(dead_code)]

/// Header attributes shared by the samples, without the `type`.
pub const HEADER: &str = r#""class":"RTCM2","device":"/dev/ttyUSB0","station_id":688,"zcount":843.0,"seqnum":5,"length":12,"station_health":6"#;

/// Wraps payload attributes into a full message object of the given type.
pub fn message(msg_type: u32, payload: &str) -> String {
    if payload.is_empty() {
        format!("{{{},\"type\":{}}}", HEADER, msg_type)
    } else {
        format!("{{{},\"type\":{},{}}}", HEADER, msg_type, payload)
    }
}

pub fn range_sat(ident: u32) -> String {
    format!(
        r#"{{"ident":{},"udre":1,"issuedata":{},"rangerr":-1.25,"rangerate":0.064}}"#,
        ident,
        ident * 10
    )
}

pub fn health_sat(ident: u32) -> String {
    format!(
        r#"{{"ident":{},"iodl":true,"health":0,"health_en":false,"new_data":true,"los_warning":false,"tou":3}}"#,
        ident
    )
}

pub fn station(id: u32) -> String {
    format!(
        r#"{{"latitude":52.375,"longitude":4.891,"range":300,"frequency":304.5,"health":0,"station_id":{},"bitrate":200}}"#,
        id
    )
}

/// Array attribute named `satellites` holding `n` elements built by `element`.
pub fn satellites(n: u32, element: fn(u32) -> String) -> String {
    let items: Vec<String> = (1..=n).map(element).collect();
    format!(r#""satellites":[{}]"#, items.join(","))
}

pub fn ranges(n: u32) -> String {
    message(1, &satellites(n, range_sat))
}

pub fn constellation_health(n: u32) -> String {
    message(5, &satellites(n, health_sat))
}

pub fn almanac(n: u32) -> String {
    message(7, &satellites(n, station))
}

pub fn reference_ecef() -> String {
    message(
        3,
        r#""valid":true,"x":3899137.5,"y":335173.25,"z":5024810.75"#,
    )
}

pub fn reference_datum() -> String {
    message(
        4,
        r#""valid":true,"system":0,"sense":1,"datum":"W84","dx":0.5,"dy":-0.25,"dz":1.0"#,
    )
}

pub fn keepalive() -> String {
    message(6, "")
}

pub fn text(body: &str) -> String {
    message(16, &format!(r#""message":"{}""#, body))
}

/// Fallback message of type 2 carrying `n` copies of `token`.
///
/// `token` is the JSON-escaped form, e.g. `U\\t0x01ABCDEF\\n`.
pub fn raw_words(n: usize, token: &str) -> String {
    let items: Vec<String> = (0..n).map(|_| format!("\"{}\"", token)).collect();
    message(2, &format!(r#""data":[{}]"#, items.join(",")))
}

/// Escaped form of a well-formed word token.
pub const WORD_TOKEN: &str = r"U\t0x01ABCDEF\n";
/// Escaped form of a token with only seven hex digits.
pub const SHORT_WORD_TOKEN: &str = r"U\t0x1ABCDEF\n";

/// One sample of every structured type, newline-delimited.
pub fn sample_stream() -> String {
    [
        ranges(3),
        reference_ecef(),
        reference_datum(),
        constellation_health(2),
        keepalive(),
        almanac(1),
        text("BEACON OK"),
        raw_words(4, WORD_TOKEN),
    ]
    .join("\n")
}
