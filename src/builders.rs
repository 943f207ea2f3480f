//! Tabular summary of decoded messages as a Polars DataFrame.
//!
//! One row per message, one column per header attribute plus the payload
//! variant name and the element count of array-bearing variants. Values that
//! are absent for a message (a NaN Z-count, the count of a non-array
//! variant) become nulls.

use crate::error::Result;
use crate::types::Rtcm2Message;
use polars::prelude::*;

/// Column names, in output order.
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "type",
    "variant",
    "station_id",
    "zcount",
    "seqnum",
    "length",
    "station_health",
    "entries",
];

/// Accumulates message headers column by column.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    msg_type: Vec<u32>,
    variant: Vec<&'static str>,
    station_id: Vec<u32>,
    zcount: Vec<Option<f64>>,
    seqnum: Vec<u32>,
    length: Vec<u32>,
    station_health: Vec<u32>,
    entries: Vec<Option<u32>>,
}

impl SummaryBuilder {
    /// Creates a builder with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            msg_type: Vec::with_capacity(capacity),
            variant: Vec::with_capacity(capacity),
            station_id: Vec::with_capacity(capacity),
            zcount: Vec::with_capacity(capacity),
            seqnum: Vec::with_capacity(capacity),
            length: Vec::with_capacity(capacity),
            station_health: Vec::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, message: &Rtcm2Message) {
        let header = &message.header;
        self.msg_type.push(header.msg_type);
        self.variant.push(message.payload.variant_name());
        self.station_id.push(header.station_id);
        self.zcount
            .push((!header.zcount.is_nan()).then_some(header.zcount));
        self.seqnum.push(header.seqnum);
        self.length.push(header.length);
        self.station_health.push(header.station_health);
        self.entries
            .push(message.payload.entries().map(|n| n as u32));
    }

    pub fn len(&self) -> usize {
        self.msg_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.msg_type.is_empty()
    }

    /// Builds the DataFrame; its height equals the number of pushed messages.
    pub fn build(self) -> Result<DataFrame> {
        let [c_type, c_variant, c_station, c_zcount, c_seqnum, c_length, c_health, c_entries] =
            SUMMARY_COLUMNS;

        let columns: Vec<Column> = vec![
            Series::new(c_type.into(), self.msg_type).into(),
            Series::new(c_variant.into(), self.variant).into(),
            Series::new(c_station.into(), self.station_id).into(),
            Series::new(c_zcount.into(), self.zcount).into(),
            Series::new(c_seqnum.into(), self.seqnum).into(),
            Series::new(c_length.into(), self.length).into(),
            Series::new(c_health.into(), self.station_health).into(),
            Series::new(c_entries.into(), self.entries).into(),
        ];

        Ok(DataFrame::new(columns)?)
    }
}

impl<'a> Extend<&'a Rtcm2Message> for SummaryBuilder {
    fn extend<I: IntoIterator<Item = &'a Rtcm2Message>>(&mut self, iter: I) {
        for message in iter {
            self.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn message(msg_type: u32, zcount: f64, payload: Payload) -> Rtcm2Message {
        Rtcm2Message {
            header: Header {
                msg_type,
                station_id: 7,
                zcount,
                ..Header::default()
            },
            payload,
        }
    }

    #[test]
    fn test_summary_builder() {
        let mut builder = SummaryBuilder::with_capacity(3);
        builder.push(&message(6, 12.5, Payload::Keepalive));
        builder.push(&message(
            1,
            f64::NAN,
            Payload::Ranges(RangeCorrections {
                nentries: 1,
                sats: vec![RangeSat::default()],
            }),
        ));
        builder.push(&message(16, 0.0, Payload::Text("hello".to_string())));
        assert_eq!(builder.len(), 3);

        let df = builder.build().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), SUMMARY_COLUMNS.len());

        let zcount = df.column("zcount").unwrap();
        assert_eq!(zcount.null_count(), 1);
        let entries = df.column("entries").unwrap();
        assert_eq!(entries.null_count(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let builder = SummaryBuilder::default();
        assert!(builder.is_empty());

        let df = builder.build().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), SUMMARY_COLUMNS.len());
    }
}
