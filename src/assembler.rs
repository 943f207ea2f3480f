//! Message assembly: classify, select a schema, decode, normalize.
//!
//! Decoding runs as a small state machine:
//! `Start -> Classified -> Decoding -> {Decoded | Failed}`.
//! Classification never fails; the worst case selects the fallback schema.
//! A failed decode never yields a record, so partial writes cannot leak.

use crate::classifier;
use crate::config::DecodeOptions;
use crate::deserializer::decode_object;
use crate::error::{Result, Rtcm2Error};
use crate::registry::*;
use crate::schema::Schema;
use crate::types::*;
use crate::words;
use tracing::{debug, trace};

/// A successfully decoded message and the end of the consumed object.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub message: Rtcm2Message,
    /// Byte offset just past the decoded object in the input text.
    pub cursor: usize,
}

/// Assembly progress. `Decoded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Start,
    Classified(SchemaId),
    Decoding(SchemaId),
    Decoded(SchemaId),
    /// Carries the failure status code.
    Failed(i32),
}

impl AssemblyState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AssemblyState::Decoded(_) | AssemblyState::Failed(_))
    }
}

/// Drives one message through classification and decoding.
pub struct MessageAssembler {
    options: DecodeOptions,
    state: AssemblyState,
}

impl MessageAssembler {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            state: AssemblyState::Start,
        }
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    fn transition(&mut self, next: AssemblyState) {
        trace!(from = ?self.state, to = ?next, "assembly transition");
        self.state = next;
    }

    /// Decodes one message from the front of `text`.
    pub fn run(&mut self, text: &str) -> Result<Decoded> {
        self.state = AssemblyState::Start;

        let id = classifier::classify(text);
        self.transition(AssemblyState::Classified(id));

        self.transition(AssemblyState::Decoding(id));
        match self.decode_consistent(id, text) {
            Ok((id, decoded)) => {
                self.transition(AssemblyState::Decoded(id));
                debug!(
                    msg_type = decoded.message.header.msg_type,
                    variant = decoded.message.payload.variant_name(),
                    "decoded RTCM2 message"
                );
                Ok(decoded)
            }
            Err(err) => {
                self.transition(AssemblyState::Failed(err.status()));
                Err(err)
            }
        }
    }

    /// Decodes with `id`, then checks the variant against the decoded `type`.
    ///
    /// The discriminant scan reads the first raw `"type"` key, while the
    /// structural pass binds the last one and unescapes key names, so the two
    /// can disagree.
    /// On disagreement the decoded type wins and the text is decoded once
    /// more with its schema. The structural parse is deterministic, so the
    /// second pass always agrees with itself.
    fn decode_consistent(&mut self, id: SchemaId, text: &str) -> Result<(SchemaId, Decoded)> {
        let decoded = self.decode(id, text)?;
        let actual = SchemaId::for_type(decoded.message.header.msg_type);
        if actual == id {
            return Ok((id, decoded));
        }

        debug!(
            classified = id.name(),
            decoded = actual.name(),
            msg_type = decoded.message.header.msg_type,
            "decoded type disagrees with classification, decoding again"
        );
        self.transition(AssemblyState::Classified(actual));
        self.transition(AssemblyState::Decoding(actual));
        Ok((actual, self.decode(actual, text)?))
    }

    fn decode(&self, id: SchemaId, text: &str) -> Result<Decoded> {
        let limit = self.options.path_limit;

        let (header, payload, cursor) = match id {
            SchemaId::Ranges => {
                let (frame, cursor) = decode_frame(text, &RTCM1, limit)?;
                let mut ranges = frame.payload;
                ranges.nentries = frame.count;
                (frame.header, Payload::Ranges(ranges), cursor)
            }
            SchemaId::ReferenceEcef => {
                let (frame, cursor) = decode_frame(text, &RTCM3, limit)?;
                (frame.header, Payload::ReferenceEcef(frame.payload), cursor)
            }
            SchemaId::ReferenceDatum => {
                let (frame, cursor) = decode_frame(text, &RTCM4, limit)?;
                (frame.header, Payload::ReferenceDatum(frame.payload), cursor)
            }
            SchemaId::ConstellationHealth => {
                let (frame, cursor) = decode_frame(text, &RTCM5, limit)?;
                let mut health = frame.payload;
                health.nentries = frame.count;
                (frame.header, Payload::ConstellationHealth(health), cursor)
            }
            SchemaId::Keepalive => {
                let (frame, cursor) = decode_frame(text, &RTCM6, limit)?;
                (frame.header, Payload::Keepalive, cursor)
            }
            SchemaId::Almanac => {
                let (frame, cursor) = decode_frame(text, &RTCM7, limit)?;
                let mut almanac = frame.payload;
                almanac.nentries = frame.count;
                (frame.header, Payload::Almanac(almanac), cursor)
            }
            SchemaId::Text => {
                let (frame, cursor) = decode_frame(text, &RTCM16, limit)?;
                (frame.header, Payload::Text(frame.payload), cursor)
            }
            SchemaId::Fallback => {
                debug!("no structured schema, decoding raw words");
                let (frame, cursor) = decode_frame(text, &RTCM2_FALLBACK, limit)?;
                let words = words::decode_words(&frame.payload)?;
                (frame.header, Payload::RawWords(RawWords { words }), cursor)
            }
        };

        Ok(Decoded {
            message: Rtcm2Message { header, payload },
            cursor,
        })
    }
}

/// Decodes `text` into a fresh, zero-initialized frame.
fn decode_frame<P: Default>(
    text: &str,
    schema: &Schema<Frame<P>>,
    path_limit: usize,
) -> Result<(Frame<P>, usize)> {
    let mut frame = Frame::new(path_limit);
    let cursor = decode_object(text, schema, &mut frame)?;
    Ok((frame, cursor))
}

/// Numeric-status form of a decode: `(status, message, cursor)`.
///
/// Status `0` means success; on failure the message is `None` and the cursor
/// is `0`.
pub fn decode_status(text: &str, options: DecodeOptions) -> (i32, Option<Rtcm2Message>, usize) {
    match MessageAssembler::new(options).run(text) {
        Ok(decoded) => (0, Some(decoded.message), decoded.cursor),
        Err(err) => (err.status(), None, 0),
    }
}

impl From<&Rtcm2Error> for AssemblyState {
    fn from(err: &Rtcm2Error) -> Self {
        AssemblyState::Failed(err.status())
    }
}
