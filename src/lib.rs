//! Schema-driven decoding of RTCM2 differential-GPS messages carried as JSON.
//!
//! GPS daemons re-encode RTCM2 correction frames as one JSON object per
//! message. This library turns such objects back into strongly typed records
//! without hand-writing a parser per message type: every supported type is
//! described by a declarative `Schema`, and a single generic deserializer
//! executes it.
//!
//! # Features
//!
//! - One shared header schema prepended to every message type
//! - Nested arrays of records with fixed capacities and overflow detection
//! - Cheap discriminant probe before the structural decode
//! - Raw 30-bit word capture for message types without a structured schema
//! - JSON re-encoding of decoded messages
//! - Polars summary table of decoded headers
//!
//! # Example
//!
//! ```no_run
//! use rtcm2_json::{Payload, Rtcm2Reader};
//!
//! let text = r#"{"class":"RTCM2","type":6,"station_id":3,"zcount":12.5,"seqnum":2,"length":1,"station_health":0}"#;
//! let decoded = Rtcm2Reader::read(text, 128)?;
//! assert_eq!(decoded.message.payload, Payload::Keepalive);
//! assert_eq!(decoded.cursor, text.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Message Types
//!
//! | Type | Payload |
//! |------|---------|
//! | 1, 9 | `Ranges` (up to 18 satellites) |
//! | 3 | `ReferenceEcef` |
//! | 4 | `ReferenceDatum` |
//! | 5 | `ConstellationHealth` (up to 31 satellites) |
//! | 6 | `Keepalive` |
//! | 7 | `Almanac` (up to 10 stations) |
//! | 16 | `Text` |
//! | other | `RawWords` (up to 33 words) |
//!
//! # Status Codes
//!
//! Callers that speak the numeric protocol use `Rtcm2Reader::read_status`,
//! which reports `0` on success and `Rtcm2Error::status()` otherwise.

pub mod assembler;
pub mod builders;
pub mod classifier;
pub mod config;
pub mod deserializer;
pub mod encode;
pub mod error;
pub mod registry;
pub mod schema;
pub mod types;
pub mod words;

pub use assembler::{AssemblyState, Decoded, MessageAssembler};
pub use builders::SummaryBuilder;
pub use config::DecodeOptions;
pub use error::{Result, Rtcm2Error};
pub use polars::prelude::DataFrame;
pub use types::*;

use std::fs::File;
use std::path::Path;
use tracing::warn;

/// Main entry point for decoding RTCM2 JSON messages.
pub struct Rtcm2Reader;

impl Rtcm2Reader {
    /// Decodes the first JSON object in `text`.
    ///
    /// # Arguments
    ///
    /// * `text` - JSON text starting with one RTCM2 object; anything after the
    ///   object is left untouched
    /// * `path_limit` - Bound on the stored `device` path, in bytes
    ///
    /// # Returns
    ///
    /// A `Result` containing either:
    /// - A `Decoded` holding the message and the byte offset just past the object
    /// - An `Rtcm2Error` describing why the object was rejected
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rtcm2_json::Rtcm2Reader;
    ///
    /// let text = r#"{"class":"RTCM2","type":16,"station_id":1,"seqnum":0,"length":2,"station_health":0,"message":"hi"}"#;
    /// let decoded = Rtcm2Reader::read(text, 128)?;
    /// println!("{:?}", decoded.message);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read(text: &str, path_limit: usize) -> Result<Decoded> {
        Self::read_with(text, &DecodeOptions::default().with_path_limit(path_limit))
    }

    /// Decodes the first JSON object in `text` with explicit options.
    ///
    /// # Arguments
    ///
    /// * `text` - JSON text starting with one RTCM2 object
    /// * `options` - Decode options applied to this message
    ///
    /// # Returns
    ///
    /// A `Result` containing either:
    /// - A `Decoded` whose payload variant always matches its header's `type`
    /// - An `Rtcm2Error` whose `status()` is the numeric failure code
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rtcm2_json::{DecodeOptions, Rtcm2Reader};
    ///
    /// let options = DecodeOptions::default().with_path_limit(16);
    /// let text = r#"{"class":"RTCM2","type":6,"device":"/dev/ttyUSB0","station_id":3,"seqnum":2,"length":1,"station_health":0}"#;
    /// let decoded = Rtcm2Reader::read_with(text, &options)?;
    /// assert_eq!(decoded.message.header.device, "/dev/ttyUSB0");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_with(text: &str, options: &DecodeOptions) -> Result<Decoded> {
        MessageAssembler::new(*options).run(text)
    }

    /// Numeric form of `read`: `(status, message, cursor)`.
    ///
    /// Status `0` means success. On failure no message is returned and the
    /// cursor is `0`.
    pub fn read_status(text: &str, path_limit: usize) -> (i32, Option<Rtcm2Message>, usize) {
        assembler::decode_status(text, DecodeOptions::default().with_path_limit(path_limit))
    }

    /// Decodes a newline-delimited stream, one result per non-blank line.
    ///
    /// A line that fails is logged and reported; the following lines are
    /// still decoded.
    pub fn read_all<'a>(
        text: &'a str,
        options: &DecodeOptions,
    ) -> impl Iterator<Item = Result<Decoded>> + 'a {
        let options = *options;
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(move |(index, line)| {
                let result = Self::read_with(line, &options);
                if let Err(err) = &result {
                    warn!(line = index + 1, status = err.status(), "skipping message: {}", err);
                }
                result
            })
    }

    /// Decodes every line of a file, using memory mapping to read it.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a file holding one JSON object per line
    /// * `options` - Decode options applied to every line
    ///
    /// # Returns
    ///
    /// A `Result` containing either:
    /// - One `Result<Decoded>` per non-blank line, in file order
    /// - An `Rtcm2Error` if the file cannot be opened or is not UTF-8
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rtcm2_json::{DecodeOptions, Rtcm2Reader};
    ///
    /// let results = Rtcm2Reader::read_file("rtcm2.jsonl", &DecodeOptions::default())?;
    /// let ok = results.iter().filter(|r| r.is_ok()).count();
    /// println!("{} of {} messages decoded", ok, results.len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &DecodeOptions,
    ) -> Result<Vec<Result<Decoded>>> {
        let mapped = MappedFile::open(path)?;
        let results = Self::read_all(mapped.text()?, options).collect();
        Ok(results)
    }
}

/// A memory-mapped input file.
///
/// Every file front end reads through this type, so large inputs are paged
/// in on demand rather than copied.
pub struct MappedFile {
    mmap: memmap2::Mmap,
}

impl MappedFile {
    /// Opens and maps `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(Self { mmap })
    }

    /// The file contents as text. Fails with `Utf8` on invalid UTF-8.
    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.mmap)?)
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

/// Builds a summary DataFrame of the given messages.
///
/// # Example
///
/// ```no_run
/// use rtcm2_json::{summarize, DecodeOptions, Rtcm2Reader};
///
/// let messages: Vec<_> = Rtcm2Reader::read_file("rtcm2.jsonl", &DecodeOptions::default())?
///     .into_iter()
///     .filter_map(|r| r.ok().map(|d| d.message))
///     .collect();
/// let df = summarize(&messages)?;
/// println!("{}", df);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn summarize(messages: &[Rtcm2Message]) -> Result<DataFrame> {
    let mut builder = SummaryBuilder::with_capacity(messages.len());
    builder.extend(messages);
    builder.build()
}
