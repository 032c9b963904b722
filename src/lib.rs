//! Reading and writing canonical PCM WAVE files.
//!
//! [`wav::open`] decodes a file into a validated [`Wave`], checking every
//! header tag and derived field on the way. [`writer::save`] does the inverse
//! for a raw sample buffer.

pub mod chunk;
pub mod decode_helpers;
pub mod helpers;
pub mod wav;
pub mod writer;

pub use chunk::{ChunkId, DataChunk, FmtChunk, RiffChunk, SampleType};
pub use decode_helpers::{ErrorKind, TagField, Wave, WaveError, WaveResult};
pub use wav::{decode, decode_bytes, open};
pub use writer::{PcmFormat, encode, encode_to_vec, save};
