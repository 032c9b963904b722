use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::chunk::{ChunkId, DataChunk, FmtChunk, RiffChunk, SampleType};

/// Which tag field failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Riff,
    Wave,
    Fmt,
    Data,
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagField::Riff => "RIFF_CHUNK_ID",
            TagField::Wave => "WAVE_CHUNK_ID",
            TagField::Fmt => "FMT_SUBCHUNK_ID",
            TagField::Data => "DATA_SUBCHUNK_ID",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum WaveError {
    #[error("FILE_STREAM: cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{field}: got {got}, expected {expected}")]
    TagMismatch {
        field: TagField,
        got: ChunkId,
        expected: ChunkId,
    },

    #[error("RIFF_CHUNK_SIZE: chunk size is not equal to calculated chunk size, got {got}, expected {expected}")]
    ChunkSize { got: u32, expected: i64 },

    #[error("FMT_SUBCHUNK_SIZE: only PCM format chunks are supported, got {got}, expected {expected}")]
    FmtSize { got: u32, expected: u32 },

    #[error("AUDIO_FORMAT: unsupported audio format {0}, supported audio formats: PCM")]
    UnsupportedFormat(u16),

    #[error("BYTE_RATE: byte rate is not equal to calculated byte rate, got {got}, expected {expected}")]
    ByteRate { got: u32, expected: u64 },

    #[error("BLOCK_ALIGN: block align is not equal to calculated block align, got {got}, expected {expected}")]
    BlockAlign { got: u16, expected: u32 },

    #[error("DATA_SUBCHUNK_SIZE: data size exceeds the container, got {got}, bound {bound}")]
    DataSize { got: u32, bound: i64 },

    #[error("MALLOC: failed to allocate memory of size {0}")]
    Alloc(usize),

    #[error("SAMPLE_TYPE: unrecognized sample type {0}")]
    UnknownSampleType(u16),

    #[error("INVALID_PARAMETER: {0}")]
    InvalidParameter(String),
}

/// Coarse category of a [`WaveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Io,
    TagMismatch,
    InvariantViolation,
    BoundViolation,
    UnsupportedFormat,
    Allocation,
    InvalidParameter,
}

impl WaveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WaveError::Open { .. } => ErrorKind::Open,
            WaveError::Io(_) => ErrorKind::Io,
            WaveError::TagMismatch { .. } => ErrorKind::TagMismatch,
            WaveError::ChunkSize { .. }
            | WaveError::FmtSize { .. }
            | WaveError::ByteRate { .. }
            | WaveError::BlockAlign { .. } => ErrorKind::InvariantViolation,
            WaveError::DataSize { .. } => ErrorKind::BoundViolation,
            WaveError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            WaveError::Alloc(_) => ErrorKind::Allocation,
            WaveError::UnknownSampleType(_) | WaveError::InvalidParameter(_) => {
                ErrorKind::InvalidParameter
            }
        }
    }

    pub(crate) fn tag(field: TagField, got: ChunkId, expected: ChunkId) -> Self {
        WaveError::TagMismatch { field, got, expected }
    }
}

pub type WaveResult<T> = Result<T, WaveError>;

/// A fully validated PCM wave file. Only a successful decode builds one.
#[derive(Debug)]
pub struct Wave {
    riff_chunk: RiffChunk,
    fmt_chunk: FmtChunk,
    data_chunk: DataChunk,
    is_loaded: bool,
}

impl Wave {
    pub(crate) fn loaded(riff_chunk: RiffChunk, fmt_chunk: FmtChunk, data_chunk: DataChunk) -> Self {
        Self {
            riff_chunk,
            fmt_chunk,
            data_chunk,
            is_loaded: true,
        }
    }

    pub fn riff(&self) -> &RiffChunk {
        &self.riff_chunk
    }

    pub fn fmt(&self) -> &FmtChunk {
        &self.fmt_chunk
    }

    pub fn data(&self) -> &DataChunk {
        &self.data_chunk
    }

    /// Raw payload bytes; empty once released.
    pub fn samples(&self) -> &[u8] {
        &self.data_chunk.data
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn sample_type(&self) -> Option<SampleType> {
        SampleType::from_bits_per_sample(self.fmt_chunk.bits_per_sample)
    }

    /// Number of complete multi-channel frames in the declared payload.
    pub fn num_frames(&self) -> u64 {
        match self.fmt_chunk.block_align {
            0 => 0,
            align => u64::from(self.data_chunk.subchunk_size) / u64::from(align),
        }
    }

    pub fn duration_secs(&self) -> f64 {
        match self.fmt_chunk.sample_rate {
            0 => 0.0,
            rate => self.num_frames() as f64 / f64::from(rate),
        }
    }

    /// Hand the payload to the caller, leaving the wave released.
    pub fn into_samples(mut self) -> Vec<u8> {
        self.is_loaded = false;
        std::mem::take(&mut self.data_chunk.data)
    }

    /// Free the payload buffer. Calling it again is a no-op.
    pub fn release(&mut self) {
        if self.is_loaded {
            self.data_chunk.data = Vec::new();
            self.is_loaded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{PCM_AUDIO_FORMAT, PCM_FMT_CHUNK_SIZE};

    fn sample_wave() -> Wave {
        let fmt_chunk = FmtChunk {
            subchunk_id: ChunkId::FMT,
            subchunk_size: PCM_FMT_CHUNK_SIZE,
            audio_format: PCM_AUDIO_FORMAT,
            num_channels: 2,
            sample_rate: 4,
            byte_rate: 16,
            block_align: 4,
            bits_per_sample: 16,
        };
        let data_chunk = DataChunk {
            subchunk_id: ChunkId::DATA,
            subchunk_size: 8,
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        Wave::loaded(RiffChunk::new(44), fmt_chunk, data_chunk)
    }

    #[test]
    fn release_is_idempotent() {
        let mut wave = sample_wave();
        assert!(wave.is_loaded());
        assert_eq!(wave.samples().len(), 8);

        wave.release();
        assert!(!wave.is_loaded());
        assert!(wave.samples().is_empty());
        assert_eq!(wave.data().data.capacity(), 0);

        wave.release();
        assert!(!wave.is_loaded());
    }

    #[test]
    fn frames_and_duration() {
        let wave = sample_wave();
        assert_eq!(wave.num_frames(), 2);
        assert_eq!(wave.duration_secs(), 0.5);
        assert_eq!(wave.sample_type(), Some(SampleType::I16));
    }

    #[test]
    fn into_samples_moves_payload() {
        let wave = sample_wave();
        assert_eq!(wave.into_samples(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn messages_name_field_and_values() {
        let err = WaveError::tag(TagField::Riff, ChunkId(*b"RIFX"), ChunkId::RIFF);
        assert_eq!(
            err.to_string(),
            "RIFF_CHUNK_ID: got 0x52494658 (\"RIFX\"), expected 0x52494646 (\"RIFF\")"
        );
        assert_eq!(err.kind(), ErrorKind::TagMismatch);

        let err = WaveError::ByteRate { got: 1, expected: 88200 };
        assert!(err.to_string().starts_with("BYTE_RATE:"));
        assert!(err.to_string().contains("got 1, expected 88200"));
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);

        assert_eq!(WaveError::DataSize { got: 9, bound: 4 }.kind(), ErrorKind::BoundViolation);
    }
}
