use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::chunk::{
    CHUNK_HEADER_LEN, ChunkId, FmtChunk, PCM_AUDIO_FORMAT, PCM_FMT_CHUNK_SIZE, RIFF_CHUNK_LEN,
    RiffChunk, SampleType, block_align, byte_rate, riff_chunk_size, write_subchunk_header,
};
use crate::decode_helpers::{WaveError, WaveResult};

/// Parameters describing the PCM buffer handed to the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub num_channels: u16,
    pub sample_rate: u32,
    pub sample_type: SampleType,
}

impl PcmFormat {
    pub fn new(num_channels: u16, sample_rate: u32, sample_type: SampleType) -> Self {
        Self {
            num_channels,
            sample_rate,
            sample_type,
        }
    }

    /// Build the format descriptor, deriving byte rate and block align.
    pub fn fmt_chunk(&self) -> WaveResult<FmtChunk> {
        if self.num_channels == 0 {
            return Err(WaveError::InvalidParameter(
                "channel count must be positive".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(WaveError::InvalidParameter(
                "sample rate must be positive".to_string(),
            ));
        }

        let bits_per_sample = self.sample_type.bits_per_sample();

        let rate = byte_rate(self.sample_rate, self.num_channels, bits_per_sample);
        let byte_rate = u32::try_from(rate).map_err(|_| {
            WaveError::InvalidParameter(format!("byte rate {} does not fit in 32 bits", rate))
        })?;

        let align = block_align(self.num_channels, bits_per_sample);
        let block_align = u16::try_from(align).map_err(|_| {
            WaveError::InvalidParameter(format!("block align {} does not fit in 16 bits", align))
        })?;

        Ok(FmtChunk {
            subchunk_id: ChunkId::FMT,
            subchunk_size: PCM_FMT_CHUNK_SIZE,
            audio_format: PCM_AUDIO_FORMAT,
            num_channels: self.num_channels,
            sample_rate: self.sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
        })
    }
}

/// Write a complete wave stream: header, format descriptor, data chunk.
///
/// The buffer contents are written as given; only the structural fields are derived.
pub fn encode<W: Write>(writer: &mut W, data: &[u8], format: &PcmFormat) -> WaveResult<()> {
    let fmt_chunk = format.fmt_chunk()?;

    let data_size = u32::try_from(data.len()).map_err(|_| {
        WaveError::InvalidParameter(format!("data size {} does not fit in 32 bits", data.len()))
    })?;
    let chunk_size = riff_chunk_size(u64::from(data_size));
    let chunk_size = u32::try_from(chunk_size).map_err(|_| {
        WaveError::InvalidParameter(format!("container size {} does not fit in 32 bits", chunk_size))
    })?;

    RiffChunk::new(chunk_size).write_to(writer)?;
    fmt_chunk.write_to(writer)?;
    write_subchunk_header(writer, ChunkId::DATA, data_size)?;
    writer.write_all(data)?;
    writer.flush()?;

    debug!(
        "Wrote {} bytes of sample data ({} byte container)",
        data_size,
        u64::from(chunk_size) + u64::from(CHUNK_HEADER_LEN)
    );

    Ok(())
}

pub fn encode_to_vec(data: &[u8], format: &PcmFormat) -> WaveResult<Vec<u8>> {
    let header_len = (RIFF_CHUNK_LEN + CHUNK_HEADER_LEN + PCM_FMT_CHUNK_SIZE + CHUNK_HEADER_LEN) as usize;
    let mut out = Vec::with_capacity(header_len + data.len());
    encode(&mut out, data, format)?;
    Ok(out)
}

/// Create (or truncate) the file at `path` and write `data` into it as PCM wave.
pub fn save<P: AsRef<Path>>(
    path: P,
    data: &[u8],
    num_channels: u16,
    sample_rate: u32,
    sample_type: SampleType,
) -> WaveResult<()> {
    let path = path.as_ref();
    let format = PcmFormat::new(num_channels, sample_rate, sample_type);

    let file = File::create(path).map_err(|source| WaveError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Saving wave file: {}", path.display());
    encode(&mut BufWriter::new(file), data, &format)
}
