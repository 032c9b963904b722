use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use crate::chunk::{
    CHUNK_HEADER_LEN, ChunkId, DataChunk, FMT_CHUNK_LEN, FmtChunk, PCM_AUDIO_FORMAT,
    PCM_FMT_CHUNK_SIZE, RIFF_CHUNK_LEN, RiffChunk,
};
use crate::decode_helpers::{TagField, Wave, WaveError, WaveResult};
use crate::helpers::{read_id, skip_bytes, stream_len};

/// Open and fully decode a PCM wave file.
pub fn open<P: AsRef<Path>>(path: P) -> WaveResult<Wave> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| WaveError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Decoding wave file: {}", path.display());
    decode(&mut BufReader::new(file))
}

pub fn decode_bytes(bytes: &[u8]) -> WaveResult<Wave> {
    decode(&mut Cursor::new(bytes))
}

/// Decode a wave stream from its first byte.
///
/// Every structural check runs before the payload is allocated, so an error
/// never leaves a partially built [`Wave`] behind.
pub fn decode<R: Read + Seek>(reader: &mut R) -> WaveResult<Wave> {
    let file_len = stream_len(reader)?;
    let mut calculated_chunk_size =
        i64::try_from(file_len).unwrap_or(i64::MAX) - i64::from(CHUNK_HEADER_LEN);

    // RIFF
    let riff_chunk = RiffChunk::read_from(reader)?;
    if riff_chunk.chunk_id != ChunkId::RIFF {
        return Err(WaveError::tag(TagField::Riff, riff_chunk.chunk_id, ChunkId::RIFF));
    }
    if i64::from(riff_chunk.chunk_size) != calculated_chunk_size {
        return Err(WaveError::ChunkSize {
            got: riff_chunk.chunk_size,
            expected: calculated_chunk_size,
        });
    }
    if riff_chunk.format != ChunkId::WAVE {
        return Err(WaveError::tag(TagField::Wave, riff_chunk.format, ChunkId::WAVE));
    }
    debug!("RIFF chunk size: {}", riff_chunk.chunk_size);

    // "fmt "
    let fmt_chunk = FmtChunk::read_from(reader)?;
    validate_fmt(&fmt_chunk)?;
    debug!(
        "Format: {} channel(s), {} Hz, {} bits per sample",
        fmt_chunk.num_channels, fmt_chunk.sample_rate, fmt_chunk.bits_per_sample
    );

    // skippable chunks sit between fmt and data
    let mut id = read_id(reader)?;
    while id.is_skippable() {
        let size = reader.read_u32::<LittleEndian>()?;
        trace!("Skipping {:?} chunk of {} bytes", id, size);
        calculated_chunk_size -= i64::from(size) + i64::from(CHUNK_HEADER_LEN);
        skip_bytes(reader, size)?;
        id = read_id(reader)?;
    }

    // data
    if id != ChunkId::DATA {
        return Err(WaveError::tag(TagField::Data, id, ChunkId::DATA));
    }
    let subchunk_size = reader.read_u32::<LittleEndian>()?;

    let calculated_data_size =
        calculated_chunk_size - i64::from(FMT_CHUNK_LEN) - i64::from(RIFF_CHUNK_LEN);
    if i64::from(subchunk_size) > calculated_data_size {
        return Err(WaveError::DataSize {
            got: subchunk_size,
            bound: calculated_data_size,
        });
    }
    if i64::from(subchunk_size) < calculated_data_size {
        debug!(
            "Ignoring {} bytes after the data payload",
            calculated_data_size - i64::from(subchunk_size)
        );
    }

    let data = read_payload(reader, subchunk_size)?;

    Ok(Wave::loaded(
        riff_chunk,
        fmt_chunk,
        DataChunk {
            subchunk_id: id,
            subchunk_size,
            data,
        },
    ))
}

fn validate_fmt(fmt: &FmtChunk) -> WaveResult<()> {
    if fmt.subchunk_id != ChunkId::FMT {
        return Err(WaveError::tag(TagField::Fmt, fmt.subchunk_id, ChunkId::FMT));
    }

    // the body read is fixed at 16 bytes, so a different size would desync the stream
    if fmt.subchunk_size != PCM_FMT_CHUNK_SIZE {
        return Err(WaveError::FmtSize {
            got: fmt.subchunk_size,
            expected: PCM_FMT_CHUNK_SIZE,
        });
    }

    if fmt.audio_format != PCM_AUDIO_FORMAT {
        return Err(WaveError::UnsupportedFormat(fmt.audio_format));
    }

    let calculated_byte_rate = fmt.calculated_byte_rate();
    if u64::from(fmt.byte_rate) != calculated_byte_rate {
        return Err(WaveError::ByteRate {
            got: fmt.byte_rate,
            expected: calculated_byte_rate,
        });
    }

    let calculated_block_align = fmt.calculated_block_align();
    if u32::from(fmt.block_align) != calculated_block_align {
        return Err(WaveError::BlockAlign {
            got: fmt.block_align,
            expected: calculated_block_align,
        });
    }

    Ok(())
}

fn read_payload<R: Read>(reader: &mut R, size: u32) -> WaveResult<Vec<u8>> {
    let len = size as usize;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| WaveError::Alloc(len))?;
    data.resize(len, 0);

    debug!("Reading {} bytes of sample data", len);
    reader.read_exact(&mut data)?;

    Ok(data)
}
