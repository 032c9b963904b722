use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::decode_helpers::{WaveError, WaveResult};
use crate::helpers::{printable_id, read_id};

// sizes of the fixed records on the wire
pub const RIFF_CHUNK_LEN: u32 = 12;
pub const FMT_CHUNK_LEN: u32 = 24;
pub const CHUNK_HEADER_LEN: u32 = 8;
pub const RIFF_FORMAT_LEN: u32 = 4;

// PCM specific
pub const PCM_FMT_CHUNK_SIZE: u32 = 16;
pub const PCM_AUDIO_FORMAT: u16 = 1;

/// Four byte chunk tag, stored in file order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const RIFF: ChunkId = ChunkId(*b"RIFF");
    pub const WAVE: ChunkId = ChunkId(*b"WAVE");
    pub const FMT: ChunkId = ChunkId(*b"fmt ");
    pub const DATA: ChunkId = ChunkId(*b"data");
    // skippable
    pub const LIST: ChunkId = ChunkId(*b"LIST");

    /// The tag as the little-endian integer found on the wire.
    pub fn le_value(&self) -> u32 {
        LittleEndian::read_u32(&self.0)
    }

    /// The tag as a big-endian integer, i.e. in reading order. Only used for messages.
    pub fn be_value(&self) -> u32 {
        BigEndian::read_u32(&self.0)
    }

    pub fn is_skippable(&self) -> bool {
        *self == ChunkId::LIST
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x} (\"{}\")", self.be_value(), printable_id(&self.0))
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({:?})", printable_id(&self.0))
    }
}

/// Sample representations the writer knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I16,
    F32,
}

impl SampleType {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleType::U8 => 8,
            SampleType::I16 => 16,
            SampleType::F32 => 32,
        }
    }

    pub fn from_bits_per_sample(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(SampleType::U8),
            16 => Some(SampleType::I16),
            32 => Some(SampleType::F32),
            _ => None,
        }
    }
}

// selector codes: 0 = u8, 1 = i16, 2 = f32
impl TryFrom<u16> for SampleType {
    type Error = WaveError;

    fn try_from(code: u16) -> WaveResult<Self> {
        match code {
            0 => Ok(SampleType::U8),
            1 => Ok(SampleType::I16),
            2 => Ok(SampleType::F32),
            other => Err(WaveError::UnknownSampleType(other)),
        }
    }
}

pub fn bits_per_sample(sample_type: SampleType) -> u16 {
    sample_type.bits_per_sample()
}

// widened so recomputing from hostile headers cannot overflow
pub fn byte_rate(sample_rate: u32, num_channels: u16, bits_per_sample: u16) -> u64 {
    u64::from(sample_rate) * u64::from(num_channels) * u64::from(bits_per_sample / 8)
}

pub fn block_align(num_channels: u16, bits_per_sample: u16) -> u32 {
    u32::from(num_channels) * u32::from(bits_per_sample / 8)
}

// "WAVE" + fmt header and body + data header and payload
pub fn riff_chunk_size(data_size: u64) -> u64 {
    u64::from(RIFF_FORMAT_LEN)
        + u64::from(CHUNK_HEADER_LEN + PCM_FMT_CHUNK_SIZE)
        + u64::from(CHUNK_HEADER_LEN)
        + data_size
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffChunk {
    pub chunk_id: ChunkId,
    pub chunk_size: u32,
    pub format: ChunkId,
}

impl RiffChunk {
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunk_id: ChunkId::RIFF,
            chunk_size,
            format: ChunkId::WAVE,
        }
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let chunk_id = read_id(reader)?;
        let chunk_size = reader.read_u32::<LittleEndian>()?;
        let format = read_id(reader)?;

        Ok(Self { chunk_id, chunk_size, format })
    }

    // one contiguous block
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut block = [0u8; RIFF_CHUNK_LEN as usize];
        block[0..4].copy_from_slice(&self.chunk_id.0);
        LittleEndian::write_u32(&mut block[4..8], self.chunk_size);
        block[8..12].copy_from_slice(&self.format.0);
        writer.write_all(&block)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtChunk {
    pub subchunk_id: ChunkId,
    pub subchunk_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtChunk {
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            subchunk_id: read_id(reader)?,
            subchunk_size: reader.read_u32::<LittleEndian>()?,
            audio_format: reader.read_u16::<LittleEndian>()?,
            num_channels: reader.read_u16::<LittleEndian>()?,
            sample_rate: reader.read_u32::<LittleEndian>()?,
            byte_rate: reader.read_u32::<LittleEndian>()?,
            block_align: reader.read_u16::<LittleEndian>()?,
            bits_per_sample: reader.read_u16::<LittleEndian>()?,
        })
    }

    // field by field, offsets 0..24, no padding
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.subchunk_id.0)?;
        writer.write_u32::<LittleEndian>(self.subchunk_size)?;
        writer.write_u16::<LittleEndian>(self.audio_format)?;
        writer.write_u16::<LittleEndian>(self.num_channels)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.byte_rate)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;
        Ok(())
    }

    pub fn calculated_byte_rate(&self) -> u64 {
        byte_rate(self.sample_rate, self.num_channels, self.bits_per_sample)
    }

    pub fn calculated_block_align(&self) -> u32 {
        block_align(self.num_channels, self.bits_per_sample)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunk {
    pub subchunk_id: ChunkId,
    pub subchunk_size: u32,
    pub data: Vec<u8>,
}

/// Tag and size of any subchunk; the payload is handled by the caller.
pub fn write_subchunk_header<W: Write>(writer: &mut W, id: ChunkId, size: u32) -> io::Result<()> {
    writer.write_all(&id.0)?;
    writer.write_u32::<LittleEndian>(size)
}
