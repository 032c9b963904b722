use std::io::{self, Read, Seek, SeekFrom};

use crate::chunk::ChunkId;

// helpers for the WAV reader and writer
//
// read a four byte chunk id as it sits on the wire
pub fn read_id<R: Read>(reader: &mut R) -> io::Result<ChunkId> {
    let mut id = [0u8; 4];
    reader.read_exact(&mut id)?;
    Ok(ChunkId(id))
}
//
// total length of a seekable source, leaves the cursor at offset 0
pub fn stream_len<S: Seek>(stream: &mut S) -> io::Result<u64> {
    let len = stream.seek(SeekFrom::End(0))?;
    stream.rewind()?;
    Ok(len)
}
//
// move past num bytes without reading them
pub fn skip_bytes<S: Seek>(stream: &mut S, num: u32) -> io::Result<()> {
    stream.seek(SeekFrom::Current(i64::from(num)))?;
    Ok(())
}
//
// printable form of an id, anything outside graphic ascii shows as '.'
pub fn printable_id(id: &[u8; 4]) -> String {
    id.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                '.'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn stream_len_rewinds() {
        let mut cur = Cursor::new(vec![0u8; 10]);
        cur.set_position(7);
        assert_eq!(stream_len(&mut cur).unwrap(), 10);
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn skip_then_read_id() {
        let mut cur = Cursor::new(b"xxxxdata".to_vec());
        skip_bytes(&mut cur, 4).unwrap();
        assert_eq!(read_id(&mut cur).unwrap(), ChunkId::DATA);
    }

    #[test]
    fn read_id_short_source() {
        let mut cur = Cursor::new(b"RI".to_vec());
        let err = read_id(&mut cur).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn printable_id_masks_binary() {
        assert_eq!(printable_id(b"fmt "), "fmt ");
        assert_eq!(printable_id(&[b'd', 0x00, b't', 0xFF]), "d.t.");
    }
}
