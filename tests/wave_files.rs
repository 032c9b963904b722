use std::fs;

use pcm_wave::{ErrorKind, SampleType, TagField, WaveError, open, save};

fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn saved_file_has_canonical_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("four.wav");

    save(&path, &[0x00, 0x01, 0x02, 0x03], 1, 44100, SampleType::I16).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 48);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 40);

    let wave = open(&path).unwrap();
    assert_eq!(wave.fmt().byte_rate, 88200);
    assert_eq!(wave.fmt().block_align, 2);
    assert_eq!(wave.riff().chunk_size, 40);
    assert_eq!(wave.samples(), &[0x00, 0x01, 0x02, 0x03]);
}

#[test]
fn save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "old.wav", &[0xAA; 200]);

    save(&path, &[7; 8], 2, 8000, SampleType::U8).unwrap();

    let wave = open(&path).unwrap();
    assert_eq!(wave.samples(), &[7; 8]);
    assert_eq!(wave.fmt().num_channels, 2);
}

#[test]
fn corrupted_file_reports_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.wav");
    save(&path, &[1, 2, 3, 4], 1, 8000, SampleType::U8).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[8..12].copy_from_slice(b"AVI ");
    let path = write_file(&dir, "bad.wav", &bytes);

    let err = open(&path).unwrap_err();
    assert!(matches!(err, WaveError::TagMismatch { field: TagField::Wave, .. }));
    assert!(err.to_string().starts_with("WAVE_CHUNK_ID: got 0x41564920"));
}

#[test]
fn save_into_missing_directory_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.wav");

    let err = save(&path, &[0; 2], 1, 8000, SampleType::U8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
}

#[test]
fn release_after_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.wav");
    save(&path, &[0; 32], 1, 8000, SampleType::F32).unwrap();

    let mut wave = open(&path).unwrap();
    assert!(wave.is_loaded());
    assert_eq!(wave.num_frames(), 8);

    wave.release();
    wave.release();
    assert!(!wave.is_loaded());
    assert!(wave.samples().is_empty());
}
