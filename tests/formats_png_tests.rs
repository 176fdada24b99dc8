use metascrub::formats::png::{PNG_SIGNATURE, PngCodec, detect_png, verify_chunk_crc, walk_png};
use metascrub::{ImageCodec, ScrubError};
use rstest::rstest;

fn make_png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());
    chunk
}

fn make_valid_ihdr() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&16u32.to_be_bytes());
    payload.extend_from_slice(&16u32.to_be_bytes());
    payload.extend_from_slice(&[8, 2, 0, 0, 0]);
    make_png_chunk(b"IHDR", &payload)
}

fn build(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(&make_valid_ihdr());
    for chunk in chunks {
        data.extend_from_slice(chunk);
    }
    data.extend_from_slice(&make_png_chunk(b"IEND", &[]));
    data
}

#[test]
fn test_text_chunk_removed_to_45_bytes() {
    let text = make_png_chunk(b"tEXt", b"Comment\0abc");
    assert_eq!(text.len(), 23);

    let input = build(&[text]);
    let output = PngCodec.strip(&input).unwrap();

    assert_eq!(output.len(), 45);
    assert_eq!(output, build(&[]));
}

#[rstest]
#[case::text(b"tEXt")]
#[case::compressed(b"zTXt")]
#[case::international(b"iTXt")]
fn test_textual_chunks_dropped(#[case] chunk_type: &[u8; 4]) {
    let idat = make_png_chunk(b"IDAT", &[0x78, 0x9C, 0x01]);
    let input = build(&[make_png_chunk(chunk_type, b"key\0value"), idat.clone()]);
    assert_eq!(PngCodec.strip(&input).unwrap(), build(&[idat]));
}

#[rstest]
#[case::exif(b"eXIf")]
#[case::time(b"tIME")]
#[case::gamma(b"gAMA")]
#[case::palette(b"PLTE")]
fn test_other_chunks_kept(#[case] chunk_type: &[u8; 4]) {
    let input = build(&[make_png_chunk(chunk_type, &[1, 2, 3])]);
    assert_eq!(PngCodec.strip(&input).unwrap(), input);
}

#[test]
fn test_bad_crc_does_not_affect_strip() {
    let mut text = make_png_chunk(b"tEXt", b"a\0b");
    let last = text.len() - 1;
    text[last] ^= 0xFF;
    let input = build(&[text]);

    let units = walk_png(&input).unwrap();
    assert_eq!(verify_chunk_crc(&input, &units[2]), Some(false));
    assert_eq!(verify_chunk_crc(&input, &units[1]), Some(true));
    assert_eq!(PngCodec.strip(&input).unwrap(), build(&[]));
}

#[test]
fn test_strip_is_idempotent() {
    let input = build(&[
        make_png_chunk(b"iTXt", b"XML:com.adobe.xmp\0\0\0\0\0<x/>"),
        make_png_chunk(b"IDAT", &[0; 32]),
    ]);
    let once = PngCodec.strip(&input).unwrap();
    assert_eq!(PngCodec.strip(&once).unwrap(), once);
}

#[rstest]
#[case::empty(b"")]
#[case::partial(b"\x89PNG\r\n")]
#[case::jpeg(b"\xFF\xD8\xFF\xE0")]
fn test_detect_rejects(#[case] data: &[u8]) {
    assert!(!detect_png(data));
}

#[test]
fn test_missing_iend() {
    let mut input = PNG_SIGNATURE.to_vec();
    input.extend_from_slice(&make_valid_ihdr());
    assert!(matches!(
        PngCodec.strip(&input),
        Err(ScrubError::MissingTerminator { .. })
    ));
}

#[test]
fn test_chunk_overruns_buffer() {
    let mut input = PNG_SIGNATURE.to_vec();
    input.extend_from_slice(&1000u32.to_be_bytes());
    input.extend_from_slice(b"IDAT");
    input.extend_from_slice(&[0; 10]);
    assert!(matches!(
        PngCodec.strip(&input),
        Err(ScrubError::TruncatedInput { .. })
    ));
}
