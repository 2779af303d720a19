/*!
 * Tests for source encoding resolution
 */

use smi2srt::charset::{self, EncodingSource};
use smi2srt::errors::SubtitleError;

#[test]
fn test_decode_bytes_withUtf16LeBom_shouldDecode() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "1\n자막".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let decoded = charset::decode_bytes("bom.srt", &bytes, None).unwrap();

    assert_eq!(decoded.text, "1\n자막");
    assert_eq!(decoded.encoding, encoding_rs::UTF_16LE);
}

#[test]
fn test_decode_bytes_withUtf16BeBom_shouldDecode() {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in "<SAMI>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }

    let decoded = charset::decode_bytes("bom.smi", &bytes, None).unwrap();

    assert_eq!(decoded.text, "<SAMI>");
}

#[test]
fn test_detect_encoding_withKoreanLegacyBytes_shouldGuessEucKr() {
    let text = "<SAMI><BODY><SYNC Start=1000><P Class=KRCC>안녕하세요. 오늘은 날씨가 아주 맑고 따뜻합니다. \
                우리는 공원에서 산책을 하고 점심을 먹었습니다.</BODY></SAMI>";
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(text);

    let (encoding, source) = charset::detect_encoding(&bytes);

    assert_eq!(encoding, encoding_rs::EUC_KR);
    assert_eq!(source, EncodingSource::Guessed);
}

#[test]
fn test_decode_bytes_withOverride_shouldIgnoreGuess() {
    // Latin-1 bytes forced through windows-1252
    let decoded = charset::decode_bytes("latin.srt", &[0x63, 0x61, 0x66, 0xE9], Some("latin1")).unwrap();

    assert_eq!(decoded.text, "café");
    assert_eq!(decoded.encoding, encoding_rs::WINDOWS_1252);
}

#[test]
fn test_decode_bytes_withUnknownOverride_shouldReportLabel() {
    let result = charset::decode_bytes("x.smi", b"abc", Some("ebcdic-kr"));

    assert_eq!(
        result.map(|d| d.text),
        Err(SubtitleError::Decode { file: "x.smi".to_string(), encoding: "ebcdic-kr".to_string() })
    );
}

#[test]
fn test_resolve_encoding_label_withCaseAndWhitespace_shouldResolve() {
    assert_eq!(charset::resolve_encoding_label("  Shift_JIS "), Some(encoding_rs::SHIFT_JIS));
    assert_eq!(charset::resolve_encoding_label("cp932"), Some(encoding_rs::SHIFT_JIS));
}
