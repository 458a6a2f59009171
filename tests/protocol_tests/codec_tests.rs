//! Codec Tests
//!
//! Tests for request encoding and response decoding.

use std::io::{Cursor, Read};

use bytes::BytesMut;
use safekeep::protocol::{
    decode_filename_body, decode_payload_body, decode_response_header,
    encode_backup_request_header, encode_delete_request, encode_filename_field,
    encode_list_request, encode_request, encode_retrieve_request, OpCode, Request, Status,
    MAX_FILENAME_LEN,
};
use safekeep::SafekeepError;

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_list_request() {
    let encoded = encode_list_request(42, 1);

    // Expected: [identity 42 LE][version 1][op 202]
    assert_eq!(&encoded[..], &[0x2A, 0x00, 0x00, 0x00, 0x01, 0xCA]);
}

#[test]
fn test_encode_retrieve_request() {
    let encoded = encode_retrieve_request(0x0102_0304, 1, "a.txt").unwrap();

    assert_eq!(&encoded[0..4], &[0x04, 0x03, 0x02, 0x01]); // identity LE
    assert_eq!(encoded[4], 1);
    assert_eq!(encoded[5], OpCode::Retrieve as u8);
    assert_eq!(&encoded[6..8], &[0x05, 0x00]); // name_len = 5
    assert_eq!(&encoded[8..], b"a.txt");
}

#[test]
fn test_encode_delete_request() {
    let encoded = encode_delete_request(7, 1, "notes.md").unwrap();

    assert_eq!(encoded.len(), 6 + 2 + 8);
    assert_eq!(encoded[5], 201);
    assert_eq!(&encoded[6..8], &[0x08, 0x00]);
    assert_eq!(&encoded[8..], b"notes.md");
}

#[test]
fn test_encode_backup_request_header_scenario() {
    let encoded = encode_backup_request_header(42, 1, "a.txt", 5).unwrap();

    let expected: [u8; 17] = [
        0x2A, 0x00, 0x00, 0x00, // identity
        0x01, // version
        0x64, // op = 100
        0x05, 0x00, // name_len
        0x61, 0x2E, 0x74, 0x78, 0x74, // "a.txt"
        0x05, 0x00, 0x00, 0x00, // payload_size
    ];
    assert_eq!(&encoded[..], &expected);
}

#[test]
fn test_encode_request_dispatches_by_kind() {
    let list = encode_request(1, 1, &Request::ListAll).unwrap();
    assert_eq!(list, encode_list_request(1, 1));

    let backup = Request::Backup {
        filename: "b.bin".to_string(),
        payload_size: 1024,
    };
    assert_eq!(backup.op_code(), OpCode::Backup);
    assert_eq!(backup.filename(), Some("b.bin"));
    let encoded = encode_request(1, 1, &backup).unwrap();
    assert_eq!(&encoded[encoded.len() - 4..], &1024u32.to_le_bytes());
}

#[test]
fn test_encode_utf8_filename_counts_bytes() {
    // "é" is 2 bytes in UTF-8
    let encoded = encode_retrieve_request(1, 1, "café").unwrap();
    assert_eq!(&encoded[6..8], &[0x05, 0x00]);
}

// =============================================================================
// Filename Boundary Tests
// =============================================================================

#[test]
fn test_filename_at_limit_encodes() {
    let name = "x".repeat(MAX_FILENAME_LEN);
    let encoded = encode_delete_request(1, 1, &name).unwrap();

    assert_eq!(&encoded[6..8], &[0xFF, 0xFF]);
    assert_eq!(encoded.len(), 6 + 2 + MAX_FILENAME_LEN);
}

#[test]
fn test_filename_over_limit_fails() {
    let name = "x".repeat(MAX_FILENAME_LEN + 1);

    let result = encode_retrieve_request(1, 1, &name);
    assert!(matches!(result, Err(SafekeepError::Encoding(_))));

    let result = encode_backup_request_header(1, 1, &name, 0);
    assert!(matches!(result, Err(SafekeepError::Encoding(_))));
}

#[test]
fn test_filename_field_round_trip_at_limit() {
    let name = "é".repeat(MAX_FILENAME_LEN / 2) + "z";
    let mut buf = BytesMut::new();
    encode_filename_field(&mut buf, &name).unwrap();

    let mut cursor = Cursor::new(buf.freeze());
    assert_eq!(decode_filename_body(&mut cursor).unwrap(), name);
}

// =============================================================================
// Response Decoding Tests
// =============================================================================

#[test]
fn test_decode_response_header() {
    let bytes = [0x01, 0xD2, 0x00]; // version 1, status 210
    let header = decode_response_header(&mut &bytes[..]).unwrap();

    assert_eq!(header.version, 1);
    assert_eq!(header.status_code, 210);
    assert_eq!(header.status().unwrap(), Status::FileRetrieved);
    assert!(header.status().unwrap().is_success());
}

#[test]
fn test_decode_error_statuses() {
    let cases = [
        (1001u16, Status::FileNotFound),
        (1002, Status::UserHasNoFiles),
        (1003, Status::GeneralError),
    ];
    for (code, expected) in cases {
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&code.to_le_bytes());
        let header = decode_response_header(&mut &bytes[..]).unwrap();
        assert_eq!(header.status().unwrap(), expected);
        assert!(!expected.is_success());
    }
}

#[test]
fn test_unknown_status_is_protocol_violation() {
    let bytes = [0x01, 0x00, 0x00];
    let header = decode_response_header(&mut &bytes[..]).unwrap();

    let result = header.status();
    assert!(matches!(result, Err(SafekeepError::ProtocolViolation(_))));
    assert!(result.unwrap_err().to_string().contains("Unknown response status"));
}

#[test]
fn test_truncated_header() {
    let bytes = [0x01]; // version only
    let result = decode_response_header(&mut &bytes[..]);

    assert!(matches!(
        result,
        Err(SafekeepError::TruncatedStream { field: "response header" })
    ));
}

#[test]
fn test_truncated_filename() {
    // Declares 5 bytes, delivers 2
    let bytes = [0x05, 0x00, b'a', b'.'];
    let result = decode_filename_body(&mut &bytes[..]);

    assert!(matches!(
        result,
        Err(SafekeepError::TruncatedStream { field: "filename" })
    ));
}

#[test]
fn test_invalid_utf8_filename() {
    let bytes = [0x02, 0x00, 0xC3, 0x28];
    let result = decode_filename_body(&mut &bytes[..]);

    assert!(matches!(result, Err(SafekeepError::Encoding(_))));
}

#[test]
fn test_decode_payload_body() {
    let mut bytes = vec![0x05, 0x00];
    bytes.extend_from_slice(b"a.txt");
    bytes.extend_from_slice(&5u32.to_le_bytes());
    bytes.extend_from_slice(b"hello");

    let mut reader = &bytes[..];
    let (filename, size, mut payload) = decode_payload_body(&mut reader).unwrap();
    assert_eq!(filename, "a.txt");
    assert_eq!(size, 5);

    let mut body = Vec::new();
    payload.read_to_end(&mut body).unwrap();
    assert_eq!(body, b"hello");
    assert!(payload.is_complete());
}

#[test]
fn test_truncated_payload_size() {
    let mut bytes = vec![0x01, 0x00, b'f'];
    bytes.extend_from_slice(&[0x05, 0x00]); // only half the size field

    let mut reader = &bytes[..];
    let result = decode_payload_body(&mut reader);
    assert!(matches!(
        result,
        Err(SafekeepError::TruncatedStream { field: "payload size" })
    ));
}

#[test]
fn test_decoding_is_idempotent() {
    let mut bytes = vec![0x01, 0xD3, 0x00, 0x09, 0x00];
    bytes.extend_from_slice(b"files.txt");

    let decode = |buf: &[u8]| {
        let mut reader = buf;
        let header = decode_response_header(&mut reader).unwrap();
        let name = decode_filename_body(&mut reader).unwrap();
        (header, name)
    };

    assert_eq!(decode(&bytes[..]), decode(&bytes[..]));
}
