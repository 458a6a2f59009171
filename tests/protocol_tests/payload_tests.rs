//! Payload Tests
//!
//! Tests for the bounded payload reader and chunked transfer loops.

use std::io::{Cursor, Read};

use safekeep::network::{receive_payload, send_payload};
use safekeep::protocol::{encode_backup_request_header, PayloadReader};
use safekeep::SafekeepError;

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

// =============================================================================
// PayloadReader Tests
// =============================================================================

#[test]
fn test_reader_stops_at_declared_size() {
    let mut stream = Cursor::new(b"hello world".to_vec());
    let mut payload = PayloadReader::new(&mut stream, 5);

    let mut body = Vec::new();
    payload.read_to_end(&mut body).unwrap();

    assert_eq!(body, b"hello");
    assert_eq!(payload.received(), 5);
    assert_eq!(payload.remaining(), 0);
    drop(payload);

    // The rest is left on the stream
    assert_eq!(stream.position(), 5);
}

#[test]
fn test_reader_reports_short_payload() {
    let mut stream = Cursor::new(b"abc".to_vec());
    let mut payload = PayloadReader::new(&mut stream, 10);

    let mut body = Vec::new();
    payload.read_to_end(&mut body).unwrap();

    assert_eq!(body, b"abc");
    assert_eq!(payload.declared(), 10);
    assert_eq!(payload.received(), 3);
    assert!(!payload.is_complete());
}

#[test]
fn test_reader_zero_length_payload() {
    let mut stream = Cursor::new(b"junk".to_vec());
    let mut payload = PayloadReader::new(&mut stream, 0);

    let mut buf = [0u8; 8];
    assert_eq!(payload.read(&mut buf).unwrap(), 0);
    assert!(payload.is_complete());
}

// =============================================================================
// Chunked Transfer Tests
// =============================================================================

#[test]
fn test_send_payload_is_chunk_size_independent() {
    let data = sample(10_000);

    for chunk_size in [1, 7, 512, 4096, 1 << 20] {
        let mut wire = Vec::new();
        let sent =
            send_payload(&mut &data[..], &mut wire, data.len() as u32, chunk_size).unwrap();

        assert_eq!(sent, data.len() as u64, "chunk size {}", chunk_size);
        assert_eq!(wire, data, "chunk size {}", chunk_size);
    }
}

#[test]
fn test_send_payload_stops_at_declared_size() {
    let data = sample(100);
    let mut wire = Vec::new();

    send_payload(&mut &data[..], &mut wire, 40, 16).unwrap();
    assert_eq!(wire, &data[..40]);
}

#[test]
fn test_send_payload_short_source_fails() {
    let data = sample(10);
    let mut wire = Vec::new();

    let result = send_payload(&mut &data[..], &mut wire, 20, 4);
    assert!(matches!(result, Err(SafekeepError::Io(_))));
}

#[test]
fn test_backup_header_size_matches_streamed_bytes() {
    let data = sample(3000);
    let header = encode_backup_request_header(9, 1, "data.bin", data.len() as u32).unwrap();

    let mut wire = header.to_vec();
    send_payload(&mut &data[..], &mut wire, data.len() as u32, 256).unwrap();

    let size_at = wire.len() - data.len() - 4;
    let declared = u32::from_le_bytes(wire[size_at..size_at + 4].try_into().unwrap());
    assert_eq!(declared as usize, wire.len() - header.len());
}

#[test]
fn test_receive_payload_chunked() {
    let data = sample(5000);

    for chunk_size in [1, 3, 1024, 8192] {
        let mut stream = Cursor::new(data.clone());
        let mut payload = PayloadReader::new(&mut stream, data.len() as u32);
        let mut sink = Vec::new();

        let received = receive_payload(&mut payload, &mut sink, chunk_size).unwrap();
        assert_eq!(received, data.len() as u64);
        assert_eq!(sink, data);
    }
}

#[test]
fn test_receive_payload_early_close_is_not_fatal() {
    let mut stream = Cursor::new(b"partial".to_vec());
    let mut payload = PayloadReader::new(&mut stream, 100);
    let mut sink = Vec::new();

    let received = receive_payload(&mut payload, &mut sink, 4).unwrap();
    assert_eq!(received, 7);
    assert_eq!(sink, b"partial");
    assert!(!payload.is_complete());
}
