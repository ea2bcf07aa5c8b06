//! Event-stream framing
//!
//! Each message goes on the wire as `data: <payload>\n\n`. The payload is
//! written as-is; producers are expected to send single-line payloads.

use bytes::{BufMut, Bytes, BytesMut};

/// Content type of the streaming response
pub const CONTENT_TYPE: &str = "text/event-stream";

/// Prefix of a data record
pub const DATA_PREFIX: &[u8] = b"data: ";

/// Blank-line record terminator
pub const TERMINATOR: &[u8] = b"\n\n";

/// Frame one message as a data record
pub fn data(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(DATA_PREFIX.len() + payload.len() + TERMINATOR.len());
    buf.put_slice(DATA_PREFIX);
    buf.put_slice(payload);
    buf.put_slice(TERMINATOR);
    buf.freeze()
}

/// Frame a comment record, ignored by event-stream clients
pub fn comment(text: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(text.len() + 4);
    buf.put_slice(b": ");
    buf.put_slice(text.as_bytes());
    buf.put_slice(TERMINATOR);
    buf.freeze()
}

/// Keep-alive comment sent on idle connections
pub fn keepalive() -> Bytes {
    Bytes::from_static(b": keepalive\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_frame() {
        assert_eq!(&data(b"hello")[..], b"data: hello\n\n");
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(&data(b"")[..], b"data: \n\n");
    }

    #[test]
    fn test_json_payload_untouched() {
        let payload = br#"{"podName":"web-1","containerStates":{"app":"running"}}"#;
        let frame = data(payload);

        assert!(frame.starts_with(DATA_PREFIX));
        assert!(frame.ends_with(TERMINATOR));
        assert_eq!(&frame[DATA_PREFIX.len()..frame.len() - TERMINATOR.len()], payload);
    }

    #[test]
    fn test_comment_frames() {
        assert_eq!(&comment("hi")[..], b": hi\n\n");
        assert_eq!(keepalive(), comment("keepalive"));
    }
}
