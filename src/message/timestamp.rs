//! ICMP Timestamp Request/Reply messages (RFC 792)
//!
//! Carries three 32-bit time values between hosts. By protocol convention
//! each value is milliseconds since midnight UTC, but this module preserves
//! only the field width and byte order; choosing a time source and handling
//! rollover is the caller's concern.
//!
//! # Wire Format
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Type      |     Code      |          Checksum             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           Identifier          |        Sequence Number        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Originate Timestamp                      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                       Receive Timestamp                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                       Transmit Timestamp                      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! # Key characteristics
//!
//! - Fixed size: 20 bytes, no payload
//! - Type 13 code 0 for requests, type 14 code 0 for replies
//!
//! # Examples
//!
//! ```
//! use icmp_forge::message::timestamp::{TimestampKind, TimestampMessage};
//!
//! let request = TimestampMessage::request(1, 1, 0, 0, 0);
//! assert_eq!(request.kind(), TimestampKind::Request);
//! assert_eq!(request.len(), 20);
//! assert_eq!(request.header().checksum(), 0xF2FD);
//! ```

use std::fmt::{self, Formatter};
use std::io::Write;
use std::mem;

use zerocopy::byteorder::{BigEndian, U16, U32};
use zerocopy::{FromBytes, IntoBytes, Ref, Unaligned};

use crate::message::checksum::checksum;
use crate::message::header::{IcmpHeader, IcmpType};
use crate::message::MessageError;

/// Full fixed layout of a timestamp message
#[repr(C, packed)]
#[derive(
    FromBytes, IntoBytes, Unaligned, Debug, Clone, Copy, zerocopy::KnownLayout, zerocopy::Immutable,
)]
struct TimestampHeader {
    header: IcmpHeader,
    identifier: U16<BigEndian>,
    sequence: U16<BigEndian>,
    originate: U32<BigEndian>,
    receive: U32<BigEndian>,
    transmit: U32<BigEndian>,
}

/// Distinguishes a Timestamp Request from a Timestamp Reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    Request,
    Reply,
}

/// An ICMP Timestamp Request or Timestamp Reply.
///
/// Construction computes and stores the checksum, so a message serializes to
/// the same bytes for its entire lifetime.
#[derive(Debug, Clone)]
pub struct TimestampMessage {
    fixed: TimestampHeader,
}

impl TimestampMessage {
    pub const FIXED_LEN: usize = mem::size_of::<TimestampHeader>();

    /// Create a Timestamp Request (type 13, code 0).
    pub fn request(
        identifier: u16,
        sequence: u16,
        originate: u32,
        receive: u32,
        transmit: u32,
    ) -> Self {
        Self::finalize(
            IcmpType::TIMESTAMP,
            identifier,
            sequence,
            originate,
            receive,
            transmit,
        )
    }

    /// Create a Timestamp Reply (type 14, code 0).
    pub fn reply(
        identifier: u16,
        sequence: u16,
        originate: u32,
        receive: u32,
        transmit: u32,
    ) -> Self {
        Self::finalize(
            IcmpType::TIMESTAMP_REPLY,
            identifier,
            sequence,
            originate,
            receive,
            transmit,
        )
    }

    fn finalize(
        icmp_type: IcmpType,
        identifier: u16,
        sequence: u16,
        originate: u32,
        receive: u32,
        transmit: u32,
    ) -> Self {
        let mut msg = TimestampMessage {
            fixed: TimestampHeader {
                header: IcmpHeader::new(icmp_type, 0),
                identifier: U16::new(identifier),
                sequence: U16::new(sequence),
                originate: U32::new(originate),
                receive: U32::new(receive),
                transmit: U32::new(transmit),
            },
        };
        let sum = checksum(msg.fixed.as_bytes());
        msg.fixed.header.set_checksum(sum);
        msg
    }

    /// Parse a timestamp request/reply from received bytes.
    ///
    /// Bytes beyond the 20-byte fixed layout are ignored. The stored checksum
    /// is kept verbatim; validity is checked separately by
    /// [`crate::message::validate`].
    pub fn from_bytes(buf: &[u8]) -> Result<TimestampMessage, MessageError> {
        let (fixed, _rest) = Ref::<_, TimestampHeader>::from_prefix(buf)
            .map_err(|_| MessageError::TooShort("timestamp message"))?;
        let fixed = *Ref::into_ref(fixed);

        match fixed.header.icmp_type() {
            IcmpType::TIMESTAMP | IcmpType::TIMESTAMP_REPLY => {}
            other => return Err(MessageError::UnexpectedType(other.into())),
        }

        Ok(TimestampMessage { fixed })
    }

    /// Returns whether this is a request or a reply
    #[inline]
    pub fn kind(&self) -> TimestampKind {
        if self.fixed.header.icmp_type() == IcmpType::TIMESTAMP {
            TimestampKind::Request
        } else {
            TimestampKind::Reply
        }
    }

    /// Returns the common header
    #[inline]
    pub fn header(&self) -> IcmpHeader {
        self.fixed.header
    }

    /// Returns the identifier
    #[inline]
    pub fn identifier(&self) -> u16 {
        self.fixed.identifier.get()
    }

    /// Returns the sequence number
    #[inline]
    pub fn sequence(&self) -> u16 {
        self.fixed.sequence.get()
    }

    /// Returns the originate timestamp
    #[inline]
    pub fn originate(&self) -> u32 {
        self.fixed.originate.get()
    }

    /// Returns the receive timestamp
    #[inline]
    pub fn receive(&self) -> u32 {
        self.fixed.receive.get()
    }

    /// Returns the transmit timestamp
    #[inline]
    pub fn transmit(&self) -> u32 {
        self.fixed.transmit.get()
    }

    /// Total serialized length in bytes, always 20
    #[inline]
    pub fn len(&self) -> usize {
        Self::FIXED_LEN
    }

    /// Serialize to the RFC 792 wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.fixed.as_bytes().to_vec()
    }

    /// Write the wire layout to `w`, propagating sink errors unchanged.
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), MessageError> {
        w.write_all(self.fixed.as_bytes())?;
        Ok(())
    }
}

impl fmt::Display for TimestampMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} id={} seq={} orig={} recv={} trans={}",
            self.header(),
            self.identifier(),
            self.sequence(),
            self.originate(),
            self.receive(),
            self.transmit()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_size() {
        assert_eq!(mem::size_of::<TimestampHeader>(), 20);
        assert_eq!(TimestampMessage::FIXED_LEN, 20);
        assert_eq!(TimestampMessage::request(1, 1, 0, 0, 0).len(), 20);
    }

    #[test]
    fn test_timestamp_request_known_vector() {
        let msg = TimestampMessage::request(1, 1, 0, 0, 0);

        let mut expected = vec![0x0D, 0x00, 0xF2, 0xFD, 0x00, 0x01, 0x00, 0x01];
        expected.extend_from_slice(&[0; 12]);
        assert_eq!(msg.to_bytes(), expected);
    }

    #[test]
    fn test_timestamp_reply_known_vector() {
        let msg = TimestampMessage::reply(1, 1, 0, 0, 0);

        let mut expected = vec![0x0E, 0x00, 0xF1, 0xFD, 0x00, 0x01, 0x00, 0x01];
        expected.extend_from_slice(&[0; 12]);
        assert_eq!(msg.to_bytes(), expected);
    }

    #[test]
    fn test_timestamp_field_layout() {
        let msg = TimestampMessage::request(0x1122, 0x3344, 0xAABBCCDD, 0x01020304, 0xDEADBEEF);
        let bytes = msg.to_bytes();

        assert_eq!(&bytes[4..6], &[0x11, 0x22]); // identifier
        assert_eq!(&bytes[6..8], &[0x33, 0x44]); // sequence
        assert_eq!(&bytes[8..12], &[0xAA, 0xBB, 0xCC, 0xDD]); // originate
        assert_eq!(&bytes[12..16], &[0x01, 0x02, 0x03, 0x04]); // receive
        assert_eq!(&bytes[16..20], &[0xDE, 0xAD, 0xBE, 0xEF]); // transmit
    }

    #[test]
    fn test_timestamp_variant_canonical_type_code() {
        for (id, seq) in [(0u16, 0u16), (1, 1), (0xFFFF, 0xFFFF)] {
            let request = TimestampMessage::request(id, seq, 1, 2, 3);
            assert_eq!(request.kind(), TimestampKind::Request);
            assert_eq!(request.header().icmp_type(), IcmpType::TIMESTAMP);
            assert_eq!(request.header().code(), 0);

            let reply = TimestampMessage::reply(id, seq, 1, 2, 3);
            assert_eq!(reply.kind(), TimestampKind::Reply);
            assert_eq!(reply.header().icmp_type(), IcmpType::TIMESTAMP_REPLY);
            assert_eq!(reply.header().code(), 0);
        }
    }

    #[test]
    fn test_timestamp_checksum_round_trip() {
        let msg = TimestampMessage::reply(77, 12, 0xFFFFFFFF, 86_400_000, 0);
        let mut bytes = msg.to_bytes();

        let stored = u16::from_be_bytes([bytes[2], bytes[3]]);
        bytes[2] = 0;
        bytes[3] = 0;

        assert_eq!(checksum(&bytes), stored);
    }

    #[test]
    fn test_timestamp_serialization_is_deterministic() {
        let msg = TimestampMessage::request(5, 6, 7, 8, 9);
        assert_eq!(msg.to_bytes(), msg.to_bytes());
    }

    #[test]
    fn test_timestamp_from_bytes_round_trip() {
        let original = TimestampMessage::request(21, 42, 100, 200, 300);
        let bytes = original.to_bytes();

        let parsed = TimestampMessage::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.kind(), TimestampKind::Request);
        assert_eq!(parsed.identifier(), 21);
        assert_eq!(parsed.sequence(), 42);
        assert_eq!(parsed.originate(), 100);
        assert_eq!(parsed.receive(), 200);
        assert_eq!(parsed.transmit(), 300);
        assert_eq!(parsed.to_bytes(), bytes);
    }

    #[test]
    fn test_timestamp_from_bytes_ignores_trailing_bytes() {
        let mut bytes = TimestampMessage::reply(1, 2, 3, 4, 5).to_bytes();
        bytes.extend_from_slice(b"trailing");

        let parsed = TimestampMessage::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.len(), 20);
        assert_eq!(parsed.to_bytes(), &bytes[..20]);
    }

    #[test]
    fn test_timestamp_from_bytes_too_short() {
        let result = TimestampMessage::from_bytes(&[0x0D, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(MessageError::TooShort(_))));
    }

    #[test]
    fn test_timestamp_from_bytes_rejects_foreign_type() {
        let mut bytes = TimestampMessage::request(1, 1, 0, 0, 0).to_bytes();
        bytes[0] = 8; // Echo Request

        let result = TimestampMessage::from_bytes(&bytes);
        assert!(matches!(result, Err(MessageError::UnexpectedType(8))));
    }

    #[test]
    fn test_timestamp_write_to_matches_to_bytes() {
        let msg = TimestampMessage::reply(3, 4, 5, 6, 7);

        let mut sink = Vec::new();
        msg.write_to(&mut sink).unwrap();
        assert_eq!(sink, msg.to_bytes());
    }

    #[test]
    fn test_timestamp_display() {
        let msg = TimestampMessage::request(1, 2, 3, 4, 5);
        assert_eq!(
            format!("{}", msg),
            "ICMP timestamp-request id=1 seq=2 orig=3 recv=4 trans=5"
        );
    }
}
