//! ICMPv4 message construction and validation
//!
//! Each message family follows the same construction path: the factory
//! serializes the header (checksum field zero) and body, runs the Internet
//! checksum over the full byte sequence, then patches the result into the
//! header. From that point the message is immutable and serializes to the
//! same bytes on every call.
//!
//! Received packets come back in through two doors: [`IcmpMessage::from_bytes`]
//! dispatches a raw buffer to the matching message family, and [`validate`]
//! re-checks a buffer's stored checksum without interpreting the body.
//!
//! # Examples
//!
//! ```
//! use icmp_forge::message::{validate, IcmpMessage};
//! use icmp_forge::message::echo::EchoMessage;
//!
//! let bytes = EchoMessage::request(1, 1, b"ab").to_bytes();
//! assert!(validate(&bytes).is_ok());
//!
//! match IcmpMessage::from_bytes(&bytes).unwrap() {
//!     IcmpMessage::Echo(echo) => assert_eq!(echo.sequence(), 1),
//!     IcmpMessage::Timestamp(_) => unreachable!(),
//! }
//! ```

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

use crate::message::checksum::checksum;
use crate::message::echo::EchoMessage;
use crate::message::header::{IcmpHeader, IcmpType};
use crate::message::timestamp::TimestampMessage;

pub mod checksum;
pub mod echo;
pub mod header;
pub mod timestamp;

#[derive(Debug, Error)]
pub enum MessageError {
    /// Sink write failed; the underlying error is passed through untouched.
    #[error("sink write failed")]
    Sink(#[from] io::Error),
    /// A received packet's stored checksum does not match the recomputed
    /// value. Informational; indicates corruption or a non-ICMP buffer.
    #[error("checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { stored: u16, computed: u16 },
    #[error("buffer too short for {0}")]
    TooShort(&'static str),
    #[error("unexpected icmp type {0}")]
    UnexpectedType(u8),
}

/// Union of the message families this crate models.
///
/// The variant tag is the only structural difference between families; the
/// request/reply distinction lives inside each variant as its kind.
#[derive(Debug, Clone)]
pub enum IcmpMessage {
    Echo(EchoMessage),
    Timestamp(TimestampMessage),
}

impl IcmpMessage {
    /// Parse a received buffer, dispatching on the leading type octet.
    ///
    /// Types 8 and 0 parse as echo, 13 and 14 as timestamp; anything else is
    /// reported as [`MessageError::UnexpectedType`].
    pub fn from_bytes(buf: &[u8]) -> Result<IcmpMessage, MessageError> {
        let first = *buf.first().ok_or(MessageError::TooShort("icmp header"))?;

        match IcmpType(first) {
            IcmpType::ECHO | IcmpType::ECHO_REPLY => {
                Ok(IcmpMessage::Echo(EchoMessage::from_bytes(buf)?))
            }
            IcmpType::TIMESTAMP | IcmpType::TIMESTAMP_REPLY => {
                Ok(IcmpMessage::Timestamp(TimestampMessage::from_bytes(buf)?))
            }
            _ => Err(MessageError::UnexpectedType(first)),
        }
    }

    /// Returns the common header
    #[inline]
    pub fn header(&self) -> IcmpHeader {
        match self {
            IcmpMessage::Echo(echo) => echo.header(),
            IcmpMessage::Timestamp(ts) => ts.header(),
        }
    }

    /// Total serialized length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IcmpMessage::Echo(echo) => echo.len(),
            IcmpMessage::Timestamp(ts) => ts.len(),
        }
    }

    /// Serialize to the RFC 792 wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            IcmpMessage::Echo(echo) => echo.to_bytes(),
            IcmpMessage::Timestamp(ts) => ts.to_bytes(),
        }
    }

    /// Write the wire layout to `w`, propagating sink errors unchanged.
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), MessageError> {
        match self {
            IcmpMessage::Echo(echo) => echo.write_to(w),
            IcmpMessage::Timestamp(ts) => ts.write_to(w),
        }
    }
}

impl fmt::Display for IcmpMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcmpMessage::Echo(echo) => write!(f, "{}", echo),
            IcmpMessage::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

/// Re-validate the checksum of a received packet.
///
/// Recomputes the Internet checksum over `buf` with the checksum field
/// treated as zero and compares it against the stored value. A mismatch is
/// informational; no corrective action is taken.
pub fn validate(buf: &[u8]) -> Result<(), MessageError> {
    if buf.len() < IcmpHeader::FIXED_LEN {
        return Err(MessageError::TooShort("icmp header"));
    }

    let stored = u16::from_be_bytes([buf[2], buf[3]]);

    let mut scratch = buf.to_vec();
    scratch[2] = 0;
    scratch[3] = 0;
    let computed = checksum(&scratch);

    if stored != computed {
        return Err(MessageError::ChecksumMismatch { stored, computed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_constructed_messages() {
        let echo = EchoMessage::request(1, 1, b"ab").to_bytes();
        assert!(validate(&echo).is_ok());

        let ts = TimestampMessage::reply(9, 9, 1, 2, 3).to_bytes();
        assert!(validate(&ts).is_ok());
    }

    #[test]
    fn test_validate_reports_corrupted_payload() {
        let mut bytes = EchoMessage::request(1, 1, b"ab").to_bytes();
        let stored = u16::from_be_bytes([bytes[2], bytes[3]]);

        bytes[9] ^= 0x01; // flip one payload bit

        match validate(&bytes) {
            Err(MessageError::ChecksumMismatch { stored: s, computed }) => {
                assert_eq!(s, stored);
                assert_ne!(computed, stored);
            }
            other => panic!("expected checksum mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_too_short() {
        assert!(matches!(
            validate(&[0x08, 0x00, 0x00]),
            Err(MessageError::TooShort(_))
        ));
    }

    #[test]
    fn test_union_dispatches_on_type_octet() {
        let echo = EchoMessage::reply(4, 2, b"x").to_bytes();
        assert!(matches!(
            IcmpMessage::from_bytes(&echo),
            Ok(IcmpMessage::Echo(_))
        ));

        let ts = TimestampMessage::request(4, 2, 0, 0, 0).to_bytes();
        assert!(matches!(
            IcmpMessage::from_bytes(&ts),
            Ok(IcmpMessage::Timestamp(_))
        ));
    }

    #[test]
    fn test_union_rejects_unknown_type() {
        // Destination Unreachable is outside this crate's scope
        let buf = [3u8, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            IcmpMessage::from_bytes(&buf),
            Err(MessageError::UnexpectedType(3))
        ));

        assert!(matches!(
            IcmpMessage::from_bytes(&[]),
            Err(MessageError::TooShort(_))
        ));
    }

    #[test]
    fn test_union_serialization_matches_variant() {
        let echo = EchoMessage::request(10, 20, b"payload");
        let expected = echo.to_bytes();

        let msg = IcmpMessage::from_bytes(&expected).unwrap();
        assert_eq!(msg.to_bytes(), expected);
        assert_eq!(msg.len(), expected.len());
        assert_eq!(msg.header().checksum(), echo.header().checksum());

        let mut sink = Vec::new();
        msg.write_to(&mut sink).unwrap();
        assert_eq!(sink, expected);
    }

    #[test]
    fn test_error_display() {
        let err = MessageError::ChecksumMismatch {
            stored: 0x969B,
            computed: 0x1234,
        };
        assert_eq!(
            format!("{}", err),
            "checksum mismatch: stored 0x969b, computed 0x1234"
        );

        assert_eq!(
            format!("{}", MessageError::TooShort("echo message")),
            "buffer too short for echo message"
        );
        assert_eq!(
            format!("{}", MessageError::UnexpectedType(3)),
            "unexpected icmp type 3"
        );
    }
}
