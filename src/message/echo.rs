//! ICMP Echo Request/Reply messages (RFC 792)
//!
//! The message pair behind `ping`: a host sends an Echo Request and the
//! target answers with an Echo Reply carrying the same identifier, sequence
//! number and payload.
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
//! |     Data ...
//! +-+-+-+-+-+-+-+-+-
//! ```
//!
//! # Key characteristics
//!
//! - Fixed part: 8 bytes (4-byte common header + identifier + sequence)
//! - Type 8 code 0 for requests, type 0 code 0 for replies
//! - Payload is opaque and may be empty
//!
//! # Examples
//!
//! ```
//! use icmp_forge::message::echo::{EchoKind, EchoMessage};
//!
//! let request = EchoMessage::request(1, 1, b"ab");
//! assert_eq!(request.kind(), EchoKind::Request);
//! assert_eq!(
//!     request.to_bytes(),
//!     [0x08, 0x00, 0x96, 0x9B, 0x00, 0x01, 0x00, 0x01, 0x61, 0x62]
//! );
//! ```

use std::fmt::{self, Formatter};
use std::io::Write;
use std::mem;

use zerocopy::byteorder::{BigEndian, U16};
use zerocopy::{FromBytes, IntoBytes, Ref, Unaligned};

use crate::message::checksum::checksum;
use crate::message::header::{IcmpHeader, IcmpType};
use crate::message::MessageError;

/// Fixed part of an echo message: common header plus identifier/sequence
#[repr(C, packed)]
#[derive(
    FromBytes, IntoBytes, Unaligned, Debug, Clone, Copy, zerocopy::KnownLayout, zerocopy::Immutable,
)]
struct EchoHeader {
    header: IcmpHeader,
    identifier: U16<BigEndian>,
    sequence: U16<BigEndian>,
}

/// Distinguishes an Echo Request from an Echo Reply.
///
/// The discriminant is derived from the header type octet; it carries no
/// state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoKind {
    Request,
    Reply,
}

/// An ICMP Echo Request or Echo Reply.
///
/// Construction computes and stores the checksum, so a message serializes to
/// the same bytes for its entire lifetime.
#[derive(Debug, Clone)]
pub struct EchoMessage {
    fixed: EchoHeader,
    payload: Vec<u8>,
}

impl EchoMessage {
    pub const FIXED_LEN: usize = mem::size_of::<EchoHeader>();

    /// Create an Echo Request (type 8, code 0).
    pub fn request(identifier: u16, sequence: u16, payload: &[u8]) -> Self {
        Self::finalize(IcmpType::ECHO, identifier, sequence, payload)
    }

    /// Create an Echo Reply (type 0, code 0).
    pub fn reply(identifier: u16, sequence: u16, payload: &[u8]) -> Self {
        Self::finalize(IcmpType::ECHO_REPLY, identifier, sequence, payload)
    }

    fn finalize(icmp_type: IcmpType, identifier: u16, sequence: u16, payload: &[u8]) -> Self {
        let mut msg = EchoMessage {
            fixed: EchoHeader {
                header: IcmpHeader::new(icmp_type, 0),
                identifier: U16::new(identifier),
                sequence: U16::new(sequence),
            },
            payload: payload.to_vec(),
        };
        let sum = checksum(&msg.to_bytes());
        msg.fixed.header.set_checksum(sum);
        msg
    }

    /// Parse an echo request/reply from received bytes.
    ///
    /// The stored checksum is kept verbatim, so re-serializing the parsed
    /// message reproduces the input bytes. Checksum validity is checked
    /// separately by [`crate::message::validate`].
    pub fn from_bytes(buf: &[u8]) -> Result<EchoMessage, MessageError> {
        let (fixed, payload) = Ref::<_, EchoHeader>::from_prefix(buf)
            .map_err(|_| MessageError::TooShort("echo message"))?;
        let fixed = *Ref::into_ref(fixed);

        match fixed.header.icmp_type() {
            IcmpType::ECHO | IcmpType::ECHO_REPLY => {}
            other => return Err(MessageError::UnexpectedType(other.into())),
        }

        Ok(EchoMessage {
            fixed,
            payload: payload.to_vec(),
        })
    }

    /// Returns whether this is a request or a reply
    #[inline]
    pub fn kind(&self) -> EchoKind {
        if self.fixed.header.icmp_type() == IcmpType::ECHO {
            EchoKind::Request
        } else {
            EchoKind::Reply
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

    /// Returns the payload
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total serialized length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        Self::FIXED_LEN + self.payload.len()
    }

    /// Serialize to the RFC 792 wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        buf.extend_from_slice(self.fixed.as_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Write the wire layout to `w`, propagating sink errors unchanged.
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), MessageError> {
        w.write_all(self.fixed.as_bytes())?;
        w.write_all(&self.payload)?;
        Ok(())
    }
}

impl fmt::Display for EchoMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} id={} seq={} len={}",
            self.header(),
            self.identifier(),
            self.sequence(),
            self.len()
        )
    }
}
