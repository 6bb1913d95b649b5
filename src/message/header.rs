//! ICMP common header (RFC 792)
//!
//! Every ICMPv4 message opens with the same 4-byte header:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Type      |     Code      |          Checksum             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The identifier/sequence words that follow in echo and timestamp messages
//! belong to the message body, not this header. The header performs no
//! validation of type/code pairs; the message factories fix the canonical
//! values for each variant.
//!
//! # Examples
//!
//! ```
//! use icmp_forge::message::header::{IcmpHeader, IcmpType};
//! use zerocopy::IntoBytes;
//!
//! let header = IcmpHeader::new(IcmpType::ECHO, 0);
//! assert_eq!(header.as_bytes(), &[0x08, 0x00, 0x00, 0x00]);
//! assert_eq!(format!("{}", header.icmp_type()), "echo-request");
//! ```

use std::fmt::{self, Formatter};
use std::mem;

use zerocopy::byteorder::{BigEndian, U16};
use zerocopy::{FromBytes, IntoBytes, Unaligned};

/// ICMP Message Type
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    FromBytes,
    IntoBytes,
    Unaligned,
    zerocopy::Immutable,
    zerocopy::KnownLayout,
)]
#[repr(transparent)]
pub struct IcmpType(pub u8);

impl IcmpType {
    pub const ECHO_REPLY: IcmpType = IcmpType(0); // Echo Reply
    pub const ECHO: IcmpType = IcmpType(8); // Echo Request
    pub const TIMESTAMP: IcmpType = IcmpType(13); // Timestamp Request
    pub const TIMESTAMP_REPLY: IcmpType = IcmpType(14); // Timestamp Reply
}

impl From<u8> for IcmpType {
    fn from(value: u8) -> Self {
        IcmpType(value)
    }
}

impl From<IcmpType> for u8 {
    fn from(value: IcmpType) -> Self {
        value.0
    }
}

impl fmt::Display for IcmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self.0 {
            0 => "echo-reply",
            8 => "echo-request",
            13 => "timestamp-request",
            14 => "timestamp-reply",
            _ => return write!(f, "unknown-{}", self.0),
        };
        write!(f, "{}", s)
    }
}

/// ICMP common header as defined in RFC 792
///
/// The checksum field is stored big-endian and is only meaningful once it has
/// been computed over the full serialized message with this field zeroed.
#[repr(C, packed)]
#[derive(
    FromBytes, IntoBytes, Unaligned, Debug, Clone, Copy, zerocopy::KnownLayout, zerocopy::Immutable,
)]
pub struct IcmpHeader {
    icmp_type: IcmpType,
    code: u8,
    checksum: U16<BigEndian>,
}

impl IcmpHeader {
    pub const FIXED_LEN: usize = mem::size_of::<IcmpHeader>();

    /// Create a header with the checksum field zeroed.
    pub fn new(icmp_type: IcmpType, code: u8) -> Self {
        IcmpHeader {
            icmp_type,
            code,
            checksum: U16::ZERO,
        }
    }

    /// Returns the ICMP message type
    #[inline]
    pub fn icmp_type(&self) -> IcmpType {
        self.icmp_type
    }

    /// Returns the ICMP code
    #[inline]
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Returns the checksum
    #[inline]
    pub fn checksum(&self) -> u16 {
        self.checksum.get()
    }

    /// Store a computed checksum. Any later field mutation invalidates it.
    #[inline]
    pub(crate) fn set_checksum(&mut self, sum: u16) {
        self.checksum = U16::new(sum);
    }
}

impl fmt::Display for IcmpHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ICMP {}", self.icmp_type())?;
        if self.code() != 0 {
            write!(f, " code={}", self.code())?;
        }
        Ok(())
    }
}
