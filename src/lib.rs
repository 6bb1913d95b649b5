//! Construction and checksum validation of ICMPv4 messages
//!
//! This crate builds the two RFC 792 message pairs used for reachability and
//! time probing — Echo Request/Reply and Timestamp Request/Reply — as exact,
//! checksummed wire-format byte sequences, and re-validates the checksum of
//! packets read back from a socket. It deliberately stops at the byte
//! boundary: sockets, address resolution and send/receive loops belong to
//! the calling application.
//!
//! # Examples
//!
//! Build an Echo Request and hand its bytes to any sink:
//!
//! ```
//! use icmp_forge::{validate, EchoMessage};
//!
//! let request = EchoMessage::request(0x1234, 1, b"hi there!");
//!
//! let mut wire = Vec::new();
//! request.write_to(&mut wire).unwrap();
//! assert_eq!(wire, request.to_bytes());
//!
//! // A receiver can re-check the checksum without interpreting the body
//! assert!(validate(&wire).is_ok());
//! ```
//!
//! Parse a received buffer back into a typed message:
//!
//! ```
//! use icmp_forge::{EchoKind, IcmpMessage, TimestampMessage};
//!
//! let wire = TimestampMessage::reply(7, 1, 0, 43_200_000, 43_200_001).to_bytes();
//!
//! match IcmpMessage::from_bytes(&wire).unwrap() {
//!     IcmpMessage::Timestamp(reply) => assert_eq!(reply.receive(), 43_200_000),
//!     IcmpMessage::Echo(_) => unreachable!(),
//! }
//! ```

pub mod message;

pub use message::echo::{EchoKind, EchoMessage};
pub use message::timestamp::{TimestampKind, TimestampMessage};
pub use message::{validate, IcmpMessage, MessageError};
