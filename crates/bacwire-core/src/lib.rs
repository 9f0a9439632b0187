//! BACnet wire codec in pure Rust.
//!
//! `bacwire-core` encodes and decodes the BACnet tag-length-value format,
//! application values, APDU headers, NPDU headers and the argument layouts of
//! the standard services. All operations work on caller-owned buffers through
//! the [`Reader`](encoding::reader::Reader) and
//! [`Writer`](encoding::writer::Writer) cursors and never touch shared state.
//!
//! # Feature flags
//!
//! - **`std`** (default): enables `std::error::Error` implementations.
//! - **`serde`**: derives `Serialize`/`Deserialize` on values, addresses and
//!   decoded service structures.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU headers for the seven PDU kinds.
pub mod apdu;
/// Cursor types, the tag codec and the primitive codec.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// NPDU (network layer) header codec.
pub mod npdu;
/// Service request and acknowledgement codecs plus the application value codec.
pub mod services;
/// BACnet data types: object identifiers, values, addresses and enumerations.
pub mod types;

pub use error::{DecodeError, EncodeError};
pub use services::value_codec::MAX_NESTING_DEPTH;

/// Array index sentinel meaning "no index / whole array".
pub const BACNET_ARRAY_ALL: u32 = 0xFFFF_FFFF;
/// Priority sentinel meaning "no priority supplied".
pub const BACNET_NO_PRIORITY: u8 = 0;
/// Lowest (most important) command priority.
pub const BACNET_MIN_PRIORITY: u8 = 1;
/// Highest (least important) command priority.
pub const BACNET_MAX_PRIORITY: u8 = 16;
/// Largest representable object instance (22 bits).
pub const BACNET_MAX_INSTANCE: u32 = 0x3F_FFFF;
/// Largest representable object type (10 bits).
pub const BACNET_MAX_OBJECT: u16 = 0x3FF;
