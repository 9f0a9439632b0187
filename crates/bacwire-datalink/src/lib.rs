//! Data-link framing for `bacwire`: BACnet/IP virtual link control messages
//! and station addresses for B/IP and MS/TP.

pub mod address;
pub mod bip;
pub mod error;

pub use address::{bip_mac, from_bip_mac, DataLinkAddress, BIP_MAC_LEN};
pub use bip::bvlc::{
    BvlcFunction, BvlcHeader, BvlcResultCode, BIP_MAX_FRAME_LEN, BIP_MAX_NPDU, BVLC_HEADER_LEN,
    BVLC_TYPE_BIP,
};
pub use bip::message::{BroadcastDistributionEntry, BvlcMessage, ForeignDeviceTableEntry};
pub use error::BvlcError;
