/// BVLC header, function codes and result codes.
pub mod bvlc;
/// Whole BACnet/IP messages.
pub mod message;
