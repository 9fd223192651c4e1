#![forbid(unsafe_code)]

//! Terminal control codes.
//!
//! The C0 catalogue is exposed for callers that want to dispatch on the
//! single-byte chunks a line-mode [`Tty`](crate::Tty) emits. The byte-string
//! constants below the catalogue cover the common cases directly: compare a
//! returned chunk against [`INTERRUPT`], [`END_OF_FILE`], and friends.

/// Null.
pub const NUL: u8 = 0x00;
/// Start of header.
pub const SOH: u8 = 0x01;
/// Start of text.
pub const STX: u8 = 0x02;
/// End of text (`^C`).
pub const ETX: u8 = 0x03;
/// End of transmission (`^D`).
pub const EOT: u8 = 0x04;
/// Enquire.
pub const ENQ: u8 = 0x05;
/// Acknowledge.
pub const ACK: u8 = 0x06;
/// Bell.
pub const BEL: u8 = 0x07;
/// Backspace.
pub const BS: u8 = 0x08;
/// Horizontal tab.
pub const TAB: u8 = 0x09;
/// Line feed.
pub const LF: u8 = 0x0A;
/// Vertical tab.
pub const VT: u8 = 0x0B;
/// Form feed.
pub const FF: u8 = 0x0C;
/// Carriage return.
pub const CR: u8 = 0x0D;
/// Shift out.
pub const SO: u8 = 0x0E;
/// Shift in.
pub const SI: u8 = 0x0F;
/// Data link escape.
pub const DLE: u8 = 0x10;
/// Device control 1.
pub const DC1: u8 = 0x11;
/// Device control 2.
pub const DC2: u8 = 0x12;
/// Device control 3.
pub const DC3: u8 = 0x13;
/// Device control 4.
pub const DC4: u8 = 0x14;
/// Negative acknowledge.
pub const NAK: u8 = 0x15;
/// Synchronize.
pub const SYN: u8 = 0x16;
/// End transmission block.
pub const ETB: u8 = 0x17;
/// Cancel.
pub const CAN: u8 = 0x18;
/// End of medium.
pub const EM: u8 = 0x19;
/// Substitute (`^Z`).
pub const SUB: u8 = 0x1A;
/// Escape.
pub const ESC: u8 = 0x1B;
/// File separator (`^\`).
pub const FS: u8 = 0x1C;
/// Group separator.
pub const GS: u8 = 0x1D;
/// Record separator.
pub const RS: u8 = 0x1E;
/// Unit separator.
pub const US: u8 = 0x1F;
/// Delete.
pub const DEL: u8 = 0x7F;

// Control bytes are always emitted as their own chunk, so consumers can
// match whole chunks against these without scanning.

/// `^C`, emitted as its own chunk.
pub const INTERRUPT: &[u8] = b"\x03";
/// `^D`, emitted as its own chunk.
pub const END_OF_FILE: &[u8] = b"\x04";
/// `^Z`, emitted as its own chunk.
pub const SUSPEND: &[u8] = b"\x1a";
/// `^\`, emitted as its own chunk.
pub const QUIT: &[u8] = b"\x1c";

/// Carriage return, emitted as its own chunk.
pub const CARRIAGE_RETURN: &[u8] = b"\r";
/// Line feed, emitted as its own chunk.
pub const NEW_LINE: &[u8] = b"\n";
