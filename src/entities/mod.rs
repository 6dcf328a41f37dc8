//! Entity records
//!
//! Each entity couples the common [`header::EntityHeader`] with its
//! type-specific fields and a static dispatch table mapping group codes
//! to field setters.  Decoding goes through
//! [`crate::codec::field::decode_record`]; encoding emits pairs in the
//! documented wire order with defaults suppressed.

pub mod body;
pub mod header;
pub mod mline;
pub mod ole2frame;

pub use body::Body;
pub use header::EntityHeader;
pub use mline::{MLine, MLineFlags, MLineJustification};
pub use ole2frame::{Ole2Frame, OleObjectType};
