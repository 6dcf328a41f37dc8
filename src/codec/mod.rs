//! The generic group-code record codec

pub mod containers;
pub mod field;
pub mod pair;
pub mod reader;
pub mod recovery;
pub mod writer;

pub use containers::{BoundedSeq, PointList};
pub use field::{decode_record, DecodeCtx, FieldDispatch, FieldRule, RecordEntity, VersionGate};
pub use pair::{CodePair, GroupValueType};
pub use reader::TagReader;
pub use writer::TagWriter;
