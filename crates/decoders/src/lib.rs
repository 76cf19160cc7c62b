pub mod tag;

pub use core_types::Decoder;
pub use tag::{normalize, TagDecoder};
