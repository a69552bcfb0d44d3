//! # Framing Codec
//!
//! The primitives every other encoder is built from:
//!
//! - **varint**: Unsigned LEB128, minimal encoding enforced on read.
//! - **varstr**: Varint length followed by raw bytes.
//! - **extensible block**: A varstr whose body is a structure. Newer
//!   writers may append fields to the end of a body; older readers skip
//!   them when reading permissively, and reject them when the layout is
//!   fully known (strict).
//!
//! Writing goes through any `io::Write`. Reading always happens from an
//! in-memory slice through [`Reader`], which is what lets us bound every
//! extensible block and validate every length before allocating.

pub mod reader;
pub mod writer;

pub use reader::Reader;
pub use writer::{write_extensible, write_varint, write_varstr, write_varstr_list};
