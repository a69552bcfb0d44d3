//! # Cryptographic Primitives
//!
//! Two things live here, and both are deliberately thin:
//!
//! - **hash**: SHA3-256 behind a pooled [`Hasher`], the [`Hash`] type,
//!   reference-data placeholders and the block transaction-root tree.
//! - **commitment**: The opaque [`ExcessCommitment`] value carried by
//!   confidential transactions. We serialize it; the confidential-assets
//!   layer gives it meaning.
//!
//! Don't roll your own. Everything here wraps audited implementations.

pub mod commitment;
pub mod hash;

pub use commitment::ExcessCommitment;
pub use hash::{hash_bytes, merkle_root, write_fast_hash, Hash, Hasher};
