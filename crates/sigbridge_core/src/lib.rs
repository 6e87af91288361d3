//! Value marshaling between bus type signatures and resource property bags.

/// Signature parsing, the named type registry, and both translation directions.
pub mod codec;
