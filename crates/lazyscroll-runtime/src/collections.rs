//! Maps keyed by timer, frame callback and subscriber ids.
//!
//! FxHash by default; the `std-hash` feature switches to the std hasher.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;

    pub type IdMap<V> = HashMap<u64, V>;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::FxHashMap as HashMap;

    pub type IdMap<V> = HashMap<u64, V>;
}
