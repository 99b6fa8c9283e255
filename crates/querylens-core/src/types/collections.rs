//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::{BTreeMap, BTreeSet};

/// SmallVec sized for the per-query table list (never more than 6).
pub type SmallVec6<T> = SmallVec<[T; 6]>;
