//! gridmix-cache
//!
//! Local persistence for fetched series: one columnar data file and one
//! metadata file per series key, plus a keyed async lock map.
#![warn(missing_docs)]

pub mod codec;
mod locks;
mod store;

pub use codec::ColumnarSeries;
pub use locks::KeyLocks;
pub use store::{CacheStore, CachedSeries, FileStore, MemoryStore};
