mod cache;
mod loader;

pub use cache::PairCache;
pub use loader::{PairSet, PairSetStats, load_pairs, read_pairs};
