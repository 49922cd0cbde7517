pub mod error;
pub mod heap;

pub use error::HeapError;
pub use heap::{natural_order, reverse_order, Heap, Iter};
