//! Direct access to BIOM JSON documents: single fields and axis slices are
//! read from the raw text without deserializing the whole document.

pub mod axis;
pub(crate) mod cursor;
pub mod entry;
pub mod ids;
pub mod key;
pub mod slice;

pub use axis::{axis_indices, Axis, Shape};
pub use entry::{remap_sparse_entry, SparseEntry};
pub use ids::{direct_parse_ids, keep_indices};
pub use key::{direct_parse_key, direct_parse_key_span};
pub use slice::{direct_slice_data, IndexRemap, MatrixType};
