//! Readers for BIOM tables and their companion text formats.
//!
//! * [`direct`] pulls single fields and axis slices out of a BIOM JSON
//!   document without deserializing all of it.
//! * [`classic`] parses the tab-delimited "classic" OTU table.
//! * [`metadata`] loads id-keyed sample or observation mapping files.

pub mod classic;
pub mod direct;
pub mod error;
pub mod metadata;
pub mod options;
pub(crate) mod text;

pub use crate::classic::{parse_classic_table, ClassicTable, DenseMatrix};
pub use crate::direct::{
    axis_indices, direct_parse_ids, direct_parse_key, direct_parse_key_span, direct_slice_data,
    keep_indices, remap_sparse_entry, Axis, IndexRemap, MatrixType, Shape, SparseEntry,
};
pub use crate::error::{Error, ErrorKind, Location};
pub use crate::metadata::kind::{ObservationMetadata, ObservationMetadataType};
pub use crate::metadata::{MetadataMap, MetadataRecord};
pub use crate::options::{ClassicTableOptions, ElementType, MetadataMapOptions, Transform};

pub type Result<T> = std::result::Result<T, Error>;
