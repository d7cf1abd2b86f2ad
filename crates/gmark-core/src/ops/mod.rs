pub mod marking_ops;
pub mod matcher;
pub mod normalize;
pub mod versioning;

pub use marking_ops::{
    add_markings, clear_markings, get_markings, is_marked, remove_markings, set_markings,
};
pub use matcher::{matches, MatchOptions};
pub use normalize::{compress, expand, is_compressed};
pub use versioning::{SnapshotVersioner, TimestampVersioner, Versioner};
