//! Version dependent SQL.
//!
//! PostgreSQL 10 renamed every `xlog`/`location` catalog function and column
//! to `wal`/`lsn`. The two spellings form a closed set, so each connection
//! picks one [`Dialect`] right after it is opened and keeps it.

pub(crate) mod dialect;

pub use dialect::{Dialect, ServerVersionTag, detect_dialect};
