//! Decoding of hierarchical-clustering tree files into partitions.
//!
//! The clustering tool writes one record per node:
//!
//! ```text
//! # comment
//! 1:1:1 0.0125 "17" 1
//! 1:1:2 0.0100 "18" 2
//! 1:2:1 0.0113 "4" 3
//! ```
//!
//! The first column is a colon-separated module path (coarsest level first)
//! and the last column is the 1-based node index; anything between them is
//! ignored. Decoding proceeds in three stages:
//!
//! - Parse every record into a fixed-width [`table::TreeTable`], padding
//!   shorter (jagged) paths with the module id `1`.
//! - Relabel every level below the root so ids are unique across the whole
//!   level rather than restarting within each parent module.
//! - Reorder rows by node index and validate each level with
//!   [`crate::validate_labels`].

mod table;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{Span, debug, field, instrument};

use crate::{
    error::define_error_codes,
    labeling::{LabelingError, Partition},
};

use self::table::TreeTable;

/// Errors returned while decoding a tree file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TreeFileError {
    /// The tree file does not exist.
    #[error("tree file `{path}` does not exist")]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// The tree file exists but could not be opened.
    #[error("failed to open tree file `{path}`: {source}")]
    Open {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading a line from the input failed.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number being read.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A record could not be split into a module path and a node index.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number of the record.
        line: usize,
        /// Description of what was wrong with the record.
        reason: String,
    },
    /// A record carried the node index `0`; indices are 1-based.
    #[error("node index 0 on line {line}; node indices start at 1")]
    ZeroNodeIndex {
        /// 1-based line number of the record.
        line: usize,
    },
    /// Two records named the same node.
    #[error("node {index} on line {line} was already assigned")]
    DuplicateNode {
        /// 1-based line number of the repeated record.
        line: usize,
        /// Node index that appeared twice.
        index: usize,
    },
    /// A node index lies outside `1..=N` for `N` records.
    #[error("node index {index} on line {line} exceeds the {node_count} records; indices must cover 1..={node_count}")]
    NodeIndexOutOfRange {
        /// 1-based line number of the record.
        line: usize,
        /// Offending node index.
        index: usize,
        /// Number of records in the file.
        node_count: usize,
    },
    /// The input contained no records.
    #[error("tree input contains no records")]
    NoRecords,
    /// The decoded levels broke the contiguous-id invariant.
    #[error("decoded partition is invalid: {0}")]
    InvalidPartition(#[from] LabelingError),
}

define_error_codes! {
    /// Stable codes describing [`TreeFileError`] variants.
    enum TreeFileErrorCode for TreeFileError {
        /// The tree file does not exist.
        NotFound => NotFound { .. } => "TREE_FILE_NOT_FOUND",
        /// The tree file exists but could not be opened.
        Open => Open { .. } => "TREE_FILE_OPEN",
        /// Reading a line from the input failed.
        Read => Read { .. } => "TREE_FILE_READ",
        /// A record could not be split into a module path and a node index.
        MalformedRecord => MalformedRecord { .. } => "TREE_FILE_MALFORMED_RECORD",
        /// A record carried the node index `0`.
        ZeroNodeIndex => ZeroNodeIndex { .. } => "TREE_FILE_ZERO_NODE_INDEX",
        /// Two records named the same node.
        DuplicateNode => DuplicateNode { .. } => "TREE_FILE_DUPLICATE_NODE",
        /// A node index lies outside `1..=N`.
        NodeIndexOutOfRange => NodeIndexOutOfRange { .. } => "TREE_FILE_NODE_INDEX_OUT_OF_RANGE",
        /// The input contained no records.
        NoRecords => NoRecords => "TREE_FILE_NO_RECORDS",
        /// The decoded levels broke the contiguous-id invariant.
        InvalidPartition => InvalidPartition(..) => "TREE_FILE_INVALID_PARTITION",
    }
}

/// Decodes the tree file at `path` into a [`Partition`].
///
/// # Errors
/// Returns [`TreeFileError::NotFound`] before any parsing when the file does
/// not exist, [`TreeFileError::Open`] when it cannot be opened, and the
/// errors of [`decode_tree`] otherwise.
#[instrument(
    name = "tree.decode_file",
    err,
    skip(path),
    fields(path = field::Empty),
)]
pub fn decode_tree_file(path: impl AsRef<Path>) -> Result<Partition, TreeFileError> {
    let path = path.as_ref();
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => TreeFileError::NotFound {
            path: path.to_path_buf(),
        },
        _ => TreeFileError::Open {
            path: path.to_path_buf(),
            source,
        },
    })?;
    decode_tree(BufReader::new(file))
}

/// Decodes tree records read from `reader` into a [`Partition`].
///
/// # Errors
/// Returns [`TreeFileError::MalformedRecord`], [`TreeFileError::ZeroNodeIndex`],
/// [`TreeFileError::DuplicateNode`] or [`TreeFileError::NodeIndexOutOfRange`]
/// naming the first offending line, [`TreeFileError::NoRecords`] when the
/// input holds only comments, and [`TreeFileError::InvalidPartition`] when
/// the relabelled levels are not contiguous.
///
/// # Examples
/// ```
/// use protnet_core::decode_tree;
///
/// let input = "# two modules\n1:1 0.5 \"a\" 1\n1:2 0.2 \"b\" 3\n2:1 0.3 \"c\" 2\n";
/// let partition = decode_tree(input.as_bytes()).expect("tree must decode");
/// assert_eq!(partition.level(0).map(|l| l.as_slice()), Some(&[1, 2, 1][..]));
/// assert_eq!(partition.level(1).map(|l| l.as_slice()), Some(&[1, 3, 2][..]));
/// ```
#[instrument(
    name = "tree.decode",
    err,
    skip(reader),
    fields(records = field::Empty, depth = field::Empty),
)]
pub fn decode_tree<R: BufRead>(reader: R) -> Result<Partition, TreeFileError> {
    let mut table = TreeTable::parse(reader)?;
    let span = Span::current();
    span.record("records", table.node_count());
    span.record("depth", table.depth());

    table.relabel_levels();
    let levels = table.into_levels_by_node()?;
    for (level, labels) in levels.iter().enumerate() {
        debug!(
            level,
            communities = labels.iter().copied().max().unwrap_or_default(),
            "decoded tree level"
        );
    }
    Ok(Partition::try_from_levels(levels)?)
}

/// Decodes tree records held in a string.
///
/// # Errors
/// Returns the errors of [`decode_tree`].
pub fn decode_tree_str(input: &str) -> Result<Partition, TreeFileError> {
    decode_tree(input.as_bytes())
}
