//! Small deterministic inputs shared by protnet tests and benchmarks.
//!
//! Everything here is plain data (`Vec<usize>`, row vectors, triples and
//! text) so the crate stays independent of `protnet-core`.

use std::fmt::Write as _;

/// Concatenates `(id, length)` runs into a labeling.
///
/// # Examples
/// ```
/// use protnet_test_support::fixtures::blocks;
///
/// assert_eq!(blocks(&[(1, 2), (2, 1), (1, 1)]), vec![1, 1, 2, 1]);
/// ```
#[must_use]
pub fn blocks(runs: &[(usize, usize)]) -> Vec<usize> {
    runs.iter()
        .flat_map(|&(id, len)| std::iter::repeat_n(id, len))
        .collect()
}

/// Adjacency rows of disjoint unit-weight cliques of the given sizes, with
/// an empty diagonal.
///
/// # Examples
/// ```
/// use protnet_test_support::fixtures::block_diagonal_adjacency;
///
/// let rows = block_diagonal_adjacency(&[2, 1]);
/// assert_eq!(rows, vec![
///     vec![0.0, 1.0, 0.0],
///     vec![1.0, 0.0, 0.0],
///     vec![0.0, 0.0, 0.0],
/// ]);
/// ```
#[must_use]
pub fn block_diagonal_adjacency(sizes: &[usize]) -> Vec<Vec<f64>> {
    let block_of: Vec<usize> = sizes
        .iter()
        .enumerate()
        .flat_map(|(block, &size)| std::iter::repeat_n(block, size))
        .collect();
    block_of
        .iter()
        .enumerate()
        .map(|(row, &row_block)| {
            block_of
                .iter()
                .enumerate()
                .map(|(col, &col_block)| {
                    if row != col && row_block == col_block {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Unit-weight triples of the path `1 - 2 - ... - n`.
#[must_use]
pub fn path_triples(n: usize) -> Vec<(usize, usize, u64)> {
    (1..n).map(|node| (node, node + 1, 1)).collect()
}

/// Unit-weight triples of the cycle `1 - 2 - ... - n - 1`; needs `n >= 3`.
#[must_use]
pub fn cycle_triples(n: usize) -> Vec<(usize, usize, u64)> {
    let mut triples = path_triples(n);
    if n >= 3 {
        triples.push((n, 1, 1));
    }
    triples
}

/// Unit-weight triples of the complete graph on `1..=n`.
#[must_use]
pub fn complete_triples(n: usize) -> Vec<(usize, usize, u64)> {
    (1..=n)
        .flat_map(|left| (left + 1..=n).map(move |right| (left, right, 1)))
        .collect()
}

/// Renders `(path, node_index)` records in the Infomap `.tree` layout
/// `path flow "name" index`, preceded by a header comment.
///
/// # Examples
/// ```
/// use protnet_test_support::fixtures::tree_file_text;
///
/// let text = tree_file_text(&[("1:1", 2), ("1:2", 1)]);
/// assert!(text.starts_with('#'));
/// assert!(text.contains("1:2 0.5 \"n1\" 1"));
/// ```
#[must_use]
pub fn tree_file_text(records: &[(&str, usize)]) -> String {
    let mut text = String::from("# Codelength = 1.0 bits.\n");
    let flow = if records.is_empty() {
        0.0
    } else {
        1.0 / f64::from(u32::try_from(records.len()).unwrap_or(u32::MAX))
    };
    for (path, index) in records {
        let _ = writeln!(text, "{path} {flow} \"n{index}\" {index}");
    }
    text
}

/// Tree text of a three-level hierarchy over six nodes listed out of index
/// order, together with the labelings it decodes to (coarsest first).
#[must_use]
pub fn three_level_tree() -> (String, Vec<Vec<usize>>) {
    let text = tree_file_text(&[
        ("1:1:1", 3),
        ("1:1:2", 1),
        ("1:2:1", 2),
        ("2:1:1", 6),
        ("2:1:2", 4),
        ("2:2:1", 5),
    ]);
    let levels = vec![
        vec![1, 1, 1, 2, 2, 2],
        vec![1, 2, 1, 3, 4, 3],
        vec![2, 3, 1, 5, 6, 4],
    ];
    (text, levels)
}
