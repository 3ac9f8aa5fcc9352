//! Fixed-width table of module paths used while decoding tree files.

use std::io::BufRead;

use super::TreeFileError;

/// Module id used to pad paths shorter than the deepest record.
const PADDING_MODULE: usize = 1;

struct Record {
    line: usize,
    path: Vec<usize>,
    node: usize,
}

/// Module paths padded to a common depth, stored row-major in file order.
#[derive(Debug)]
pub(super) struct TreeTable {
    depth: usize,
    cells: Vec<usize>,
    nodes: Vec<usize>,
    lines: Vec<usize>,
}

impl TreeTable {
    pub(super) fn parse<R: BufRead>(reader: R) -> Result<Self, TreeFileError> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let text = line.map_err(|source| TreeFileError::Read {
                line: line_number,
                source,
            })?;
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            records.push(parse_record(line_number, trimmed)?);
        }
        if records.is_empty() {
            return Err(TreeFileError::NoRecords);
        }

        let depth = records
            .iter()
            .map(|record| record.path.len())
            .max()
            .unwrap_or(1);
        let mut cells = vec![PADDING_MODULE; records.len() * depth];
        let mut nodes = Vec::with_capacity(records.len());
        let mut lines = Vec::with_capacity(records.len());
        for (row, record) in records.into_iter().enumerate() {
            let start = row * depth;
            cells[start..start + record.path.len()].copy_from_slice(&record.path);
            nodes.push(record.node);
            lines.push(record.line);
        }
        Ok(Self {
            depth,
            cells,
            nodes,
            lines,
        })
    }

    pub(super) fn depth(&self) -> usize {
        self.depth
    }

    pub(super) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn cell(&self, row: usize, level: usize) -> usize {
        self.cells[row * self.depth + level]
    }

    /// Makes module ids unique across each level.
    ///
    /// The tool numbers child modules from 1 within every parent. Walking the
    /// rows in file order, each change of the (already relabelled) parent id
    /// advances an offset by the previous row's local id, so the children of
    /// later parents continue the numbering of earlier ones.
    pub(super) fn relabel_levels(&mut self) {
        for level in 1..self.depth {
            let mut previous_local = PADDING_MODULE;
            let mut previous_parent = PADDING_MODULE;
            let mut offset = 0;
            for row in 0..self.node_count() {
                let local = self.cell(row, level);
                let parent = self.cell(row, level - 1);
                if parent != previous_parent {
                    offset += previous_local;
                }
                self.cells[row * self.depth + level] = local + offset;
                previous_local = local;
                previous_parent = parent;
            }
        }
    }

    /// Splits the table into per-level id vectors ordered by node index.
    pub(super) fn into_levels_by_node(self) -> Result<Vec<Vec<usize>>, TreeFileError> {
        let node_count = self.node_count();
        let mut row_of_node: Vec<Option<usize>> = vec![None; node_count];
        for (row, (&index, &line)) in self.nodes.iter().zip(&self.lines).enumerate() {
            let slot = row_of_node
                .get_mut(index - 1)
                .ok_or(TreeFileError::NodeIndexOutOfRange {
                    line,
                    index,
                    node_count,
                })?;
            if slot.is_some() {
                return Err(TreeFileError::DuplicateNode { line, index });
            }
            *slot = Some(row);
        }
        // Every slot is filled: `node_count` distinct indices within `1..=node_count`.
        let order: Vec<usize> = row_of_node.into_iter().flatten().collect();

        Ok((0..self.depth)
            .map(|level| order.iter().map(|&row| self.cell(row, level)).collect())
            .collect())
    }
}

fn parse_record(line: usize, text: &str) -> Result<Record, TreeFileError> {
    let mut columns = text.split_whitespace();
    let (Some(path_column), Some(node_column)) = (columns.next(), columns.next_back()) else {
        return Err(TreeFileError::MalformedRecord {
            line,
            reason: "expected a module path followed by a node index".to_owned(),
        });
    };

    let path = path_column
        .split(':')
        .map(|segment| parse_module(line, segment))
        .collect::<Result<Vec<_>, _>>()?;
    let node = node_column
        .parse::<usize>()
        .map_err(|error| TreeFileError::MalformedRecord {
            line,
            reason: format!("node index `{node_column}` is not an integer: {error}"),
        })?;
    if node == 0 {
        return Err(TreeFileError::ZeroNodeIndex { line });
    }
    Ok(Record { line, path, node })
}

fn parse_module(line: usize, segment: &str) -> Result<usize, TreeFileError> {
    match segment.parse::<usize>() {
        Ok(0) => Err(TreeFileError::MalformedRecord {
            line,
            reason: "module ids must be positive".to_owned(),
        }),
        Ok(module) => Ok(module),
        Err(error) => Err(TreeFileError::MalformedRecord {
            line,
            reason: format!("module id `{segment}` is not an integer: {error}"),
        }),
    }
}
