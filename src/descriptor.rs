use std::collections::HashSet;

use serde::Deserialize;

use crate::error::LdpcError;

/// Scalar parameters of an LDPC code as emitted by the code design tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CodeParams {
    pub code_length: usize,
    pub parity_bits: usize,
    /// Number of columns held in the column table. Columns past this point
    /// belong to the implicit parity accumulator.
    pub compact_rows: usize,
    pub max_row_weight: usize,
    pub max_col_weight: usize,
    pub max_iter: usize,
}

/// How the parity part of H is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParityLayout {
    /// Every edge of H is listed in the tables.
    Explicit,
    /// The last `code_length - compact_rows` columns form an accumulator that
    /// is not stored: implicit column `p` joins check `p` and check
    /// `p + max(shift, 1)`.
    Staircase { shift: usize },
}

impl CodeParams {
    fn layout(&self) -> Result<ParityLayout, LdpcError> {
        if self.parity_bits == 0 || self.code_length <= self.parity_bits {
            return Err(LdpcError::Dimensions(format!(
                "code length {} with {} parity bits",
                self.code_length, self.parity_bits
            )));
        }
        if self.max_iter == 0 {
            return Err(LdpcError::ZeroIterations);
        }
        let data_length = self.code_length - self.parity_bits;
        if self.compact_rows == self.code_length {
            Ok(ParityLayout::Explicit)
        } else if self.compact_rows >= data_length && self.compact_rows < self.code_length {
            Ok(ParityLayout::Staircase {
                shift: self.parity_bits + self.compact_rows - self.code_length,
            })
        } else {
            Err(LdpcError::Dimensions(format!(
                "{} stored columns for a code of length {} with {} parity bits",
                self.compact_rows, self.code_length, self.parity_bits
            )))
        }
    }
}

/// Immutable description of a parity-check matrix.
///
/// The adjacency held here is already expanded: implicit accumulator edges
/// are appended to the stored ones, so `check_neighbors()[c]` is the full
/// row `c` of H. A descriptor is validated once at construction and may be
/// shared read-only between any number of decode sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct CodeDescriptor {
    params: CodeParams,
    shift: usize,
    layout: ParityLayout,
    rows: Vec<Vec<usize>>,
    cols: Vec<Vec<usize>>,
    check_sockets: Vec<Vec<usize>>,
    variable_sockets: Vec<Vec<usize>>,
}

impl CodeDescriptor {
    /// Builds a descriptor from 0-based index lists. `rows[c]` holds the
    /// stored variables of check `c`, `cols[v]` the checks of stored column `v`.
    pub fn new(
        params: CodeParams,
        rows: Vec<Vec<usize>>,
        cols: Vec<Vec<usize>>,
    ) -> Result<Self, LdpcError> {
        let layout = params.layout()?;
        if rows.len() != params.parity_bits {
            return Err(LdpcError::TableSize {
                table: "row",
                expected: params.parity_bits,
                actual: rows.len(),
            });
        }
        if cols.len() != params.compact_rows {
            return Err(LdpcError::TableSize {
                table: "column",
                expected: params.compact_rows,
                actual: cols.len(),
            });
        }

        for (check, row) in rows.iter().enumerate() {
            if row.len() > params.max_row_weight {
                return Err(LdpcError::RowWeight {
                    check,
                    weight: row.len(),
                    max: params.max_row_weight,
                });
            }
            let mut seen = HashSet::new();
            for &variable in row {
                if variable >= params.compact_rows {
                    return Err(LdpcError::VariableOutOfRange {
                        check,
                        variable,
                        limit: params.compact_rows,
                    });
                }
                if !seen.insert(variable) {
                    return Err(LdpcError::DuplicateEdge { check, variable });
                }
            }
        }

        for (variable, col) in cols.iter().enumerate() {
            if col.len() > params.max_col_weight {
                return Err(LdpcError::ColumnWeight {
                    variable,
                    weight: col.len(),
                    max: params.max_col_weight,
                });
            }
            let mut seen = HashSet::new();
            for &check in col {
                if check >= params.parity_bits {
                    return Err(LdpcError::CheckOutOfRange {
                        variable,
                        check,
                        limit: params.parity_bits,
                    });
                }
                if !seen.insert(check) {
                    return Err(LdpcError::DuplicateEdge { check, variable });
                }
            }
        }

        let (shift, rows, cols) = match layout {
            ParityLayout::Explicit => (0, rows, cols),
            ParityLayout::Staircase { shift } => {
                let (rows, cols) = expand_staircase(&params, shift, rows, cols);
                (shift, rows, cols)
            }
        };

        if let Some((check, row)) = rows.iter().enumerate().find(|(_, r)| r.len() < 2) {
            return Err(LdpcError::DegenerateCheck {
                check,
                degree: row.len(),
            });
        }

        let (check_sockets, variable_sockets) = resolve_sockets(&rows, &cols)?;

        Ok(CodeDescriptor {
            params,
            shift,
            layout,
            rows,
            cols,
            check_sockets,
            variable_sockets,
        })
    }

    /// Builds a descriptor from the design tool's tables: `h_rows` is
    /// `parity_bits x max_row_weight` and `h_cols` is
    /// `compact_rows x max_col_weight`, both column-major with 1-based
    /// entries and `0` as padding.
    pub fn from_tables(
        params: CodeParams,
        h_rows: &[u16],
        h_cols: &[u16],
    ) -> Result<Self, LdpcError> {
        let rows = unpack_table("h_rows", h_rows, params.parity_bits, params.max_row_weight)?;
        let cols = unpack_table("h_cols", h_cols, params.compact_rows, params.max_col_weight)?;
        Self::new(params, rows, cols)
    }

    pub fn params(&self) -> &CodeParams {
        &self.params
    }

    pub fn code_length(&self) -> usize {
        self.params.code_length
    }

    pub fn parity_bits(&self) -> usize {
        self.params.parity_bits
    }

    pub fn data_length(&self) -> usize {
        self.params.code_length - self.params.parity_bits
    }

    pub fn max_iter(&self) -> usize {
        self.params.max_iter
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    pub fn layout(&self) -> ParityLayout {
        self.layout
    }

    /// Full rows of H: the variables each check constrains.
    pub fn check_neighbors(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Full columns of H: the checks each variable takes part in.
    pub fn variable_neighbors(&self) -> &[Vec<usize>] {
        &self.cols
    }

    pub fn check_sockets(&self) -> &[Vec<usize>] {
        &self.check_sockets
    }

    pub fn variable_sockets(&self) -> &[Vec<usize>] {
        &self.variable_sockets
    }

    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Counts the parity checks satisfied by `bits`, one hard decision per
    /// codeword symbol.
    ///
    /// # Panics
    ///
    /// Panics if `bits.len()` differs from the code length.
    pub fn satisfied_checks(&self, bits: &[u8]) -> usize {
        assert_eq!(
            bits.len(),
            self.params.code_length,
            "hard decision vector does not match the code length"
        );
        self.rows
            .iter()
            .filter(|row| row.iter().fold(0u8, |x, &v| x ^ (bits[v] & 1)) == 0)
            .count()
    }

    /// # Panics
    ///
    /// Panics if `bits.len()` differs from the code length.
    pub fn is_codeword(&self, bits: &[u8]) -> bool {
        self.satisfied_checks(bits) == self.params.parity_bits
    }
}

/// Pairs every edge's two slots. A row listing a variable whose column
/// does not list the check back is rejected.
fn resolve_sockets(
    rows: &[Vec<usize>],
    cols: &[Vec<usize>],
) -> Result<(Vec<Vec<usize>>, Vec<Vec<usize>>), LdpcError> {
    fn slot_of(list: &[usize], target: usize) -> Option<usize> {
        list.iter().position(|&n| n == target)
    }

    let check_sockets = rows
        .iter()
        .enumerate()
        .map(|(check, row)| {
            row.iter()
                .map(|&variable| {
                    slot_of(&cols[variable], check).ok_or(LdpcError::Inconsistent { check, variable })
                })
                .collect()
        })
        .collect::<Result<Vec<Vec<usize>>, _>>()?;

    let variable_sockets = cols
        .iter()
        .enumerate()
        .map(|(variable, col)| {
            col.iter()
                .map(|&check| {
                    slot_of(&rows[check], variable).ok_or(LdpcError::Inconsistent { check, variable })
                })
                .collect()
        })
        .collect::<Result<Vec<Vec<usize>>, _>>()?;

    Ok((check_sockets, variable_sockets))
}

fn unpack_table(
    table: &'static str,
    entries: &[u16],
    rows: usize,
    weight: usize,
) -> Result<Vec<Vec<usize>>, LdpcError> {
    if entries.len() != rows * weight {
        return Err(LdpcError::TableSize {
            table,
            expected: rows * weight,
            actual: entries.len(),
        });
    }
    Ok((0..rows)
        .map(|i| {
            (0..weight)
                .map(|j| entries[i + j * rows] as usize)
                .filter(|&e| e > 0)
                .map(|e| e - 1)
                .collect()
        })
        .collect())
}

fn expand_staircase(
    params: &CodeParams,
    shift: usize,
    mut rows: Vec<Vec<usize>>,
    mut cols: Vec<Vec<usize>>,
) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let step = shift.max(1);
    let first = params.compact_rows;

    for p in 0..params.code_length - first {
        let variable = first + p;
        let mut checks = vec![p];
        rows[p].push(variable);
        if p + step < params.parity_bits {
            rows[p + step].push(variable);
            checks.push(p + step);
        }
        cols.push(checks);
    }
    (rows, cols)
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(flatten)]
    params: CodeParams,
    rows: Option<Vec<Vec<usize>>>,
    cols: Option<Vec<Vec<usize>>>,
    h_rows: Option<Vec<u16>>,
    h_cols: Option<Vec<u16>>,
}

impl TryFrom<RawDescriptor> for CodeDescriptor {
    type Error = LdpcError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        match (raw.rows, raw.cols, raw.h_rows, raw.h_cols) {
            (Some(rows), Some(cols), None, None) => CodeDescriptor::new(raw.params, rows, cols),
            (None, None, Some(h_rows), Some(h_cols)) => {
                CodeDescriptor::from_tables(raw.params, &h_rows, &h_cols)
            }
            _ => Err(LdpcError::Dimensions(
                "expected either rows/cols or h_rows/h_cols".to_string(),
            )),
        }
    }
}
