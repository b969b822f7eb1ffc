//! Compiled-in (16,8) code and self-test vectors.
//!
//! The data part of H is the cyclic weight-3 pattern `{j, j+1, j+3} mod 8`
//! (no 4-cycles), followed by a dual-diagonal accumulator that is not stored
//! in the tables. Tables use the code design tool's layout: column-major,
//! 1-based, 0 for padding.

use crate::descriptor::{CodeDescriptor, CodeParams};
use crate::error::LdpcError;
use crate::selftest::TestVectors;

pub const CODE_LENGTH: usize = 16;
pub const PARITY_BITS: usize = 8;
pub const COMPACT_ROWS: usize = 8;
pub const MAX_ROW_WEIGHT: usize = 3;
pub const MAX_COL_WEIGHT: usize = 3;
pub const MAX_ITER: usize = 50;

pub const H_ROWS: [u16; PARITY_BITS * MAX_ROW_WEIGHT] = [
    1, 1, 2, 1, 2, 3, 4, 5, //
    6, 2, 3, 3, 4, 5, 6, 7, //
    8, 7, 8, 4, 5, 6, 7, 8,
];

pub const H_COLS: [u16; COMPACT_ROWS * MAX_COL_WEIGHT] = [
    1, 2, 3, 4, 5, 1, 2, 1, //
    2, 3, 4, 5, 6, 6, 7, 3, //
    4, 5, 6, 7, 8, 7, 8, 8,
];

// Codeword 1011 0010 | 1101 0110 on the channel, symbol 2 received with the
// wrong sign at low confidence.
pub const TEST_INPUT: [f64; CODE_LENGTH] = [
    -2.3, 1.9, 0.4, -2.7, 1.6, 2.2, -1.8, 2.5, //
    -1.7, -2.9, 2.0, -1.5, 2.4, -1.6, -2.1, 2.8,
];

pub const TEST_OUTPUT: [u8; CODE_LENGTH] = [
    1, 0, 1, 1, 0, 0, 1, 0, //
    1, 1, 0, 1, 0, 1, 1, 0,
];

pub const CODE_PARAMS: CodeParams = CodeParams {
    code_length: CODE_LENGTH,
    parity_bits: PARITY_BITS,
    compact_rows: COMPACT_ROWS,
    max_row_weight: MAX_ROW_WEIGHT,
    max_col_weight: MAX_COL_WEIGHT,
    max_iter: MAX_ITER,
};

pub fn code() -> Result<CodeDescriptor, LdpcError> {
    CodeDescriptor::from_tables(CODE_PARAMS, &H_ROWS, &H_COLS)
}

pub fn test_vectors() -> TestVectors {
    TestVectors {
        input: TEST_INPUT.to_vec(),
        expected: TEST_OUTPUT.to_vec(),
    }
}
