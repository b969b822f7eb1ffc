#![allow(dead_code)]

use ldpcdec::{CodeDescriptor, CodeParams};

/// Expands the low `n` bits of `word` into one byte per bit, LSB first.
pub fn unpack_bits(word: u32, n: usize) -> Vec<u8> {
    (0..n).map(|i| ((word >> i) & 1) as u8).collect()
}

/// Maps bits to channel LLRs of the given confidence (bit 0 -> positive).
pub fn to_llrs(bits: &[u8], magnitude: f64) -> Vec<f64> {
    bits.iter()
        .map(|&b| if b == 0 { magnitude } else { -magnitude })
        .collect()
}

/// Every codeword of a short code, found by brute force over the syndrome.
pub fn codewords(code: &CodeDescriptor) -> Vec<Vec<u8>> {
    let n = code.code_length();
    assert!(n <= 20, "code too long to enumerate");
    (0..1u32 << n)
        .map(|word| unpack_bits(word, n))
        .filter(|bits| code.is_codeword(bits))
        .collect()
}

// Example 2.5 in Sarah J. Johnson - Iterative Error Correction
pub fn johnson_code() -> CodeDescriptor {
    let params = CodeParams {
        code_length: 6,
        parity_bits: 4,
        compact_rows: 6,
        max_row_weight: 3,
        max_col_weight: 2,
        max_iter: 20,
    };
    CodeDescriptor::new(
        params,
        vec![vec![0, 1, 3], vec![1, 2, 4], vec![0, 4, 5], vec![2, 3, 5]],
        vec![vec![0, 2], vec![0, 1], vec![1, 3], vec![0, 3], vec![1, 2], vec![2, 3]],
    )
    .unwrap()
}

/// Accumulator with shift 2: two stored parity columns, two implicit ones.
pub fn shifted_code() -> CodeDescriptor {
    let params = CodeParams {
        code_length: 6,
        parity_bits: 4,
        compact_rows: 4,
        max_row_weight: 2,
        max_col_weight: 3,
        max_iter: 20,
    };
    CodeDescriptor::new(
        params,
        vec![vec![0, 2], vec![1, 3], vec![0, 1], vec![1, 2]],
        vec![vec![0, 2], vec![1, 2, 3], vec![0, 3], vec![1]],
    )
    .unwrap()
}
