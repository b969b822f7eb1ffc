use log::debug;
use serde::Deserialize;

use crate::error::LdpcError;
use crate::ldpc::Decoder;

/// One soft-input vector and the codeword it must decode to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestVectors {
    pub input: Vec<f64>,
    pub expected: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestReport {
    pub runs: usize,
    pub passed: usize,
}

impl SelfTestReport {
    pub fn is_pass(&self) -> bool {
        self.passed == self.runs
    }
}

/// Replays `vectors` through `decoder` `runs` times. A trial passes when the
/// decode converges and the converged decision equals the expected codeword.
pub fn run_self_test(
    decoder: &Decoder,
    vectors: &TestVectors,
    runs: usize,
) -> Result<SelfTestReport, LdpcError> {
    let code_length = decoder.code().code_length();
    if vectors.expected.len() != code_length {
        return Err(LdpcError::InputLength {
            expected: code_length,
            actual: vectors.expected.len(),
        });
    }

    let mut passed = 0;
    for run in 0..runs {
        let result = decoder.decode(&vectors.input)?;
        if result.converged() && result.decoded_bits() == vectors.expected.as_slice() {
            passed += 1;
        } else {
            debug!(
                "trial {} failed: {}/{} checks after {} iteration(s)",
                run,
                result.parity_check_count(),
                decoder.code().parity_bits(),
                result.iterations()
            );
        }
    }
    Ok(SelfTestReport { runs, passed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant;
    use crate::ldpc::{DecoderOptions, Strategy};

    #[test]
    fn compiled_in_vectors_pass() {
        let code = constant::code().unwrap();
        for strategy in [Strategy::SumProduct, Strategy::MinSum] {
            let options = DecoderOptions {
                strategy,
                ..Default::default()
            };
            let decoder = Decoder::new(&code, options).unwrap();
            let report = run_self_test(&decoder, &constant::test_vectors(), 100).unwrap();
            assert_eq!(report, SelfTestReport { runs: 100, passed: 100 });
            assert!(report.is_pass());
        }
    }

    #[test]
    fn wrong_expectation_fails_every_trial() {
        let code = constant::code().unwrap();
        let decoder = Decoder::new(&code, DecoderOptions::default()).unwrap();
        let mut vectors = constant::test_vectors();
        vectors.expected[0] ^= 1;
        let report = run_self_test(&decoder, &vectors, 10).unwrap();
        assert_eq!(report.passed, 0);
        assert!(!report.is_pass());
    }

    #[test]
    fn mismatched_fixture_rejected() {
        let code = constant::code().unwrap();
        let decoder = Decoder::new(&code, DecoderOptions::default()).unwrap();
        let vectors = TestVectors {
            input: vec![1.0; 16],
            expected: vec![0; 15],
        };
        assert!(matches!(
            run_self_test(&decoder, &vectors, 1),
            Err(LdpcError::InputLength { expected: 16, actual: 15 })
        ));
    }
}
