mod test_util;

use ldpcdec::{constant, CodeDescriptor, Decoder, DecoderOptions, LdpcError, Strategy, TannerGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_util::*;

const STRATEGIES: [Strategy; 2] = [Strategy::SumProduct, Strategy::MinSum];

fn decoder(code: &CodeDescriptor, strategy: Strategy) -> Decoder<'_> {
    Decoder::new(
        code,
        DecoderOptions {
            strategy,
            ..Default::default()
        },
    )
    .unwrap()
}

fn noisy_inputs(code: &CodeDescriptor, count: usize, seed: u64) -> Vec<Vec<f64>> {
    let words = codewords(code);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let word = &words[rng.gen_range(0..words.len())];
            to_llrs(word, 1.0)
                .into_iter()
                .map(|llr| llr + rng.gen_range(-1.6..1.6))
                .collect()
        })
        .collect()
}

#[test]
fn compiled_in_code_has_full_rank() {
    let code = constant::code().unwrap();
    assert_eq!(codewords(&code).len(), 1 << code.data_length());
}

#[test]
fn clean_codewords_decode_in_one_iteration() {
    for code in [constant::code().unwrap(), johnson_code(), shifted_code()] {
        let sp = decoder(&code, Strategy::SumProduct);
        let ms = decoder(&code, Strategy::MinSum);
        for word in codewords(&code) {
            let input = to_llrs(&word, 4.0);
            let a = sp.decode(&input).unwrap();
            let b = ms.decode(&input).unwrap();
            assert!(a.converged() && b.converged());
            assert!(a.iterations() <= 5 && b.iterations() <= 5);
            assert_eq!(a.decoded_bits(), b.decoded_bits());
            assert_eq!(a.decoded_bits(), word.as_slice());
        }
    }
}

#[test]
fn decoding_is_deterministic() {
    let code = constant::code().unwrap();
    for strategy in STRATEGIES {
        let decoder = decoder(&code, strategy);
        for input in noisy_inputs(&code, 50, 7) {
            assert_eq!(decoder.decode(&input).unwrap(), decoder.decode(&input).unwrap());
        }
    }
}

#[test]
fn converged_decisions_satisfy_every_check() {
    let code = constant::code().unwrap();
    for strategy in STRATEGIES {
        let decoder = decoder(&code, strategy);
        for input in noisy_inputs(&code, 200, 11) {
            let result = decoder.decode(&input).unwrap();
            if let Some(iteration) = result.converged_iteration() {
                assert_eq!(iteration, result.iterations() - 1);
                assert!(code.is_codeword(result.decoded_bits()));
                assert_eq!(result.parity_check_count(), code.parity_bits());
            }
        }
    }
}

#[test]
fn shape_and_budget_invariants() {
    let code = constant::code().unwrap();
    for strategy in STRATEGIES {
        let decoder = Decoder::new(
            &code,
            DecoderOptions {
                strategy,
                max_iter: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        for input in noisy_inputs(&code, 200, 23) {
            let result = decoder.decode(&input).unwrap();
            assert!(result.iterations() >= 1 && result.iterations() <= 4);
            assert_eq!(result.decoded_bits().len(), code.code_length());
            assert!(result
                .parity_check_counts()
                .iter()
                .all(|&c| c <= code.parity_bits()));
            for i in 0..result.iterations() {
                assert_eq!(result.decisions(i).unwrap().len(), code.code_length());
            }
            if !result.converged() {
                assert_eq!(result.iterations(), 4);
                assert_eq!(result.best_iteration(), 3);
            }
        }
    }
}

#[test]
fn budget_is_enforced_without_convergence() {
    // Near-zero LLRs saturate phi on every edge, so sum-product never moves
    // away from the channel decisions, which are not a codeword.
    let code = constant::code().unwrap();
    let mut input = vec![1e-5; code.code_length()];
    input[0] = -1e-5;

    let decoder = decoder(&code, Strategy::SumProduct);
    let result = decoder.decode(&input).unwrap();
    assert!(!result.converged());
    assert_eq!(result.iterations(), code.max_iter());
    assert_eq!(result.decoded_bits()[0], 1);
    assert!(result.parity_check_count() < code.parity_bits());
}

#[test]
fn scale_factors_keep_clean_input_clean() {
    let code = constant::code().unwrap();
    let word = &codewords(&code)[37];
    for strategy in STRATEGIES {
        let decoder = Decoder::new(
            &code,
            DecoderOptions {
                strategy,
                q_scale: 0.9,
                r_scale: 0.75,
                max_iter: None,
            },
        )
        .unwrap();
        let result = decoder.decode(&to_llrs(word, 3.0)).unwrap();
        assert!(result.converged());
        assert_eq!(result.decoded_bits(), word.as_slice());
    }
}

#[test]
fn graph_sockets_round_trip() {
    for code in [constant::code().unwrap(), johnson_code(), shifted_code()] {
        let graph = TannerGraph::new(&code, &vec![0.5; code.code_length()]).unwrap();
        assert!(graph.sockets_consistent());
        assert_eq!(graph.edge_count(), code.edge_count());

        for c in 0..graph.check_count() {
            let check = graph.check(c);
            for (slot, (&v, &socket)) in check.neighbors().iter().zip(check.sockets()).enumerate() {
                let var = graph.variable(v);
                assert_eq!(var.neighbors()[socket], c);
                assert_eq!(var.sockets()[socket], slot);
            }
        }
    }
}

#[test]
fn batch_decode_matches_sequential() {
    let code = constant::code().unwrap();
    let decoder = decoder(&code, Strategy::MinSum);
    let inputs = noisy_inputs(&code, 40, 3);
    let batch = decoder.decode_batch(&inputs).unwrap();
    for (input, result) in inputs.iter().zip(&batch) {
        assert_eq!(&decoder.decode(input).unwrap(), result);
    }
}

#[test]
fn non_finite_soft_input_is_an_error() {
    let code = constant::code().unwrap();
    for strategy in STRATEGIES {
        let decoder = decoder(&code, strategy);
        let err = decoder.decode(&[f64::NAN; 16]).unwrap_err();
        assert!(matches!(err, LdpcError::NonFiniteInput { index: 0, .. }));

        let mut input = constant::test_vectors().input;
        input[7] = f64::INFINITY;
        let err = decoder.decode(&input).unwrap_err();
        assert!(matches!(err, LdpcError::NonFiniteInput { index: 7, .. }));
    }
}

#[test]
fn out_of_range_llrs_decode_to_the_sent_word() {
    // Beyond f32 range: the channel values saturate instead of becoming
    // infinite, so one weak wrong bit is still corrected.
    let code = constant::code().unwrap();
    let sent = constant::test_vectors().expected;
    let mut input = to_llrs(&sent, 1e39);
    input[0] = if sent[0] == 0 { -0.5 } else { 0.5 };

    for strategy in STRATEGIES {
        let result = decoder(&code, strategy).decode(&input).unwrap();
        assert!(result.converged(), "{}", strategy);
        assert_eq!(result.decoded_bits(), sent.as_slice(), "{}", strategy);
    }
}
