use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::Deserialize;

use crate::descriptor::CodeDescriptor;
use crate::error::LdpcError;
use crate::tanner::TannerGraph;

const PHI_MAX_INPUT: f32 = 10.0;
const PHI_MIN_INPUT: f32 = 9.08e-5;
const PHI_CEILING: f32 = 10.0;

/// `phi(x) = ln((e^x + 1) / (e^x - 1)) = -ln(tanh(x / 2))`, its own inverse
/// on `x > 0`. Saturates at both ends so sums of phi values stay finite.
fn phi(x: f32) -> f32 {
    if x > PHI_MAX_INPUT {
        0.0
    } else if x < PHI_MIN_INPUT {
        PHI_CEILING
    } else {
        let z = libm::expf(x);
        libm::logf((z + 1.0) / (z - 1.0))
    }
}

/// Check node update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Strategy {
    /// Full belief propagation with the tanh rule.
    #[default]
    SumProduct,
    /// Minimum magnitude with product of signs.
    MinSum,
}

impl FromStr for Strategy {
    type Err = LdpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum-product" | "sp" | "0" => Ok(Strategy::SumProduct),
            "min-sum" | "ms" | "1" => Ok(Strategy::MinSum),
            other => Err(LdpcError::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = LdpcError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SumProduct => write!(f, "sum-product"),
            Strategy::MinSum => write!(f, "min-sum"),
        }
    }
}

/// Per-call decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    pub strategy: Strategy,
    /// Multiplies every extrinsic variable-to-check LLR.
    pub q_scale: f32,
    /// Multiplies every check-to-variable LLR.
    pub r_scale: f32,
    /// Overrides the descriptor's iteration budget.
    pub max_iter: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            strategy: Strategy::SumProduct,
            q_scale: 1.0,
            r_scale: 1.0,
            max_iter: None,
        }
    }
}

impl DecoderOptions {
    pub fn validate(&self) -> Result<(), LdpcError> {
        for (name, value) in [("q_scale", self.q_scale), ("r_scale", self.r_scale)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LdpcError::InvalidScaleFactor { name, value });
            }
        }
        if self.max_iter == Some(0) {
            return Err(LdpcError::ZeroIterations);
        }
        Ok(())
    }
}

/// Everything one decode call produced: the hard decisions and the number
/// of satisfied parity checks after each executed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    decisions: Vec<Vec<u8>>,
    parity_check_counts: Vec<usize>,
    parity_bits: usize,
}

impl DecodeResult {
    fn new(parity_bits: usize, max_iter: usize) -> Self {
        DecodeResult {
            decisions: Vec::with_capacity(max_iter),
            parity_check_counts: Vec::with_capacity(max_iter),
            parity_bits,
        }
    }

    fn push(&mut self, bits: Vec<u8>, satisfied: usize) {
        self.decisions.push(bits);
        self.parity_check_counts.push(satisfied);
    }

    pub fn iterations(&self) -> usize {
        self.parity_check_counts.len()
    }

    pub fn converged_iteration(&self) -> Option<usize> {
        self.parity_check_counts
            .iter()
            .rposition(|&count| count == self.parity_bits)
    }

    pub fn converged(&self) -> bool {
        self.converged_iteration().is_some()
    }

    /// The converged iteration, or the last one executed.
    pub fn best_iteration(&self) -> usize {
        self.converged_iteration()
            .unwrap_or_else(|| self.iterations().saturating_sub(1))
    }

    pub fn decoded_bits(&self) -> &[u8] {
        &self.decisions[self.best_iteration()]
    }

    pub fn parity_check_count(&self) -> usize {
        self.parity_check_counts[self.best_iteration()]
    }

    pub fn parity_check_counts(&self) -> &[usize] {
        &self.parity_check_counts
    }

    pub fn decisions(&self, iteration: usize) -> Option<&[u8]> {
        self.decisions.get(iteration).map(Vec::as_slice)
    }
}

trait UpdateRule {
    /// Stored form of an extrinsic variable-to-check LLR magnitude.
    fn encode(&self, magnitude: f32) -> f32;

    /// Computes the check-to-variable LLRs of one check. `incoming` holds
    /// the stored magnitude and sign of each edge in slot order; checks
    /// always have at least two edges.
    fn update_check(&self, incoming: &[(f32, bool)], out: &mut [f32], r_scale: f32);
}

struct SumProductRule;

impl UpdateRule for SumProductRule {
    fn encode(&self, magnitude: f32) -> f32 {
        phi(magnitude)
    }

    fn update_check(&self, incoming: &[(f32, bool)], out: &mut [f32], r_scale: f32) {
        let phi_sum: f32 = incoming.iter().map(|&(m, _)| m).sum();
        let parity = incoming.iter().fold(false, |p, &(_, negative)| p ^ negative);

        for (msg, &(m, negative)) in out.iter_mut().zip(incoming) {
            let magnitude = phi(phi_sum - m) * r_scale;
            *msg = if parity ^ negative { -magnitude } else { magnitude };
        }
    }
}

struct MinSumRule;

impl UpdateRule for MinSumRule {
    fn encode(&self, magnitude: f32) -> f32 {
        magnitude
    }

    fn update_check(&self, incoming: &[(f32, bool)], out: &mut [f32], r_scale: f32) {
        let mut min1 = f32::INFINITY;
        let mut min2 = f32::INFINITY;
        let mut argmin = 0;
        let mut parity = false;

        for (slot, &(m, negative)) in incoming.iter().enumerate() {
            parity ^= negative;
            if m < min1 {
                min2 = min1;
                min1 = m;
                argmin = slot;
            } else if m < min2 {
                min2 = m;
            }
        }

        for (slot, (msg, &(_, negative))) in out.iter_mut().zip(incoming).enumerate() {
            let magnitude = (if slot == argmin { min2 } else { min1 }) * r_scale;
            *msg = if parity ^ negative { -magnitude } else { magnitude };
        }
    }
}

fn seed_variables<R: UpdateRule>(rule: &R, graph: &mut TannerGraph) {
    for var in graph.variables.iter_mut() {
        let magnitude = rule.encode(var.channel.abs());
        let negative = var.channel < 0.0;
        var.messages.fill(magnitude);
        var.signs.fill(negative);
    }
}

fn update_checks<R: UpdateRule>(
    rule: &R,
    graph: &mut TannerGraph,
    r_scale: f32,
    incoming: &mut Vec<(f32, bool)>,
) {
    let TannerGraph { checks, variables } = graph;
    for check in checks.iter_mut() {
        incoming.clear();
        incoming.extend(check.neighbors.iter().zip(&check.sockets).map(|(&v, &socket)| {
            let var = &variables[v];
            (var.messages[socket], var.signs[socket])
        }));
        rule.update_check(incoming.as_slice(), &mut check.messages, r_scale);
    }
}

/// Updates every variable's outgoing messages and returns the hard
/// decisions on the total beliefs.
fn update_variables<R: UpdateRule>(rule: &R, graph: &mut TannerGraph, q_scale: f32) -> Vec<u8> {
    let TannerGraph { checks, variables } = graph;
    variables
        .iter_mut()
        .map(|var| {
            let belief = var.channel
                + var
                    .neighbors
                    .iter()
                    .zip(&var.sockets)
                    .map(|(&c, &socket)| checks[c].messages[socket])
                    .sum::<f32>();

            for (slot, (&c, &socket)) in var.neighbors.iter().zip(&var.sockets).enumerate() {
                let extrinsic = belief - checks[c].messages[socket];
                var.messages[slot] = rule.encode(extrinsic.abs() * q_scale);
                var.signs[slot] = extrinsic <= 0.0;
            }

            u8::from(belief < 0.0)
        })
        .collect()
}

fn run<R: UpdateRule>(
    rule: &R,
    graph: &mut TannerGraph,
    code: &CodeDescriptor,
    options: &DecoderOptions,
    max_iter: usize,
) -> DecodeResult {
    let parity_bits = code.parity_bits();
    let mut result = DecodeResult::new(parity_bits, max_iter);
    let mut incoming = Vec::new();

    seed_variables(rule, graph);

    for iter in 0..max_iter {
        update_checks(rule, graph, options.r_scale, &mut incoming);
        let bits = update_variables(rule, graph, options.q_scale);
        let satisfied = code.satisfied_checks(&bits);
        trace!("iteration {}: {}/{} checks satisfied", iter + 1, satisfied, parity_bits);
        result.push(bits, satisfied);

        if satisfied == parity_bits {
            debug!("{} converged after {} iteration(s)", options.strategy, iter + 1);
            break;
        }
    }

    if !result.converged() {
        debug!(
            "{} gave up after {} iterations with {}/{} checks satisfied",
            options.strategy,
            max_iter,
            result.parity_check_count(),
            parity_bits
        );
    }
    result
}

/// Decode session driver: one call decodes one codeword on a graph that is
/// built for the call and dropped with it.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    code: &'a CodeDescriptor,
    options: DecoderOptions,
    max_iter: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(code: &'a CodeDescriptor, options: DecoderOptions) -> Result<Self, LdpcError> {
        options.validate()?;
        let max_iter = options.max_iter.unwrap_or(code.max_iter());
        Ok(Decoder {
            code,
            options,
            max_iter,
        })
    }

    pub fn code(&self) -> &CodeDescriptor {
        self.code
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn decode(&self, soft_input: &[f64]) -> Result<DecodeResult, LdpcError> {
        let mut graph = TannerGraph::new(self.code, soft_input)?;
        let result = match self.options.strategy {
            Strategy::SumProduct => run(&SumProductRule, &mut graph, self.code, &self.options, self.max_iter),
            Strategy::MinSum => run(&MinSumRule, &mut graph, self.code, &self.options, self.max_iter),
        };
        Ok(result)
    }

    /// Decodes independent codewords. Sessions share nothing but the
    /// descriptor, so with the `parallel` feature they run on rayon's pool.
    #[cfg(feature = "parallel")]
    pub fn decode_batch<T>(&self, inputs: &[T]) -> Result<Vec<DecodeResult>, LdpcError>
    where
        T: AsRef<[f64]> + Sync,
    {
        use rayon::prelude::*;
        inputs.par_iter().map(|input| self.decode(input.as_ref())).collect()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn decode_batch<T>(&self, inputs: &[T]) -> Result<Vec<DecodeResult>, LdpcError>
    where
        T: AsRef<[f64]> + Sync,
    {
        inputs.iter().map(|input| self.decode(input.as_ref())).collect()
    }
}
