use log::debug;

use crate::descriptor::CodeDescriptor;
use crate::error::LdpcError;

/// A parity constraint. `messages[i]` is the check-to-variable message on
/// the edge to `neighbors[i]`, and `sockets[i]` is the slot this check
/// occupies in that variable's own adjacency.
#[derive(Debug, Clone)]
pub struct CheckNode {
    pub(crate) neighbors: Vec<usize>,
    pub(crate) sockets: Vec<usize>,
    pub(crate) messages: Vec<f32>,
}

/// A codeword symbol, seeded with its channel observation.
///
/// Outgoing messages are kept as a magnitude in `messages` and a sign in
/// `signs` (`true` for a negative LLR); the engine decides what domain the
/// magnitude lives in.
#[derive(Debug, Clone)]
pub struct VariableNode {
    pub(crate) channel: f32,
    pub(crate) neighbors: Vec<usize>,
    pub(crate) sockets: Vec<usize>,
    pub(crate) messages: Vec<f32>,
    pub(crate) signs: Vec<bool>,
}

impl CheckNode {
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn sockets(&self) -> &[usize] {
        &self.sockets
    }
}

impl VariableNode {
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn channel(&self) -> f32 {
        self.channel
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn sockets(&self) -> &[usize] {
        &self.sockets
    }
}

/// Working Tanner graph for one decode session.
///
/// Edges are not stored on their own: an edge is the pair of slots tied
/// together by the mutual socket indices, so either endpoint reaches the
/// other's message without a search. The sockets are copied from the
/// descriptor, which resolved them once.
#[derive(Debug, Clone)]
pub struct TannerGraph {
    pub(crate) checks: Vec<CheckNode>,
    pub(crate) variables: Vec<VariableNode>,
}

/// Channel LLRs are saturated to this magnitude before narrowing to `f32`,
/// so message sums stay finite.
pub const LLR_MAX: f64 = 1.0e6;

impl TannerGraph {
    pub fn new(code: &CodeDescriptor, soft_input: &[f64]) -> Result<TannerGraph, LdpcError> {
        if soft_input.len() != code.code_length() {
            return Err(LdpcError::InputLength {
                expected: code.code_length(),
                actual: soft_input.len(),
            });
        }
        if let Some(index) = soft_input.iter().position(|llr| !llr.is_finite()) {
            return Err(LdpcError::NonFiniteInput {
                index,
                value: soft_input[index],
            });
        }

        let checks: Vec<CheckNode> = code
            .check_neighbors()
            .iter()
            .zip(code.check_sockets())
            .map(|(row, sockets)| CheckNode {
                neighbors: row.clone(),
                sockets: sockets.clone(),
                messages: vec![0.0; row.len()],
            })
            .collect();

        let variables: Vec<VariableNode> = code
            .variable_neighbors()
            .iter()
            .zip(code.variable_sockets())
            .zip(soft_input)
            .map(|((col, sockets), &llr)| VariableNode {
                channel: llr.clamp(-LLR_MAX, LLR_MAX) as f32,
                neighbors: col.clone(),
                sockets: sockets.clone(),
                messages: vec![0.0; col.len()],
                signs: vec![false; col.len()],
            })
            .collect();

        let graph = TannerGraph { checks, variables };
        debug!(
            "built tanner graph: {} checks, {} variables, {} edges",
            graph.check_count(),
            graph.variable_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn edge_count(&self) -> usize {
        self.checks.iter().map(CheckNode::degree).sum()
    }

    pub fn check(&self, c: usize) -> &CheckNode {
        &self.checks[c]
    }

    pub fn variable(&self, v: usize) -> &VariableNode {
        &self.variables[v]
    }

    /// Walks every edge from both ends and confirms the socket indices lead
    /// back to the slot the walk started from.
    pub fn sockets_consistent(&self) -> bool {
        let from_checks = self.checks.iter().enumerate().all(|(c, check)| {
            check
                .neighbors
                .iter()
                .zip(&check.sockets)
                .enumerate()
                .all(|(slot, (&v, &socket))| {
                    self.variables.get(v).map_or(false, |var| {
                        var.neighbors.get(socket) == Some(&c) && var.sockets.get(socket) == Some(&slot)
                    })
                })
        });
        let from_variables = self.variables.iter().enumerate().all(|(v, var)| {
            var.neighbors
                .iter()
                .zip(&var.sockets)
                .enumerate()
                .all(|(slot, (&c, &socket))| {
                    self.checks.get(c).map_or(false, |check| {
                        check.neighbors.get(socket) == Some(&v) && check.sockets.get(socket) == Some(&slot)
                    })
                })
        });
        from_checks && from_variables
    }
}
