//! Soft-decision LDPC decoding by belief propagation over a Tanner graph.
//!
//! A [`CodeDescriptor`] describes the parity-check matrix once; a
//! [`Decoder`] turns one vector of channel LLRs into hard decisions per
//! call, with either the sum-product or the min-sum check rule.

pub mod config;
pub mod constant;
pub mod descriptor;
pub mod error;
pub mod ldpc;
pub mod options;
pub mod selftest;
pub mod stream;
pub mod tanner;

pub use config::AppConfig;
pub use descriptor::{CodeDescriptor, CodeParams, ParityLayout};
pub use error::LdpcError;
pub use ldpc::{DecodeResult, Decoder, DecoderOptions, Strategy};
pub use selftest::{run_self_test, SelfTestReport, TestVectors};
pub use tanner::TannerGraph;
