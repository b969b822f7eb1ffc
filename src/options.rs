use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::ldpc::{DecoderOptions, Strategy};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum StrategyArg {
    #[value(alias = "sp")]
    SumProduct,
    #[value(alias = "ms")]
    MinSum,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::SumProduct => Strategy::SumProduct,
            StrategyArg::MinSum => Strategy::MinSum,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "LDPC soft-decision decoder", long_about = None)]
pub struct CommandLineOptions {
    /// Decode the compiled-in test vectors and report pass/fail
    #[arg(long)]
    pub test: bool,

    /// Soft decisions, one f64 per symbol ("-" for stdin)
    #[arg(required_unless_present = "test")]
    pub input: Option<String>,

    /// Decoded bits, one int per bit ("-" for stdout)
    #[arg(required_unless_present = "test")]
    pub output: Option<String>,

    /// TOML file with [code], [decoder] and [test_vectors] sections
    #[arg(long)]
    pub code: Option<PathBuf>,

    /// Check node update rule
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Iteration budget, overriding the code's
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Variable-to-check message scale factor
    #[arg(long)]
    pub q_scale: Option<f32>,

    /// Check-to-variable message scale factor
    #[arg(long)]
    pub r_scale: Option<f32>,

    /// Number of trials in --test mode
    #[arg(long, default_value_t = 100)]
    pub runs: usize,
}

impl CommandLineOptions {
    /// Applies the command-line overrides on top of `base`.
    pub fn decoder_options(&self, base: DecoderOptions) -> DecoderOptions {
        DecoderOptions {
            strategy: self.strategy.map(Strategy::from).unwrap_or(base.strategy),
            q_scale: self.q_scale.unwrap_or(base.q_scale),
            r_scale: self.r_scale.unwrap_or(base.r_scale),
            max_iter: self.max_iter.or(base.max_iter),
        }
    }
}
