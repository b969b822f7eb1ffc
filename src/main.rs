use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use ldpcdec::options::CommandLineOptions;
use ldpcdec::stream::decode_stream;
use ldpcdec::{constant, run_self_test, AppConfig, Decoder, LdpcError};

fn init_logging() {
    let env = Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let opts = CommandLineOptions::parse();

    match run(&opts) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &CommandLineOptions) -> Result<bool, LdpcError> {
    let config = match &opts.code {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let options = opts.decoder_options(config.decoder);

    let (code, vectors) = match config.code {
        Some(code) => (code, config.test_vectors),
        None => (
            constant::code()?,
            Some(config.test_vectors.unwrap_or_else(constant::test_vectors)),
        ),
    };
    let decoder = Decoder::new(&code, options)?;

    if opts.test {
        let vectors = vectors.ok_or(LdpcError::MissingTestVectors)?;

        info!("Starting test using pre-compiled test data .....");
        info!("Codeword length: {}", code.code_length());
        info!("Parity Bits....: {}", code.parity_bits());
        info!("Decoder........: {}", options.strategy);

        let report = run_self_test(&decoder, &vectors, opts.runs)?;

        info!("test runs......: {}", report.runs);
        info!("test runs OK...: {}", report.passed);
        info!(
            "result.........: {}",
            if report.is_pass() { "PASS" } else { "FAIL" }
        );
        return Ok(report.is_pass());
    }

    let input_name = opts.input.as_deref().unwrap_or("-");
    let output_name = opts.output.as_deref().unwrap_or("-");

    let input: Box<dyn Read> = if input_name == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input_name).map_err(|e| LdpcError::io(input_name, e))?;
        Box::new(BufReader::new(file))
    };
    let output: Box<dyn Write> = if output_name == "-" {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(output_name).map_err(|e| LdpcError::io(output_name, e))?;
        Box::new(BufWriter::new(file))
    };

    let stats = decode_stream(&decoder, input, input_name, output, output_name)?;
    info!(
        "decoded {} codeword(s), {} converged",
        stats.frames, stats.converged
    );
    Ok(true)
}
