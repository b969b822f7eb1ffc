//! Framing of soft decisions in and decoded bits out.
//!
//! A frame is `code_length` native-endian `f64` soft decisions on the way
//! in and `code_length` native-endian `i32` bits on the way out.

use std::io::{self, ErrorKind, Read, Write};
use std::mem::size_of;

use log::{debug, warn};

use crate::error::LdpcError;
use crate::ldpc::Decoder;

pub struct SoftFrameReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: Read> SoftFrameReader<R> {
    pub fn new(inner: R, code_length: usize) -> Self {
        SoftFrameReader {
            inner,
            buf: vec![0u8; code_length * size_of::<f64>()],
        }
    }

    /// Reads the next full frame. Returns `None` at end of input, including
    /// when the input ends part way through a frame.
    pub fn read_frame(&mut self) -> io::Result<Option<Vec<f64>>> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < self.buf.len() {
            warn!(
                "discarding truncated frame: {} of {} bytes",
                filled,
                self.buf.len()
            );
            return Ok(None);
        }

        Ok(Some(
            self.buf
                .chunks_exact(size_of::<f64>())
                .map(|chunk| {
                    let mut word = [0u8; 8];
                    word.copy_from_slice(chunk);
                    f64::from_ne_bytes(word)
                })
                .collect(),
        ))
    }
}

impl<R: Read> Iterator for SoftFrameReader<R> {
    type Item = io::Result<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

pub fn write_bits<W: Write>(out: &mut W, bits: &[u8]) -> io::Result<()> {
    for &bit in bits {
        out.write_all(&i32::from(bit).to_ne_bytes())?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub frames: usize,
    pub converged: usize,
}

/// Decodes every frame of `input` into `output`. The names label I/O errors.
pub fn decode_stream<R: Read, W: Write>(
    decoder: &Decoder,
    input: R,
    input_name: &str,
    mut output: W,
    output_name: &str,
) -> Result<StreamStats, LdpcError> {
    let mut stats = StreamStats::default();
    let frames = SoftFrameReader::new(input, decoder.code().code_length());

    for frame in frames {
        let frame = frame.map_err(|e| LdpcError::io(input_name, e))?;
        let result = decoder.decode(&frame)?;
        write_bits(&mut output, result.decoded_bits()).map_err(|e| LdpcError::io(output_name, e))?;

        stats.frames += 1;
        if result.converged() {
            stats.converged += 1;
        }
    }
    output.flush().map_err(|e| LdpcError::io(output_name, e))?;

    debug!("decoded {} frame(s), {} converged", stats.frames, stats.converged);
    Ok(stats)
}
