//! Encoder engine abstraction
//!
//! An engine is driven through four calls: `configure` once, then
//! `submit`/`retrieve` pairs, then `teardown`. [`EncodingSession`] enforces
//! that order and tears the engine down when it is dropped, so every exit
//! path releases the engine exactly once.

use crate::buffer::FrameBuffer;
use crate::config::EncoderParams;
use crate::error::{EncodeResult, EncoderConfigError};

/// Metadata returned with each retrieved frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputInfo {
    /// Samples (all channels) the engine took from its input queue
    pub input_consumed: usize,
    /// Bytes committed to the frame buffer
    pub output_size: usize,
}

/// A codec engine that turns interleaved 16-bit PCM into encoded frames
pub trait AudioEncoder {
    /// Short engine name for log lines
    fn name(&self) -> &'static str;

    /// Apply encoding parameters; must precede any input
    fn configure(&mut self, params: &EncoderParams) -> Result<(), EncoderConfigError>;

    /// Queue interleaved samples for the next `retrieve`
    fn submit(&mut self, samples: &[i16]) -> EncodeResult<()>;

    /// Encode queued input into `output`, which may end up empty
    fn retrieve(&mut self, output: &mut FrameBuffer) -> EncodeResult<OutputInfo>;

    /// Release engine resources
    fn teardown(&mut self);
}

/// One configured engine instance
#[derive(Debug)]
pub struct EncodingSession<E: AudioEncoder> {
    engine: E,
    params: EncoderParams,
    frames: u64,
}

impl<E: AudioEncoder> EncodingSession<E> {
    /// Configure `engine` with `params`; the engine is torn down on failure
    pub fn configure(mut engine: E, params: EncoderParams) -> Result<Self, EncoderConfigError> {
        if let Err(err) = engine.configure(&params) {
            log::debug!("{} rejected {:?}: {}", engine.name(), params, err);
            engine.teardown();
            return Err(err);
        }
        log::debug!(
            "{} configured: {} Hz, {} ch, {} bps, adts={}",
            engine.name(),
            params.sample_rate,
            params.channels,
            params.bit_rate,
            params.adts
        );
        Ok(Self {
            engine,
            params,
            frames: 0,
        })
    }

    pub fn params(&self) -> &EncoderParams {
        &self.params
    }

    /// Frames retrieved so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Submit one chunk of samples and retrieve the resulting frame
    pub fn encode(&mut self, samples: &[i16], output: &mut FrameBuffer) -> EncodeResult<OutputInfo> {
        output.clear();
        self.engine.submit(samples)?;
        let info = self.engine.retrieve(output)?;
        self.frames += 1;
        Ok(info)
    }
}

impl<E: AudioEncoder> Drop for EncodingSession<E> {
    fn drop(&mut self) {
        log::debug!("{} teardown after {} frames", self.engine.name(), self.frames);
        self.engine.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeFailureError;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Engine that emits one byte per submitted sample
    #[derive(Debug)]
    struct CountingEngine {
        reject: bool,
        pending: usize,
        teardowns: Rc<Cell<u32>>,
    }

    impl AudioEncoder for CountingEngine {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn configure(&mut self, params: &EncoderParams) -> Result<(), EncoderConfigError> {
            if self.reject {
                return Err(EncoderConfigError::InvalidBitrate(params.bit_rate));
            }
            Ok(())
        }

        fn submit(&mut self, samples: &[i16]) -> EncodeResult<()> {
            self.pending += samples.len();
            Ok(())
        }

        fn retrieve(&mut self, output: &mut FrameBuffer) -> EncodeResult<OutputInfo> {
            let n = std::mem::take(&mut self.pending);
            output.commit(n)?;
            Ok(OutputInfo {
                input_consumed: n,
                output_size: n,
            })
        }

        fn teardown(&mut self) {
            self.teardowns.set(self.teardowns.get() + 1);
        }
    }

    fn engine(reject: bool) -> (CountingEngine, Rc<Cell<u32>>) {
        let teardowns = Rc::new(Cell::new(0));
        (
            CountingEngine {
                reject,
                pending: 0,
                teardowns: teardowns.clone(),
            },
            teardowns,
        )
    }

    #[test]
    fn test_session_encodes_and_tears_down_once() {
        let (engine, teardowns) = engine(false);
        let mut session = EncodingSession::configure(engine, EncoderParams::new(8000, 1, 64_000)).unwrap();
        let mut out = FrameBuffer::with_capacity(16);

        let info = session.encode(&[1, 2, 3], &mut out).unwrap();
        assert_eq!(info.output_size, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(session.frames(), 1);
        assert_eq!(session.params().sample_rate, 8000);

        drop(session);
        assert_eq!(teardowns.get(), 1);
    }

    #[test]
    fn test_rejected_configuration_tears_down() {
        let (engine, teardowns) = engine(true);
        let err = EncodingSession::configure(engine, EncoderParams::new(8000, 1, 1)).unwrap_err();
        assert_eq!(err, EncoderConfigError::InvalidBitrate(1));
        assert_eq!(teardowns.get(), 1);
    }

    #[test]
    fn test_overflow_propagates() {
        let (engine, teardowns) = engine(false);
        let mut session = EncodingSession::configure(engine, EncoderParams::new(8000, 1, 64_000)).unwrap();
        let mut out = FrameBuffer::with_capacity(2);
        let err = session.encode(&[0; 5], &mut out).unwrap_err();
        assert_eq!(
            err,
            EncodeFailureError::OutputOverflow {
                required: 5,
                capacity: 2
            }
        );
        assert_eq!(session.frames(), 0);
        drop(session);
        assert_eq!(teardowns.get(), 1);
    }
}
