//! [`AudioEncoder`] backed by the Fraunhofer FDK AAC library
//!
//! Produces AAC-LC at a constant bitrate, ADTS framed unless the parameters
//! ask for raw access units. The library handle is created by `configure`
//! and closed by `teardown` (or when the value is dropped).

use fdk_aac::enc::{AudioObjectType, BitRate, ChannelMode, Encoder, EncoderParams as FdkParams, Transport};

use crate::buffer::FrameBuffer;
use crate::config::EncoderParams;
use crate::engine::{AudioEncoder, OutputInfo};
use crate::error::{EncodeFailureError, EncodeResult, EncoderConfigError};

#[derive(Default)]
pub struct FdkAacEncoder {
    encoder: Option<Encoder>,
    pending: Vec<i16>,
}

impl FdkAacEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.encoder.is_some()
    }

    fn channel_mode(channels: u16) -> Result<ChannelMode, EncoderConfigError> {
        match channels {
            1 => Ok(ChannelMode::Mono),
            2 => Ok(ChannelMode::Stereo),
            n => Err(EncoderConfigError::UnsupportedChannels(n)),
        }
    }
}

impl std::fmt::Debug for FdkAacEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdkAacEncoder")
            .field("configured", &self.is_configured())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl AudioEncoder for FdkAacEncoder {
    fn name(&self) -> &'static str {
        "fdk-aac"
    }

    fn configure(&mut self, params: &EncoderParams) -> Result<(), EncoderConfigError> {
        if self.encoder.is_some() {
            return Err(EncoderConfigError::AlreadyConfigured);
        }
        if params.sample_rate == 0 {
            return Err(EncoderConfigError::InvalidSampleRate(params.sample_rate));
        }
        if params.bit_rate == 0 {
            return Err(EncoderConfigError::InvalidBitrate(params.bit_rate));
        }

        let fdk_params = FdkParams {
            bit_rate: BitRate::Cbr(params.bit_rate),
            sample_rate: params.sample_rate,
            transport: if params.adts {
                Transport::Adts
            } else {
                Transport::Raw
            },
            channels: Self::channel_mode(params.channels)?,
            audio_object_type: AudioObjectType::Mpeg4LowComplexity,
        };

        let encoder =
            Encoder::new(fdk_params).map_err(|e| EncoderConfigError::Rejected(format!("{:?}", e)))?;
        self.encoder = Some(encoder);
        Ok(())
    }

    fn submit(&mut self, samples: &[i16]) -> EncodeResult<()> {
        if self.encoder.is_none() {
            return Err(EncodeFailureError::NotConfigured);
        }
        self.pending.extend_from_slice(samples);
        Ok(())
    }

    fn retrieve(&mut self, output: &mut FrameBuffer) -> EncodeResult<OutputInfo> {
        let encoder = self.encoder.as_ref().ok_or(EncodeFailureError::NotConfigured)?;
        let capacity = output.capacity();

        let info = encoder
            .encode(&self.pending, output.writable())
            .map_err(|e| EncodeFailureError::Engine(format!("{:?}", e)))?;
        if info.output_size > capacity {
            return Err(EncodeFailureError::OutputOverflow {
                required: info.output_size,
                capacity,
            });
        }
        output.commit(info.output_size)?;

        let consumed = info.input_consumed.min(self.pending.len());
        self.pending.drain(..consumed);

        Ok(OutputInfo {
            input_consumed: consumed,
            output_size: info.output_size,
        })
    }

    fn teardown(&mut self) {
        self.encoder = None;
        self.pending.clear();
    }
}
