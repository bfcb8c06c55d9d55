//! Optional whole-frame compression. With the `zstd_support` feature the
//! pair wraps a zstd compressor/decompressor; without it both are identity
//! passthroughs so call sites never branch.

cfg_if! {
    if #[cfg(feature = "zstd_support")]
    {
        use thiserror::Error;

        use zstd::bulk::{Compressor, Decompressor};

        #[derive(Debug, Error)]
        pub enum CompressionError {
            #[error("failed to create compressor at level {level}")]
            CompressorCreationFailed { level: i32 },
            #[error("failed to compress {payload_size} byte payload")]
            CompressionFailed { payload_size: usize },
            #[error("failed to decompress {payload_size} byte payload")]
            DecompressionFailed { payload_size: usize },
        }

        /// Upper bound on a decompressed frame; anything larger is hostile.
        const MAX_FRAME_SIZE: usize = 1 << 20;

        pub struct FrameEncoder {
            result: Vec<u8>,
            compressor: Compressor<'static>,
        }

        impl FrameEncoder {
            pub fn try_new(level: i32) -> Result<Self, CompressionError> {
                let compressor = Compressor::new(level)
                    .map_err(|_| CompressionError::CompressorCreationFailed { level })?;
                Ok(Self {
                    result: Vec::new(),
                    compressor,
                })
            }

            pub fn try_encode(&mut self, payload: &[u8]) -> Result<&[u8], CompressionError> {
                self.result = self
                    .compressor
                    .compress(payload)
                    .map_err(|_| CompressionError::CompressionFailed {
                        payload_size: payload.len(),
                    })?;
                Ok(&self.result)
            }
        }

        pub struct FrameDecoder {
            result: Vec<u8>,
            decompressor: Decompressor<'static>,
        }

        impl FrameDecoder {
            pub fn try_new() -> Result<Self, CompressionError> {
                let decompressor = Decompressor::new()
                    .map_err(|_| CompressionError::CompressorCreationFailed { level: 0 })?;
                Ok(Self {
                    result: Vec::new(),
                    decompressor,
                })
            }

            pub fn try_decode(&mut self, payload: &[u8]) -> Result<&[u8], CompressionError> {
                self.result = self
                    .decompressor
                    .decompress(payload, MAX_FRAME_SIZE)
                    .map_err(|_| CompressionError::DecompressionFailed {
                        payload_size: payload.len(),
                    })?;
                Ok(&self.result)
            }
        }
    }
    else
    {
        use thiserror::Error;

        #[derive(Debug, Error)]
        pub enum CompressionError {}

        pub struct FrameEncoder {
            result: Vec<u8>,
        }

        impl FrameEncoder {
            pub fn try_new(_level: i32) -> Result<Self, CompressionError> {
                Ok(Self { result: Vec::new() })
            }

            pub fn try_encode(&mut self, payload: &[u8]) -> Result<&[u8], CompressionError> {
                self.result = payload.to_vec();
                Ok(&self.result)
            }
        }

        pub struct FrameDecoder {
            result: Vec<u8>,
        }

        impl FrameDecoder {
            pub fn try_new() -> Result<Self, CompressionError> {
                Ok(Self { result: Vec::new() })
            }

            pub fn try_decode(&mut self, payload: &[u8]) -> Result<&[u8], CompressionError> {
                self.result = payload.to_vec();
                Ok(&self.result)
            }
        }
    }
}
