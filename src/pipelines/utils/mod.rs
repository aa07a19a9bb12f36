use crate::error::{Result, SentimentError};
use candle_core::Device;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRequest {
    #[default]
    Cpu,
    Cuda(usize),
}

impl DeviceRequest {
    pub fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => Device::new_cuda(i).map_err(|e| {
                SentimentError::artifact(
                    "device",
                    format!("Failed to init CUDA device {i}: {e}. Try CPU as fallback."),
                )
            }),
        }
    }
}

macro_rules! impl_device_methods {
    ($builder:ident) => {
        impl $builder {
            /// Use CPU for inference (default).
            pub fn cpu(mut self) -> Self {
                self.device_request = crate::pipelines::utils::DeviceRequest::Cpu;
                self
            }

            /// Use a specific CUDA GPU for inference.
            pub fn cuda(mut self, index: usize) -> Self {
                self.device_request = crate::pipelines::utils::DeviceRequest::Cuda(index);
                self
            }
        }
    };
}

pub(crate) use impl_device_methods;

/// Cache key for an artifact fetched from `location`, placed on `device`.
pub fn build_cache_key(location: &str, artifact: &str, device: &Device) -> String {
    format!("{location}/{artifact}-{:?}", device.location())
}
