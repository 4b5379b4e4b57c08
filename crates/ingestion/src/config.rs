//! Upstream client configuration.

use std::time::Duration;

use crate::decoder::{DEFAULT_DECODER_COMMAND, DEFAULT_MAX_OUTPUT_BYTES};
use crate::nomads::DEFAULT_BASE_URL;

/// Settings for [`crate::UpstreamGribClient::from_config`].
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Filter CGI prefix, e.g. `https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_`
    pub base_url: String,
    /// Decoder command line, split on whitespace
    pub decoder_command: String,
    /// Decoder stdout bound in bytes
    pub max_output_bytes: usize,
    /// Simultaneous download+decode slots
    pub max_concurrent: usize,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            decoder_command: DEFAULT_DECODER_COMMAND.to_string(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            max_concurrent: 4,
            request_timeout: Duration::from_secs(600), // 10 minutes
        }
    }
}
