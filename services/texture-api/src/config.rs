//! Command-line and environment configuration.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use ingestion::decoder::DEFAULT_DECODER_COMMAND;
use ingestion::nomads::DEFAULT_BASE_URL;
use ingestion::UpstreamConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "texture-api")]
#[command(about = "Serves GFS forecast fields as GPU textures")]
pub struct Config {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: String,

    /// Directory holding cached textures
    #[arg(long, env = "CACHE_DIR", default_value = "./data")]
    pub cache_dir: PathBuf,

    /// GFS filter CGI prefix; the grid code and `.pl` are appended
    #[arg(long, env = "UPSTREAM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_url: String,

    /// GRIB decoder command line (reads GRIB on stdin, writes JSON)
    #[arg(long, env = "GRIB_DECODER", default_value = DEFAULT_DECODER_COMMAND)]
    pub decoder: String,

    /// Decoder output limit in MiB
    #[arg(long, env = "DECODER_MAX_OUTPUT_MIB", default_value = "50")]
    pub decoder_max_output_mib: usize,

    /// Maximum simultaneous download+decode slots
    #[arg(long, env = "MAX_CONCURRENT_DECODES", default_value = "4")]
    pub max_concurrent_decodes: usize,

    /// Upstream HTTP request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "600")]
    pub request_timeout_secs: u64,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.upstream_url.clone(),
            decoder_command: self.decoder.clone(),
            max_output_bytes: self.decoder_max_output_mib * 1024 * 1024,
            max_concurrent: self.max_concurrent_decodes,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
