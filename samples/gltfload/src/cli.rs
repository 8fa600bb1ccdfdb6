use std::path::PathBuf;

use clap::ValueHint;

/// How the load report is written to stderr.
#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, spans folded into the prefix
    Compact,
    /// Multi-line events with field names and source locations
    Pretty,
    /// Newline-delimited JSON, for feeding reports to other tools
    Json,
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Load glTF documents into tessera arenas and check their accessors")]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,tessera=info,gltfload=info",
        env = "GLTFLOAD_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Report format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Alignment of the arenas buffer data is loaded into
    #[arg(short = 'a', long, default_value_t = 4)]
    pub byte_align: usize,
    /// Only report accessors whose declared bounds disagree with their data
    #[arg(short, long)]
    pub quiet: bool,
    /// glTF documents to load
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
#[error("couldn't install the report subscriber: {0}")]
pub struct SubscriberError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl Cli {
    /// Install the global subscriber the load report is written through.
    pub(crate) fn install_subscriber(&self) -> Result<(), SubscriberError> {
        let offset = time::UtcOffset::current_local_offset();
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
                offset.unwrap_or(time::UtcOffset::UTC),
                time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
            ))
            .with_env_filter(self.log_filter.as_str());

        match self.log_format {
            LogFormat::Compact => builder.compact().try_init()?,
            LogFormat::Pretty => builder.pretty().try_init()?,
            LogFormat::Json => builder.json().try_init()?,
        }
        if let Err(e) = offset {
            tracing::debug!("report timestamps are in UTC: {e}");
        }
        Ok(())
    }
}
