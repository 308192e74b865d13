//! `playsource` CLI - classify and resolve stream URLs from the command line

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "playsource")]
#[command(about = "Decide how a media stream should be played")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/playsource/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the delivery protocol inferred from a URL
    Classify {
        /// Stream URL
        url: String,

        /// Classify as if the URL ended in this extension (e.g. m3u8, mpd)
        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Resolve a stream into a playable source
    Resolve {
        /// On-demand playback URL
        url: String,

        /// Stream type (video, audio, live, audio-live, post-live, ...)
        #[arg(short = 't', long, default_value = "video")]
        stream_type: String,

        /// HLS playlist for live playback
        #[arg(long)]
        live_hls: Option<String>,

        /// DASH manifest for live playback
        #[arg(long)]
        live_dash: Option<String>,

        /// Cache key forwarded to the source factory (default: the URL)
        #[arg(short = 'k', long)]
        cache_key: Option<String>,

        /// Format extension override
        #[arg(short, long)]
        ext: Option<String>,

        /// Fail instead of falling back when session negotiation breaks
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { url, ext } => {
            cmd::cmd_classify(&url, ext.as_deref());
        }
        Commands::Resolve {
            url,
            stream_type,
            live_hls,
            live_dash,
            cache_key,
            ext,
            strict,
        } => {
            let args = cmd::ResolveArgs {
                url,
                stream_type,
                live_hls,
                live_dash,
                cache_key,
                ext,
                strict,
            };
            cmd::cmd_resolve(args, cli.config.as_deref()).await?;
        }
    }

    Ok(())
}
