use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use playsource::{
    NegotiationPolicy, PageClient, PlayableSource, PlaybackResolver, ResolverConfig,
    StreamDescriptor, StreamType,
};

/// Arguments of the `resolve` subcommand.
pub struct ResolveArgs {
    pub url: String,
    pub stream_type: String,
    pub live_hls: Option<String>,
    pub live_dash: Option<String>,
    pub cache_key: Option<String>,
    pub ext: Option<String>,
    pub strict: bool,
}

pub async fn cmd_resolve(args: ResolveArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ResolverConfig::load_from(path)?,
        None => ResolverConfig::load()?,
    };
    if args.strict {
        config.negotiation_policy = NegotiationPolicy::Strict;
    }

    let stream_type = args
        .stream_type
        .parse::<StreamType>()
        .map_err(|e: String| anyhow!(e))?;
    let cache_key = args.cache_key.unwrap_or_else(|| args.url.clone());

    let stream = StreamDescriptor::new(args.url, cache_key, Arc::new(()))
        .with_stream_type(stream_type)
        .with_hls_url(args.live_hls.unwrap_or_default())
        .with_dash_mpd_url(args.live_dash.unwrap_or_default())
        .with_format_extension(args.ext.unwrap_or_default());

    let client = PageClient::new(&config.http).context("failed to build HTTP client")?;
    let resolver = PlaybackResolver::from_config(&config, Arc::new(client));

    match resolver.resolve(&stream).await? {
        Some(source) => print_source(&source),
        None => println!("No live manifest available yet"),
    }

    Ok(())
}

fn print_source(source: &PlayableSource) {
    println!("Factory: {}", source.factory);
    println!("URL: {}", source.uri());
    if let Some(key) = source.cache_key() {
        println!("Cache key: {key}");
    }
    if let Some(offset) = source.live_offset() {
        println!("Live offset: {} ms", offset.as_millis());
    }
}
