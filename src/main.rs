mod cli;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use hero_rotation::config;
use hero_rotation::prelude::*;

fn main() -> Result<()> {
    // stderr keeps stdout clean for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("loading rotation configuration")?;
    let hero = HeroRotation::new(cfg).context("invalid rotation configuration")?;

    match cli.command {
        Commands::Check => {
            println!("{}", serde_json::to_string_pretty(hero.display())?);
        }
        Commands::Sources => {
            for s in hero.registry().sources() {
                let state = if s.enabled { "enabled" } else { "disabled" };
                println!("{:<12} {:<18} {:<8} {}", s.id, s.kind.as_str(), s.kind.slide_type().as_str(), state);
            }
        }
        Commands::Build { feeds, now, pretty } => {
            let now = match now {
                Some(s) => DateTime::parse_from_rfc3339(&s)
                    .with_context(|| format!("invalid --now timestamp: {s}"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let mut set = FeedSet::new();
            for spec in &feeds {
                let (source_id, path) = parse_feed_arg(spec)?;
                if hero.registry().get(source_id).is_none() {
                    tracing::warn!(source = source_id, "feed given for unknown source; ignoring");
                    continue;
                }
                match read_payload(Path::new(path)) {
                    Ok(payload) => { set.insert_payload(source_id, payload); }
                    Err(e) => {
                        tracing::warn!(source = source_id, error = %e, "feed unreadable");
                        set.insert_unavailable(source_id, e.to_string());
                    }
                }
            }
            let rotation = hero.build(&set, now);
            let out = if pretty { serde_json::to_string_pretty(&rotation)? } else { serde_json::to_string(&rotation)? };
            println!("{out}");
        }
    }
    Ok(())
}

fn parse_feed_arg(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('=') {
        Some((id, path)) if !id.trim().is_empty() && !path.trim().is_empty() => Ok((id.trim(), path.trim())),
        _ => Err(anyhow!("feed must be `<source-id>=<path>` (got `{}`)", spec)),
    }
}

fn read_payload(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read feed: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse feed JSON: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_arg_splits_on_first_equals() {
        assert_eq!(parse_feed_arg("posts=feeds/posts.json").unwrap(), ("posts", "feeds/posts.json"));
        assert_eq!(parse_feed_arg("youtube=a=b.json").unwrap(), ("youtube", "a=b.json"));
        assert!(parse_feed_arg("posts").is_err());
        assert!(parse_feed_arg("=x.json").is_err());
    }

    #[test]
    fn unreadable_feed_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(read_payload(&bad).is_err());
        assert!(read_payload(&tmp.path().join("missing.json")).is_err());
    }
}
