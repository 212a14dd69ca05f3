//! Sync status display.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use ludex::Source;
use ludex::http::reqwest_transport::ReqwestTransport;
use ludex::sync::{SyncService, SyncStats};

use crate::config::Config;

pub async fn run(config: &Config, source: Option<Source>) -> anyhow::Result<()> {
    let url = config.database_url();
    let db = ludex::connect_and_migrate(&url)
        .await
        .with_context(|| format!("connecting to {url}"))?;
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(10))
        .context("building HTTP client")?;
    let service = SyncService::new(db, Arc::new(transport), config.credentials());

    let sources: Vec<Source> = match source {
        Some(source) => vec![source],
        None => Source::ALL.to_vec(),
    };

    for source in sources {
        let stats = service
            .sync_stats(source)
            .await
            .with_context(|| format!("reading stats for {source}"))?;
        print_stats(&stats);

        let attempts = service
            .attempt_history(source, 5)
            .await
            .with_context(|| format!("reading attempt history for {source}"))?;
        if !attempts.is_empty() {
            println!("  recent attempts:");
            for attempt in attempts {
                println!(
                    "    {} {} -> {} (cursor {}, {} processed){}",
                    attempt.started_at.to_rfc3339(),
                    attempt.sync_type,
                    attempt.status,
                    attempt.last_cursor,
                    attempt.items_processed,
                    attempt
                        .error_message
                        .map(|m| format!(": {m}"))
                        .unwrap_or_default(),
                );
            }
        }
    }

    Ok(())
}

fn print_stats(stats: &SyncStats) {
    println!("{}", stats.source);
    println!("  cursor:        {}", stats.cursor);
    println!("  stored:        {}", stats.stored_records);
    match (stats.total_estimate, stats.percent_complete) {
        (Some(total), Some(percent)) => {
            println!("  progress:      {percent:.2}% of ~{total}");
        }
        _ => println!("  progress:      n/a"),
    }
    println!(
        "  last full:     {}",
        stats
            .last_historical
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    println!(
        "  last incr:     {}",
        stats
            .last_incremental
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    println!(
        "  last hot:      {}",
        stats
            .last_hot_update
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    println!("  collections:   {}", stats.collections);
}
