use ludex::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::AttemptStarted {
                source,
                sync_type,
                start_cursor,
            } => {
                tracing::info!(%source, %sync_type, start_cursor, "Sync attempt started");
            }

            SyncProgress::PageComplete {
                source,
                cursor,
                processed,
                added,
                record_errors,
                total_processed,
            } => {
                tracing::info!(
                    %source,
                    cursor,
                    processed,
                    added,
                    record_errors,
                    total_processed,
                    "Page complete"
                );
            }

            SyncProgress::PageSkipped { source, cursor } => {
                tracing::info!(%source, cursor, "Page skipped");
            }

            SyncProgress::PageError {
                source,
                cursor,
                error,
                consecutive,
            } => {
                tracing::warn!(%source, cursor, consecutive, error = %error, "Page error");
            }

            SyncProgress::Finalizing { source } => {
                tracing::info!(%source, "Finalizing");
            }

            SyncProgress::AttemptFinished {
                source,
                sync_type,
                completed,
                items_processed,
                items_added,
                duration_ms,
            } => {
                if completed {
                    tracing::info!(
                        %source,
                        %sync_type,
                        items_processed,
                        items_added,
                        duration_ms,
                        "Sync attempt completed"
                    );
                } else {
                    tracing::warn!(
                        %source,
                        %sync_type,
                        items_processed,
                        items_added,
                        duration_ms,
                        "Sync attempt did not complete"
                    );
                }
            }

            _ => {}
        }
    }
}
