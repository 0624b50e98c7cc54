use tokio::sync::mpsc;
use wiremock::MockServer;

use crate::{ErrorCounters, Fetcher, Outcome, Target};

/// CDX endpoint of the given mock server
pub(crate) fn archive_url(mock_server: &MockServer) -> String {
    format!("{}{}", mock_server.uri(), ::test_utils::CDX_PATH)
}

/// Fetch a single target and gather everything it emits
pub(crate) async fn collect(
    fetcher: &Fetcher,
    target: &Target,
    counters: &ErrorCounters,
) -> (Outcome, Vec<String>) {
    let (sender, mut receiver) = mpsc::channel(16);
    let drain = tokio::spawn(async move {
        let mut lines = Vec::new();
        while let Some(line) = receiver.recv().await {
            lines.push(line);
        }
        lines
    });

    let outcome = fetcher.fetch(target, &sender, counters).await;
    drop(sender);
    (outcome, drain.await.expect("Drain task panicked"))
}
