//! Background page reads, keeping file I/O off the UI task.
//!
//! Only the markup travels back over the channel: engine trees are built on
//! the UI task, which owns every tab.

use anyhow::Context;
use tokio::sync::mpsc;

use super::state::LoadRequest;
use super::tabs::TabId;

#[derive(Debug)]
pub struct PageLoad {
    pub tab: TabId,
    pub generation: u64,
    pub result: anyhow::Result<String>,
}

pub fn spawn_page_load(tx: mpsc::UnboundedSender<PageLoad>, request: LoadRequest) {
    tokio::spawn(async move {
        let t0 = std::time::Instant::now();
        let result = tokio::fs::read_to_string(&request.path)
            .await
            .with_context(|| format!("could not read {}", request.path.display()));
        tracing::debug!(
            "page read: {:.2?} path={} ok={}",
            t0.elapsed(),
            request.path.display(),
            result.is_ok()
        );
        let _ = tx.send(PageLoad {
            tab: request.tab,
            generation: request.generation,
            result,
        });
    });
}
