//! HTTP snapshot source: polls JSON endpoints and pushes each response into
//! the snapshot channel as one atomic delivery.

pub mod dto;

use futures::StreamExt;
use futures::future::{AbortHandle, Abortable};
use gloo_net::http::Request;
use gloo_timers::future::IntervalStream;

use crate::application::feed::{MarketSnapshot, SnapshotSender};
use crate::config::FeedConfig;
use crate::domain::{
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::{Candle, Ticker},
    trading::OpenPosition,
};
use crate::{log_debug, log_info, log_warn};

pub use dto::{parse_candles, parse_positions, parse_ticker};

#[derive(Debug, Clone, Default)]
pub struct SnapshotClient;

impl SnapshotClient {
    pub fn new() -> Self {
        Self
    }

    pub async fn fetch_candles(&self, url: &str) -> ChartResult<Vec<Candle>> {
        parse_candles(&self.get_text(url).await?)
    }

    pub async fn fetch_ticker(&self, url: &str) -> ChartResult<Ticker> {
        parse_ticker(&self.get_text(url).await?)
    }

    pub async fn fetch_positions(&self, url: &str) -> ChartResult<Vec<OpenPosition>> {
        parse_positions(&self.get_text(url).await?)
    }

    async fn get_text(&self, url: &str) -> ChartResult<String> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ChartError::Network(format!("GET {} failed: {}", url, e)))?;

        if !response.ok() {
            return Err(ChartError::Network(format!(
                "GET {} returned {} {}",
                url,
                response.status(),
                response.status_text()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ChartError::Network(format!("reading {} failed: {}", url, e)))
    }
}

/// Periodically fetches every configured endpoint
pub struct SnapshotPoller {
    client: SnapshotClient,
    config: FeedConfig,
}

impl SnapshotPoller {
    pub fn new(config: FeedConfig) -> Self {
        Self { client: SnapshotClient::new(), config }
    }

    pub fn has_endpoints(&self) -> bool {
        self.config.candles_url.is_some() || self.config.ticker_url.is_some() || self.config.positions_url.is_some()
    }

    /// Start polling on the browser event loop. Abort the returned handle to
    /// stop; polling also stops once the receiving side is gone.
    pub fn spawn(self, sender: SnapshotSender) -> AbortHandle {
        let (handle, registration) = AbortHandle::new_pair();
        log_info!(
            LogComponent::Infrastructure("SnapshotPoller"),
            "polling every {} ms",
            self.config.poll_interval_ms
        );

        let task = async move {
            self.poll_once(&sender).await;
            let mut ticks = IntervalStream::new(self.config.poll_interval_ms);
            while ticks.next().await.is_some() {
                if sender.is_closed() {
                    break;
                }
                self.poll_once(&sender).await;
            }
        };
        wasm_bindgen_futures::spawn_local(async move {
            if Abortable::new(task, registration).await.is_err() {
                log_debug!(LogComponent::Infrastructure("SnapshotPoller"), "polling aborted");
            }
        });
        handle
    }

    async fn poll_once(&self, sender: &SnapshotSender) {
        if let Some(url) = &self.config.candles_url {
            let result = self.client.fetch_candles(url).await.map(MarketSnapshot::Candles);
            Self::publish(sender, result);
        }
        if let Some(url) = &self.config.ticker_url {
            let result = self.client.fetch_ticker(url).await.map(|t| MarketSnapshot::Ticker(Some(t)));
            Self::publish(sender, result);
        }
        if let Some(url) = &self.config.positions_url {
            let result = self.client.fetch_positions(url).await.map(MarketSnapshot::Positions);
            Self::publish(sender, result);
        }
    }

    /// A failed fetch keeps the previous snapshot; the next tick retries
    fn publish(sender: &SnapshotSender, result: ChartResult<MarketSnapshot>) {
        match result.and_then(|snapshot| sender.publish(snapshot)) {
            Ok(()) => {}
            Err(e) => {
                log_warn!(LogComponent::Infrastructure("SnapshotPoller"), "snapshot skipped: {}", e);
            }
        }
    }
}
