use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::API;
use crate::domain::{Bar, Chunk};

/// Abstract interface for fetching bar chunks from a remote source.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch chunks covering the half-open pagination range `[start, end)`.
    /// An empty vec means the source has nothing for that range.
    async fn fetch_chunks(
        &self,
        symbol: &str,
        timeframe_minutes: u32,
        start: u64,
        end: u64,
    ) -> Result<Vec<Chunk>>;
}

/// Wire shape of one bar inside a chunk. Times are relative to the chunk.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BarDto {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    tick_volume: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChunkDto {
    chunk_start: i64,
    bars: Vec<BarDto>,
}

impl From<BarDto> for Bar {
    fn from(dto: BarDto) -> Self {
        Bar::new(dto.time, dto.open, dto.high, dto.low, dto.close, dto.tick_volume)
    }
}

impl From<ChunkDto> for Chunk {
    fn from(dto: ChunkDto) -> Self {
        Chunk {
            chunk_start: dto.chunk_start,
            bars: dto.bars.into_iter().map(Bar::from).collect(),
        }
    }
}

/// Chunked-bars REST endpoint client.
pub struct ChunkedHttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl ChunkedHttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(API.client.timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl BarSource for ChunkedHttpSource {
    async fn fetch_chunks(
        &self,
        symbol: &str,
        timeframe_minutes: u32,
        start: u64,
        end: u64,
    ) -> Result<Vec<Chunk>> {
        let chunks: Vec<ChunkDto> = self
            .client
            .get(&self.base_url)
            .query(&[
                ("Broker", API.broker),
                ("Symbol", symbol),
                ("Timeframe", &timeframe_minutes.to_string()),
                ("Start", &start.to_string()),
                ("End", &end.to_string()),
                ("UseMessagePack", "false"),
            ])
            .send()
            .await
            .with_context(|| format!("bar request failed for {symbol} [{start}, {end})"))?
            .error_for_status()
            .with_context(|| format!("bar endpoint rejected {symbol} [{start}, {end})"))?
            .json()
            .await
            .with_context(|| format!("malformed chunk payload for {symbol} [{start}, {end})"))?;

        log::debug!(
            "fetched [{start}, {end}) for {symbol}: {} bars in {} chunks",
            chunks.iter().map(|c| c.bars.len()).sum::<usize>(),
            chunks.len()
        );

        Ok(chunks.into_iter().map(Chunk::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_payload_deserializes_with_wire_names() {
        let payload = r#"[{
            "ChunkStart": 1609459200,
            "Bars": [
                { "Time": 0, "Open": 1.1, "High": 1.2, "Low": 1.0, "Close": 1.15, "TickVolume": 42 },
                { "Time": 3600, "Open": 1.15, "High": 1.3, "Low": 1.1, "Close": 1.25, "TickVolume": 17 }
            ]
        }]"#;

        let dtos: Vec<ChunkDto> = serde_json::from_str(payload).expect("payload parses");
        let chunk: Chunk = dtos.into_iter().next().map(Chunk::from).expect("one chunk");

        assert_eq!(chunk.chunk_start, 1_609_459_200);
        assert_eq!(chunk.bars.len(), 2);
        assert_eq!(chunk.bars[1].time, 3600);
        assert_eq!(chunk.bars[1].tick_volume, 17);

        let normalized = chunk.normalize();
        assert_eq!(normalized[0].time, 1_609_459_200);
        assert_eq!(normalized[1].time, 1_609_462_800);
    }
}
