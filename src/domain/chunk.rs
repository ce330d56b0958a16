use crate::domain::Bar;

/// A batch of bars from the remote source sharing a relative time origin.
/// Bar times inside a chunk are offsets from `chunk_start`; a chunk is
/// discarded once normalized.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Shared time origin, seconds since epoch
    pub chunk_start: i64,
    pub bars: Vec<Bar>,
}

impl Chunk {
    /// Rebases every bar onto absolute epoch seconds.
    pub fn normalize(self) -> Vec<Bar> {
        let origin = self.chunk_start;
        self.bars
            .into_iter()
            .map(|bar| Bar { time: bar.time + origin, ..bar })
            .collect()
    }
}

/// Flattens a chunk sequence into absolute-time bars, in arrival order.
pub fn normalize_chunks(chunks: Vec<Chunk>) -> Vec<Bar> {
    chunks.into_iter().flat_map(Chunk::normalize).collect()
}
