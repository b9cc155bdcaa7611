#![warn(missing_docs)]
//! Deterministic testing surfaces for light propagation: a map-backed world
//! view, geometry helpers, a from-scratch reference relight, event logs and
//! metrics reports.

mod geometry;
mod invariant;
mod metrics;
mod snapshot;
mod stub;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use voxlight_world::LightUpdate;

pub use geometry::*;
pub use invariant::*;
pub use metrics::*;
pub use snapshot::*;
pub use stub::*;

/// One processed light batch, as written to the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightEventRecord<'a> {
    /// Zero-based batch index within the run.
    pub batch: usize,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Change records handed to the propagator.
    pub records: usize,
    /// Seeds left after duplicate resolution.
    pub seeds: usize,
    /// Voxels whose light changed.
    pub changed: usize,
    /// Frontier entries drained by both passes.
    pub nodes: usize,
}

impl<'a> LightEventRecord<'a> {
    /// Describe the outcome of batch `batch`.
    pub fn from_update(batch: usize, kind: &'a str, records: usize, update: &LightUpdate) -> Self {
        Self {
            batch,
            kind,
            records,
            seeds: update.seeds,
            changed: update.changed.len(),
            nodes: update.nodes_processed(),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append one serializable event to the log.
    pub fn write<T: Serialize>(&mut self, event: &T) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use voxlight_core::BlockPos;

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "light-events-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let update = LightUpdate {
            changed: vec![BlockPos::ZERO, BlockPos::new(1, 0, 0)],
            seeds: 1,
            decrease_visits: 0,
            increase_visits: 7,
        };

        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&LightEventRecord::from_update(0, "place", 1, &update))
            .expect("write succeeds");
        sink.write(&LightEventRecord::from_update(1, "noop", 0, &LightUpdate::default()))
            .expect("write succeeds");

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"batch":0,"kind":"place","records":1,"seeds":1,"changed":2,"nodes":7}"#
        );
        fs::remove_file(&path).ok();
    }
}
