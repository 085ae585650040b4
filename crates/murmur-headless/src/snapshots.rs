use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::Writer;
use murmur_core::sim::Flock;

/// Snapshot writer for per-agent state dumps
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn snapshot_path(&self, step: u32) -> PathBuf {
        self.output_dir.join(format!("agents_{:04}.csv", step))
    }

    /// Write agent positions and velocities to CSV
    pub fn write_agents_snapshot(&self, step: u32, flock: &Flock) -> Result<PathBuf> {
        let filepath = self.snapshot_path(step);
        let file = File::create(&filepath)?;
        let mut csv_writer = Writer::from_writer(file);

        csv_writer.write_record(["id", "x", "y", "z", "vx", "vy", "vz"])?;

        for (i, agent) in flock.agents().iter().enumerate() {
            csv_writer.write_record(&[
                i.to_string(),
                agent.position.x.to_string(),
                agent.position.y.to_string(),
                agent.position.z.to_string(),
                agent.velocity.x.to_string(),
                agent.velocity.y.to_string(),
                agent.velocity.z.to_string(),
            ])?;
        }

        csv_writer.flush()?;

        Ok(filepath)
    }
}
