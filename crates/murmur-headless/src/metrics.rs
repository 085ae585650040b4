use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use csv::Writer;
use murmur_core::sim::FlockStats;

const HEADER: [&str; 12] = [
    "step",
    "agent_count",
    "mean_speed",
    "max_speed",
    "mean_neighbors",
    "isolated_count",
    "over_speed_count",
    "centroid_x",
    "centroid_y",
    "centroid_z",
    "wall_time_ms",
    "fps_proxy",
];

/// Metrics writer for CSV output and performance logging
pub struct MetricsWriter<W: Write> {
    csv_writer: Writer<W>,
    rows_written: u32,
}

impl MetricsWriter<File> {
    /// Create `metrics.csv` inside `output_dir`
    pub fn new(output_dir: &Path) -> Result<Self, anyhow::Error> {
        let file = File::create(output_dir.join("metrics.csv"))?;
        Self::from_writer(file)
    }
}

impl<W: Write> MetricsWriter<W> {
    pub fn from_writer(writer: W) -> Result<Self, anyhow::Error> {
        let mut csv_writer = Writer::from_writer(writer);
        csv_writer.write_record(HEADER)?;
        Ok(Self {
            csv_writer,
            rows_written: 0,
        })
    }

    /// Write one row for the given step
    pub fn write_step(
        &mut self,
        step: u32,
        stats: &FlockStats,
        step_time: Duration,
    ) -> Result<(), anyhow::Error> {
        let wall_time_ms = step_time.as_micros() as f64 / 1000.0;
        let fps_proxy = if wall_time_ms > 0.0 { 1000.0 / wall_time_ms } else { 0.0 };

        self.csv_writer.write_record(&[
            step.to_string(),
            stats.agent_count.to_string(),
            stats.mean_speed.to_string(),
            stats.max_speed.to_string(),
            stats.mean_neighbors.to_string(),
            stats.isolated_count.to_string(),
            stats.over_speed_count.to_string(),
            stats.centroid.x.to_string(),
            stats.centroid.y.to_string(),
            stats.centroid.z.to_string(),
            wall_time_ms.to_string(),
            fps_proxy.to_string(),
        ])?;

        self.csv_writer.flush()?;
        self.rows_written += 1;

        Ok(())
    }

    pub fn rows_written(&self) -> u32 {
        self.rows_written
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W, anyhow::Error> {
        self.csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush metrics: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::glam::Vec3;

    #[test]
    fn writes_header_and_rows() {
        let mut writer = MetricsWriter::from_writer(Vec::new()).unwrap();
        let stats = FlockStats {
            agent_count: 3,
            mean_speed: 0.5,
            max_speed: 1.0,
            mean_neighbors: 2.0,
            isolated_count: 1,
            over_speed_count: 0,
            centroid: Vec3::new(1.0, 2.0, 3.0),
        };
        writer.write_step(0, &stats, Duration::from_millis(4)).unwrap();
        writer.write_step(50, &stats, Duration::ZERO).unwrap();
        assert_eq!(writer.rows_written(), 2);

        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("step,agent_count,mean_speed"));
        assert!(lines[1].starts_with("0,3,0.5,1,2,1,0,1,2,3,4,250"));
        assert!(lines[2].ends_with(",0,0"));
    }
}
