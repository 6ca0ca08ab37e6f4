use std::path::{Path, PathBuf};

use armviz_core::Trajectory;

/// Trajectory trace writer.
pub trait Tracer {
    /// Record a trajectory, replacing the previous record.
    fn write_trajectory(&self, trajectory: &Trajectory) -> crate::runtime::Result;
}

pub struct NullTracer;

impl Tracer for NullTracer {
    fn write_trajectory(&self, _: &Trajectory) -> crate::runtime::Result {
        Ok(())
    }
}

/// Write trajectories to a CSV file in a directory.
pub struct CsvTracer(PathBuf);

impl CsvTracer {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self(path.as_ref().join(crate::consts::TRACE_FILE_NAME))
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Tracer for CsvTracer {
    fn write_trajectory(&self, trajectory: &Trajectory) -> crate::runtime::Result {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::NonNumeric)
            .has_headers(true)
            .from_path(&self.0)?;

        for sample in trajectory.iter() {
            writer.serialize(sample)?;
        }

        writer.flush()?;

        log::debug!("Trace written to {}", self.0.display());

        Ok(())
    }
}
