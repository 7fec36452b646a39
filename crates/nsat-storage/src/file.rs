//! Results directory written by the engine

use crate::{
    error::Result,
    schemas::ByteOrder,
    spikelog::SpikeLog,
};

use std::path::{Path, PathBuf};

/// Extension of spike-log files
pub const SPIKE_LOG_EXTENSION: &str = "dat";

/// Directory holding one spike log per monitored population
pub struct ResultsDir {
    /// Base directory
    base_dir: PathBuf,
}

impl ResultsDir {
    /// Wrap an existing results directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Base directory
    pub fn path(&self) -> &Path {
        &self.base_dir
    }

    /// Name of the simulation-wide log, which is not a per-population raster
    pub fn simulation_log_name(sim_name: &str) -> String {
        format!("sim_{}.{}", sim_name, SPIKE_LOG_EXTENSION)
    }

    /// Spike-log files in the directory, sorted by file name
    ///
    /// The simulation-wide `sim_<sim_name>.dat` file is skipped.
    pub fn spike_logs(&self, sim_name: &str) -> Result<Vec<PathBuf>> {
        let skip = Self::simulation_log_name(sim_name);
        let mut logs = Vec::new();

        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(SPIKE_LOG_EXTENSION) {
                continue;
            }
            if path.file_name().and_then(|n| n.to_str()) == Some(skip.as_str()) {
                log::debug!("skipping simulation log {}", path.display());
                continue;
            }
            logs.push(path);
        }

        logs.sort();
        Ok(logs)
    }

    /// Decode every spike log in the directory
    pub fn read_spike_logs(
        &self,
        sim_name: &str,
        order: ByteOrder,
    ) -> Result<Vec<(PathBuf, SpikeLog)>> {
        self.spike_logs(sim_name)?
            .into_iter()
            .map(|path| {
                let log = SpikeLog::read(&path, order)?;
                Ok((path, log))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spikelog::encode;

    #[test]
    fn test_spike_logs_skip_simulation_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        for name in ["exc.dat", "inh.dat", "sim_test_spike_trains.dat", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.join("nested.dat")).unwrap();

        let results = ResultsDir::new(dir);
        let names: Vec<_> = results
            .spike_logs("test_spike_trains")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["exc.dat", "inh.dat"]);

        // A different simulation name keeps the file.
        assert_eq!(results.spike_logs("other").unwrap().len(), 3);
    }

    #[test]
    fn test_read_spike_logs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let bytes = encode(&[0; 5], &[1, 2, 3, 4], ByteOrder::Little).unwrap();
        std::fs::write(temp_dir.path().join("a.dat"), &bytes).unwrap();
        std::fs::write(temp_dir.path().join("b.dat"), &bytes[..21]).unwrap();

        let results = ResultsDir::new(temp_dir.path());
        // The truncated second file fails the whole read.
        assert!(results.read_spike_logs("x", ByteOrder::Little).is_err());

        std::fs::remove_file(temp_dir.path().join("b.dat")).unwrap();
        let logs = results.read_spike_logs("x", ByteOrder::Little).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].1.spike_count(), 2);
    }

    #[test]
    fn test_missing_directory() {
        let results = ResultsDir::new("/nonexistent/results");
        assert!(results.spike_logs("x").is_err());
    }
}
