use crate::domain::{Registry, TableFormatter};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PersistenceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Replaces `path` with `content` through a temp file in the same directory.
///
/// Readers see either the old file or the new one, never a partial write.
fn atomic_write(path: &Path, content: &[u8]) -> PersistenceResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| PersistenceError::io(parent, e))?;
    tmp.write_all(content).map_err(|e| PersistenceError::io(path, e))?;
    tmp.flush().map_err(|e| PersistenceError::io(path, e))?;
    tmp.persist(path).map_err(|e| PersistenceError::io(path, e.error))?;
    Ok(())
}

/// Writes the city and road tables after each change to the registry.
#[derive(Debug, Clone)]
pub struct TableWriter {
    cities_path: PathBuf,
    roads_path: PathBuf,
}

impl TableWriter {
    pub fn new(cities_path: impl Into<PathBuf>, roads_path: impl Into<PathBuf>) -> Self {
        Self {
            cities_path: cities_path.into(),
            roads_path: roads_path.into(),
        }
    }

    pub fn cities_path(&self) -> &Path {
        &self.cities_path
    }

    pub fn roads_path(&self) -> &Path {
        &self.roads_path
    }

    /// Overwrites both tables with the current registry contents.
    ///
    /// The two files are written one after the other; if the second write
    /// fails the first one has already been replaced.
    pub fn write_snapshot(&self, registry: &Registry) -> PersistenceResult<()> {
        atomic_write(&self.cities_path, TableFormatter::cities_table(registry).as_bytes())?;
        atomic_write(&self.roads_path, TableFormatter::roads_table(registry).as_bytes())?;
        tracing::debug!(
            cities = %self.cities_path.display(),
            roads = %self.roads_path.display(),
            "tables written"
        );
        Ok(())
    }
}

/// Saves and restores the whole registry as JSON.
pub struct FileRepository;

impl FileRepository {
    pub fn save_registry(registry: &Registry, path: &Path) -> PersistenceResult<PathBuf> {
        let json = serde_json::to_string_pretty(registry)?;
        atomic_write(path, json.as_bytes())?;
        Ok(path.to_path_buf())
    }

    /// Loads a snapshot, rejecting data that breaks any registry invariant.
    pub fn load_registry(path: &Path) -> PersistenceResult<Registry> {
        let content = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Serialize)]
struct RoadRecord<'a> {
    nbr: usize,
    road: String,
    from: &'a str,
    to: &'a str,
    budget: f64,
}

pub struct CsvExporter;

impl CsvExporter {
    /// Writes the road table as CSV and returns the number of roads written.
    pub fn export_roads(registry: &Registry, path: &Path) -> PersistenceResult<usize> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut count = 0;
        for road in registry.roads() {
            writer.serialize(RoadRecord {
                nbr: road.number,
                road: road.label(),
                from: &road.from.name,
                to: &road.to.name,
                budget: road.budget,
            })?;
            count += 1;
        }
        if count == 0 {
            writer.write_record(["nbr", "road", "from", "to", "budget"])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PersistenceError::io(path, std::io::Error::other(e.to_string())))?;
        atomic_write(path, &bytes)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry.add_city("Kigali").unwrap();
        registry.add_city("Huye").unwrap();
        registry.add_road("Kigali", "Huye").unwrap();
        registry.set_budget("Kigali", "Huye", 56.7).unwrap();
        registry
    }

    #[test]
    fn test_write_snapshot_creates_both_tables() {
        let dir = tempdir().unwrap();
        let writer = TableWriter::new(dir.path().join("cities.txt"), dir.path().join("roads.txt"));

        writer.write_snapshot(&sample_registry()).unwrap();

        let cities = fs::read_to_string(writer.cities_path()).unwrap();
        let roads = fs::read_to_string(writer.roads_path()).unwrap();
        assert!(cities.starts_with("Index   City_Name"));
        assert!(cities.contains("2       Huye"));
        assert!(roads.contains("1.   Kigali-Huye              56.7"));
    }

    #[test]
    fn test_write_snapshot_overwrites() {
        let dir = tempdir().unwrap();
        let writer = TableWriter::new(dir.path().join("cities.txt"), dir.path().join("roads.txt"));
        fs::write(writer.roads_path(), "stale content that is much longer than the new table\n".repeat(10)).unwrap();

        writer.write_snapshot(&Registry::new()).unwrap();

        let roads = fs::read_to_string(writer.roads_path()).unwrap();
        assert_eq!(roads, "Nbr  Road                     Budget    \n");
    }

    #[test]
    fn test_write_snapshot_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data").join("out");
        let writer = TableWriter::new(nested.join("cities.txt"), nested.join("roads.txt"));

        writer.write_snapshot(&sample_registry()).unwrap();
        assert!(nested.join("cities.txt").exists());
    }

    #[test]
    fn test_write_snapshot_reports_unwritable_destination() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let writer = TableWriter::new(blocker.join("cities.txt"), blocker.join("roads.txt"));

        let result = writer.write_snapshot(&sample_registry());
        assert!(matches!(result, Err(PersistenceError::Io { .. })));
    }

    #[test]
    fn test_save_and_load_registry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");
        let registry = sample_registry();

        let saved = FileRepository::save_registry(&registry, &path).unwrap();
        assert_eq!(saved, path);

        let loaded = FileRepository::load_registry(&path).unwrap();
        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_load_registry_failures() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            FileRepository::load_registry(&missing),
            Err(PersistenceError::Io { .. })
        ));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(
            FileRepository::load_registry(&garbage),
            Err(PersistenceError::Json(_))
        ));

        let oversized = dir.path().join("oversized.json");
        fs::write(
            &oversized,
            r#"{"cities":[],"roads":{"dim":18446744073709551615,"cells":[]},"budgets":{"dim":0,"cells":[]}}"#,
        )
        .unwrap();
        assert!(matches!(
            FileRepository::load_registry(&oversized),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_export_roads_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roads.csv");

        let count = CsvExporter::export_roads(&sample_registry(), &path).unwrap();
        assert_eq!(count, 1);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["nbr,road,from,to,budget", "1,Kigali-Huye,Kigali,Huye,56.7"]);
    }

    #[test]
    fn test_export_roads_csv_without_roads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roads.csv");

        let count = CsvExporter::export_roads(&Registry::new(), &path).unwrap();
        assert_eq!(count, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "nbr,road,from,to,budget\n");
    }
}
