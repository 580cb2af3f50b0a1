//! Filesystem-backed JSON persistence for the finance collections.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use spendsmart_core::{CoreError, FinanceStorage};

const ENTRY_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores each entry as `{data_dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        tracing::debug!(path = %data_dir.display(), "json storage ready");
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_key(key), ENTRY_EXTENSION))
    }
}

impl FinanceStorage for JsonFileStorage {
    fn read_entry(&self, key: &str) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '.').is_empty() {
        "entry".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_json_files() {
        let storage = JsonFileStorage {
            data_dir: PathBuf::from("/data"),
        };
        assert_eq!(storage.entry_path("expenses"), Path::new("/data/expenses.json"));
        assert_eq!(
            storage.entry_path("budgets.corrupt"),
            Path::new("/data/budgets.corrupt.json")
        );
        assert_eq!(storage.entry_path("../etc"), Path::new("/data/.._etc.json"));
    }

    #[test]
    fn tmp_path_keeps_original_extension() {
        let tmp = tmp_path(Path::new("/data/expenses.json"));
        assert_eq!(tmp, Path::new("/data/expenses.json.tmp"));
    }
}
