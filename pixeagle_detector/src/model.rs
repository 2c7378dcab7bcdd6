//! Model directory management: `list_models`/`upload`/`delete`/`download`
//! operate on plain files under one directory, independent of whichever
//! backend ends up loading a model's bytes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DetectorError;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    pub size_bytes: u64,
}

pub struct ModelRegistry {
    directory: PathBuf,
}

impl ModelRegistry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.directory.join(id)
    }

    pub fn list_models(&self) -> Result<Vec<ModelInfo>, DetectorError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }
        let mut models = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();
            let size_bytes = entry.metadata()?.len();
            models.push(ModelInfo { id, size_bytes });
        }
        models.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(models)
    }

    pub fn upload(&self, id: &str, data: &[u8]) -> Result<(), DetectorError> {
        fs::create_dir_all(&self.directory)?;
        fs::write(self.path_for(id), data)?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), DetectorError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(DetectorError::ModelNotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    pub fn download(&self, id: &str) -> Result<Vec<u8>, DetectorError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(DetectorError::ModelNotFound(id.to_string()));
        }
        Ok(fs::read(path)?)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn upload_then_list_then_download_roundtrips() {
        let dir = tempdir().unwrap();
        let registry = ModelRegistry::new(dir.path());
        registry.upload("yolo-v8n", b"weights").unwrap();

        let models = registry.list_models().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "yolo-v8n");

        let data = registry.download("yolo-v8n").unwrap();
        assert_eq!(data, b"weights");
    }

    #[test]
    fn delete_removes_model() {
        let dir = tempdir().unwrap();
        let registry = ModelRegistry::new(dir.path());
        registry.upload("yolo-v8n", b"weights").unwrap();
        registry.delete("yolo-v8n").unwrap();
        assert!(registry.list_models().unwrap().is_empty());
    }

    #[test]
    fn download_of_missing_model_is_an_error() {
        let dir = tempdir().unwrap();
        let registry = ModelRegistry::new(dir.path());
        assert!(matches!(
            registry.download("nonexistent"),
            Err(DetectorError::ModelNotFound(_))
        ));
    }

    #[test]
    fn list_models_on_missing_directory_is_empty_not_an_error() {
        let registry = ModelRegistry::new("/nonexistent/path/for/pixeagle/test");
        assert!(registry.list_models().unwrap().is_empty());
    }
}
