use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Save a fitted model to a pretty-printed JSON file.
pub fn save_model<M: Serialize, P: AsRef<Path>>(model: &M, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(model)?;
    fs::write(path, json).map_err(|source| IoError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "saved model");
    Ok(())
}

/// Load a model previously written by [`save_model`].
pub fn load_model<M: DeserializeOwned, P: AsRef<Path>>(path: P) -> IoResult<M> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| IoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let model: M = serde_json::from_str(&json)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stump {
        threshold: f64,
        values: Vec<f64>,
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fare_model.json");
        let model = Stump { threshold: 2.5, values: vec![8.0, 17.5] };

        save_model(&model, &path).unwrap();
        let loaded: Stump = load_model(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result: IoResult<Stump> = load_model(dir.path().join("nope.json"));
        assert!(matches!(result, Err(IoError::Open { .. })));
    }

    #[test]
    fn test_load_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let result: IoResult<Stump> = load_model(&path);
        assert!(matches!(result, Err(IoError::Json(_))));
    }
}
