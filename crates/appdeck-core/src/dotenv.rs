//! `.env` file reading

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Serialize;

/// Default environment file name in the app directory
pub const DOTENV_FILE: &str = ".env";

/// Parsed environment file, variables kept in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DotEnvFile {
    pub path: Utf8PathBuf,
    pub variables: IndexMap<String, String>,
}

impl DotEnvFile {
    /// Parse the file at `path` without touching the process environment
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let mut variables = IndexMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            variables.insert(key, value);
        }
        Ok(Self {
            path: path.to_owned(),
            variables,
        })
    }

    /// Read `<directory>/.env` when it exists
    pub fn read_optional(directory: &Utf8Path) -> Result<Option<Self>> {
        let path = directory.join(DOTENV_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_preserves_order_and_quotes() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::write(
            dir.join(".env"),
            "APPDECK_API_KEY=abc123\n# comment\nSCOPES=\"read_products,write_orders\"\n",
        )
        .unwrap();

        let dotenv = DotEnvFile::read_optional(&dir).unwrap().unwrap();
        assert_eq!(dotenv.get("APPDECK_API_KEY"), Some("abc123"));
        assert_eq!(dotenv.get("SCOPES"), Some("read_products,write_orders"));
        assert_eq!(
            dotenv.variables.keys().collect::<Vec<_>>(),
            vec!["APPDECK_API_KEY", "SCOPES"]
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert!(DotEnvFile::read_optional(&dir).unwrap().is_none());
    }
}
