use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Files that every copy of `test-data` must contain.
const REQUIRED_FILES: [&str; 4] = ["greeting.txt", "unicode.txt", "blank.txt", "invalid.bin"];

/// An isolated copy of the `test-data` directory in its own temporary directory.
pub struct IsolatedData {
    /// The temporary directory containing the copy.
    _temp_dir: TempDir,
    /// Path to the data root.
    data_path: PathBuf,
}

impl IsolatedData {
    /// Copy `test-data` into a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let data_path = temp_dir.path().to_path_buf();

        // Handle both test-support and root manifest dirs.
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let source_path = if manifest_dir.ends_with("test-support") {
            manifest_dir
                .parent()
                .ok_or_else(|| anyhow::anyhow!("test-support has no parent directory"))?
                .join("test-data")
        } else {
            manifest_dir.join("test-data")
        };

        if !source_path.exists() {
            return Err(anyhow::anyhow!(
                "test-data not found at: {}",
                source_path.display()
            ));
        }

        copy_files(&source_path, &data_path)?;

        for file in REQUIRED_FILES {
            if !data_path.join(file).exists() {
                return Err(anyhow::anyhow!("Required file {} missing after copy", file));
            }
        }

        Ok(Self {
            _temp_dir: temp_dir,
            data_path,
        })
    }

    /// Get the path to the data directory.
    pub fn path(&self) -> &Path {
        &self.data_path
    }

    /// Get a path to a file within the data directory.
    pub fn file_path(&self, relative_path: &str) -> PathBuf {
        self.data_path.join(relative_path)
    }

    /// Write an extra file into the data directory and return its path.
    pub fn write_file(&self, relative_path: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.file_path(relative_path);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Copy the regular files of `src` into `dst`.
fn copy_files(src: &Path, dst: &Path) -> Result<()> {
    use std::fs;

    fs::create_dir_all(dst)?;

    let entries: Vec<_> = fs::read_dir(src)?.collect::<Result<Vec<_>, _>>()?;
    for entry in entries {
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }

    Ok(())
}
