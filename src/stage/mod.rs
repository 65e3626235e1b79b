use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::fs;

/// A directory holding one document per location, named after a sanitized key.
#[derive(Debug, Clone)]
pub struct Staging {
    root: PathBuf,
    extension: &'static str,
}

impl Staging {
    pub fn new(root: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            root: root.into(),
            extension,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", sanitize_key(key), self.extension))
    }

    /// Makes `docs` the full contents of the directory, creating it if needed.
    pub async fn replace_all<K, T>(&self, docs: impl IntoIterator<Item = (K, T)>) -> io::Result<()>
    where
        K: AsRef<str>,
        T: AsRef<[u8]>,
    {
        self.clear().await?;
        for (key, contents) in docs {
            self.write(key.as_ref(), contents).await?;
        }
        Ok(())
    }

    pub async fn write(&self, key: &str, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let path = self.path_for(key);
        fs::write(&path, contents).await?;
        log::trace!("wrote {}", path.display());
        Ok(())
    }

    /// Every staged document as `(key, contents)`, sorted by key.
    pub async fn read_all(&self) -> io::Result<Vec<(String, String)>> {
        let mut docs = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let key = key.to_owned();
            docs.push((key, fs::read_to_string(&path).await?));
        }
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }

    async fn clear(&self) -> io::Result<()> {
        if !fs::try_exists(&self.root).await? {
            return fs::create_dir_all(&self.root).await;
        }
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
            }
        }
        Ok(())
    }
}

/// Turns a location or food name into a file name: ASCII alphanumerics, `-`, `_`, `.` and
/// spaces are kept, anything else becomes `_`.
pub fn sanitize_key(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if key.is_empty() {
        "_".to_owned()
    } else {
        key
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("umich_menu-{name}-{}-{nanos}", std::process::id()))
}
