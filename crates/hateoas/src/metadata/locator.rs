use std::path::{Path, PathBuf};

/// Finds metadata files for a class in a set of directories.
///
/// `app::model::User` maps to `app.model.User.<ext>`. A directory may be
/// registered for a namespace prefix, in which case only classes under that
/// prefix are looked up there and the prefix is stripped from the file name:
/// with prefix `app::model`, the same class maps to `User.<ext>`.
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    directories: Vec<(String, PathBuf)>,
}

impl FileLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory(&mut self, directory: impl Into<PathBuf>) {
        self.add_directory_with_prefix("", directory);
    }

    pub fn add_directory_with_prefix(&mut self, prefix: impl Into<String>, directory: impl Into<PathBuf>) {
        let prefix = prefix.into();
        self.directories
            .push((prefix.trim_end_matches("::").to_string(), directory.into()));
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(|(_, dir)| dir.as_path())
    }

    /// First existing file for `class_name` with one of `extensions`.
    pub fn find_file_for_class(&self, class_name: &str, extensions: &[&str]) -> Option<PathBuf> {
        for (prefix, directory) in &self.directories {
            let relative = if prefix.is_empty() {
                class_name
            } else {
                match class_name
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_prefix("::"))
                {
                    Some(rest) => rest,
                    None => continue,
                }
            };
            let stem = relative.replace("::", ".");
            for extension in extensions {
                let candidate = directory.join(format!("{stem}.{extension}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}
