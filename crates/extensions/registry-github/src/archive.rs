//! In-memory index of a repository zip archive.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use crate::error::GithubRegistryError;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: usize = 1 << 20;

/// Normalized path -> file contents of one repository snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveIndex {
    entries: BTreeMap<String, Bytes>,
}

impl ArchiveIndex {
    /// Decompress a zip archive.
    ///
    /// GitHub archives nest everything under one `<repo>-<ref>/` directory;
    /// when all entries share a single top-level directory it is stripped.
    pub fn from_zip(data: &[u8]) -> Result<Self, GithubRegistryError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| GithubRegistryError::Archive(e.to_string()))?;

        let mut files = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| GithubRegistryError::Archive(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().replace('\\', "/");
            let declared = usize::try_from(file.size()).unwrap_or(usize::MAX);
            let mut contents = Vec::with_capacity(declared.min(MAX_PREALLOC));
            file.read_to_end(&mut contents)
                .map_err(|e| GithubRegistryError::Archive(format!("{}: {}", name, e)))?;
            files.push((name, Bytes::from(contents)));
        }

        let root = common_root(files.iter().map(|(name, _)| name.as_str()));
        let entries = files
            .into_iter()
            .map(|(name, contents)| {
                let path = match &root {
                    Some(root) => name[root.len() + 1..].to_string(),
                    None => name,
                };
                (path, contents)
            })
            .filter(|(path, _)| !path.is_empty())
            .collect();

        Ok(Self { entries })
    }

    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, Bytes)>,
        P: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(p, b)| (p.into(), b)).collect(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&Bytes> {
        self.entries.get(path)
    }

    /// Contents of `path` as UTF-8 text; `None` if the path is absent.
    pub fn read_text(&self, path: &str) -> Option<Result<&str, GithubRegistryError>> {
        self.entries.get(path).map(|bytes| {
            std::str::from_utf8(bytes)
                .map_err(|e| GithubRegistryError::Archive(format!("{}: {}", path, e)))
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The top-level directory every name lives under, if there is exactly one.
fn common_root<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<String> {
    let first = names.next()?;
    let (root, _) = first.split_once('/')?;
    names
        .all(|name| {
            name.split_once('/')
                .is_some_and(|(top, _)| top == root)
        })
        .then(|| root.to_string())
}
