use std::borrow::Cow;
use std::fs;
use std::path::Path;

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::namespace::Namespace;

/// Declarative initial tree, loaded from a YAML manifest:
///
/// ```yaml
/// tree:
///   home:
///     alice:
///       notes.txt:
///   tmp: {}
/// ```
///
/// A mapping value is a directory (possibly empty), a null value is a
/// file. Entries of any other shape are skipped with a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedManifest {
    entries: Vec<SeedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SeedEntry {
    File {
        name: String,
    },
    Directory {
        name: String,
        entries: Vec<SeedEntry>,
    },
}

impl SeedManifest {
    pub fn read(path: &Path) -> Result<Self, SeedManifestError> {
        debug!("Reading seed manifest: {}", path.display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;

        contents.as_str().try_into()
    }

    /// Replays the manifest into `namespace` depth-first, through its
    /// public operations only, and returns the cursor to the root.
    ///
    /// Collisions and rejected names are reported and skipped; seeding
    /// never fails an otherwise healthy namespace.
    pub fn apply(&self, namespace: &Namespace) {
        Self::apply_entries(namespace, "/", &self.entries);
        if let Err(error) = namespace.change_directory("/") {
            warn!("Failed to restore the cursor to the root: {}", error);
        }
    }

    fn apply_entries(namespace: &Namespace, directory_path: &str, entries: &[SeedEntry]) {
        for entry in entries {
            if let Err(error) = namespace.change_directory(directory_path) {
                warn!("Skipping seed entries under '{}': {}", directory_path, error);
                return;
            }

            match entry {
                SeedEntry::File { name } => {
                    if let Err(error) = namespace.create_file(name) {
                        warn!("Skipping seed file '{}': {}", name, error);
                    }
                }
                SeedEntry::Directory { name, entries } => {
                    if let Err(error) = namespace.create_directory(name) {
                        warn!("Skipping seed directory '{}': {}", name, error);
                        continue;
                    }
                    let child_path = if directory_path == "/" {
                        format!("/{}", name)
                    } else {
                        format!("{}/{}", directory_path, name)
                    };
                    Self::apply_entries(namespace, &child_path, entries);
                }
            }
        }
    }

    fn parse_entries(mapping: &LinkedHashMap<Yaml, Yaml>) -> Vec<SeedEntry> {
        mapping
            .iter()
            .filter_map(|(key, value)| {
                let Yaml::Value(Scalar::String(name)) = key else {
                    debug!("Skipping seed entry with a non-string name: {:?}", key);
                    return None;
                };

                match value {
                    Yaml::Mapping(children) => Some(SeedEntry::Directory {
                        name: name.to_string(),
                        entries: Self::parse_entries(children),
                    }),
                    Yaml::Value(Scalar::Null) => Some(SeedEntry::File {
                        name: name.to_string(),
                    }),
                    _ => {
                        warn!("Skipping seed entry '{}' with an unsupported shape", name);
                        None
                    }
                }
            })
            .collect()
    }
}

impl TryFrom<&str> for SeedManifest {
    type Error = SeedManifestError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec = Yaml::load_from_str(contents)
            .map_err(|e| SeedManifestError::ParseError { source: e })?;
        let contents = contents_vec
            .get(0)
            .ok_or(SeedManifestError::MalformedManifest)?;

        let top_level = contents
            .as_mapping()
            .ok_or(SeedManifestError::TopLevelNotMap)?;

        let empty_tree = Yaml::Mapping(LinkedHashMap::new());
        let tree = top_level
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("tree"))))
            .unwrap_or(&empty_tree)
            .as_mapping()
            .ok_or(SeedManifestError::TreeNotMap)?;

        Ok(SeedManifest {
            entries: Self::parse_entries(tree),
        })
    }
}

#[derive(Debug, Snafu)]
pub enum SeedManifestError {
    #[snafu(display("Failed to read the seed manifest: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the seed manifest"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted seed manifest"))]
    MalformedManifest,
    #[snafu(display("Top level of the seed manifest should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The tree section should be a map"))]
    TreeNotMap,
}
