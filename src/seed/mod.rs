mod manifest;

pub use manifest::{SeedManifest, SeedManifestError};
