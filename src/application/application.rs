use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::namespace::Namespace;
use crate::seed::{SeedManifest, SeedManifestError};
use crate::shell::{Shell, ShellError};

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();

        let namespace = Namespace::new();
        if let Some(seed_path) = &app_config.seed {
            let manifest = SeedManifest::read(seed_path).context(SeedManifestSnafu)?;
            debug!("Loaded seed manifest: {:?}", manifest);
            manifest.apply(&namespace);
            info!("Applied seed manifest from {}", seed_path.display());
        }

        Shell::new(namespace).run().context(ShellSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the seed manifest"))]
    SeedManifestError { source: SeedManifestError },
    #[snafu(display("Critical failure encountered while running the shell"))]
    ShellError { source: ShellError },
}
