// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vision runtime selection.
//
// Hosts may ship a shared vision runtime alongside the app. When one is
// installed and reachable it is preferred; otherwise the statically linked
// pipeline is bound at startup. Both drive the same `Pipeline`, so results
// do not depend on which one was chosen.

use std::ffi::OsString;
use std::path::PathBuf;

use scanwerk_core::ScannerConfig;
use scanwerk_core::error::Result;
use scanwerk_vision::Pipeline;
use tracing::{info, warn};

/// Environment variable naming the shared vision runtime library.
pub const RUNTIME_ENV: &str = "SCANWERK_VISION_RUNTIME";

/// A shared vision runtime found on this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedRuntime {
    pub library_path: PathBuf,
}

/// Look for a shared runtime via `SCANWERK_VISION_RUNTIME`.
pub fn locate_shared_runtime() -> Option<SharedRuntime> {
    locate_from(std::env::var_os(RUNTIME_ENV))
}

fn locate_from(value: Option<OsString>) -> Option<SharedRuntime> {
    let value = value.filter(|v| !v.is_empty())?;
    let library_path = PathBuf::from(value);
    if library_path.is_file() {
        Some(SharedRuntime { library_path })
    } else {
        warn!(
            path = %library_path.display(),
            "Shared vision runtime not found, using static pipeline"
        );
        None
    }
}

/// The vision implementation bound for this process.
#[derive(Debug, Clone)]
pub enum VisionBackend {
    Shared {
        runtime: SharedRuntime,
        pipeline: Pipeline,
    },
    Static {
        pipeline: Pipeline,
    },
}

impl VisionBackend {
    /// Prefer a shared runtime if one is installed, else the static pipeline.
    pub fn select(config: ScannerConfig) -> Result<Self> {
        Self::with_runtime(locate_shared_runtime(), config)
    }

    /// Bind to `runtime` when given, else to the static pipeline.
    pub fn with_runtime(runtime: Option<SharedRuntime>, config: ScannerConfig) -> Result<Self> {
        let pipeline = Pipeline::new(config)?;
        let backend = match runtime {
            Some(runtime) => Self::Shared { runtime, pipeline },
            None => Self::Static { pipeline },
        };
        info!(backend = backend.name(), "Vision backend selected");
        Ok(backend)
    }

    pub fn pipeline(&self) -> &Pipeline {
        match self {
            Self::Shared { pipeline, .. } | Self::Static { pipeline } => pipeline,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shared { .. } => "shared",
            Self::Static { .. } => "static",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_means_static() {
        assert_eq!(locate_from(None), None);
        assert_eq!(locate_from(Some(OsString::new())), None);
    }

    #[test]
    fn missing_library_falls_back() {
        assert_eq!(locate_from(Some("/no/such/libscanwerk_vision.so".into())), None);
    }

    #[test]
    fn existing_library_is_used() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = locate_from(Some(file.path().as_os_str().to_owned())).unwrap();
        assert_eq!(found.library_path, file.path());

        let backend = VisionBackend::with_runtime(Some(found), ScannerConfig::default()).unwrap();
        assert_eq!(backend.name(), "shared");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ScannerConfig::default();
        config.selection.min_area_fraction = 2.0;
        assert!(VisionBackend::with_runtime(None, config).is_err());
    }
}
