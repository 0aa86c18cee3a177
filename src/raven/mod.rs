//! Black-box interface to the external Raven hydrological model.
//!
//! The engine is an independently validated executable: a parameter vector
//! and a forcing file go in, hydrograph artifacts come out. Nothing of its
//! internals is reimplemented here.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};

/// Output files of one model run.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrographArtifact {
    pub hydrograph: PathBuf,
    pub storage: PathBuf,
    pub solution: PathBuf,
    pub diagnostics: PathBuf,
}

/// A hydrological simulation engine: parameter vector plus forcing data in,
/// hydrograph artifact out.
pub trait HydrologicalModel {
    fn run(&self, params: &[f64], forcing: &Path, workdir: &Path) -> Result<HydrographArtifact>;
}

/// One named parameterization for a multi-model run.
#[derive(Debug, Clone)]
pub struct NamedParameterization {
    pub name: String,
    pub params: Vec<f64>,
}

/// Runs the Raven executable in a scratch working directory.
pub struct RavenRunner {
    executable: PathBuf,
}

impl RavenRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl HydrologicalModel for RavenRunner {
    fn run(&self, params: &[f64], forcing: &Path, workdir: &Path) -> Result<HydrographArtifact> {
        fs::create_dir_all(workdir)?;
        let params_file = write_params_file(workdir, params)?;

        debug!(
            executable = %self.executable.display(),
            forcing = %forcing.display(),
            workdir = %workdir.display(),
            "launching model run"
        );
        let output = Command::new(&self.executable)
            .arg(forcing)
            .arg(&params_file)
            .current_dir(workdir)
            .output()
            .map_err(|e| {
                AnalysisError::ModelRun(format!(
                    "failed to launch '{}': {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::ModelRun(format!(
                "'{}' exited with {}: {}",
                self.executable.display(),
                output.status,
                stderr.trim()
            )));
        }

        let artifact = HydrographArtifact {
            hydrograph: workdir.join("hydrograph.nc"),
            storage: workdir.join("storage.nc"),
            solution: workdir.join("solution.rvc"),
            diagnostics: workdir.join("diagnostics.csv"),
        };
        for path in [
            &artifact.hydrograph,
            &artifact.storage,
            &artifact.solution,
            &artifact.diagnostics,
        ] {
            if !path.exists() {
                return Err(AnalysisError::ModelRun(format!(
                    "model run did not produce '{}'",
                    path.display()
                )));
            }
        }
        info!(workdir = %workdir.display(), "model run complete");
        Ok(artifact)
    }
}

/// Run several named parameterizations against the same forcing file, each
/// in its own subdirectory of `workdir`.
pub fn run_multi_model<M: HydrologicalModel>(
    model: &M,
    runs: &[NamedParameterization],
    forcing: &Path,
    workdir: &Path,
) -> Result<Vec<(String, HydrographArtifact)>> {
    let mut artifacts = Vec::with_capacity(runs.len());
    for run in runs {
        let subdir = workdir.join(&run.name);
        let artifact = model.run(&run.params, forcing, &subdir)?;
        artifacts.push((run.name.clone(), artifact));
    }
    Ok(artifacts)
}

/// Write the parameter vector as one value per line, the form the model
/// template expects.
fn write_params_file(workdir: &Path, params: &[f64]) -> Result<PathBuf> {
    let path = workdir.join("params.txt");
    let mut file = fs::File::create(&path)?;
    for param in params {
        writeln!(file, "{}", param)?;
    }
    Ok(path)
}
