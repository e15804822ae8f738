//! Build configurator for the panel's native gateway module: renders
//! `Makefile.in` into `Makefile` from the host interpreter's build
//! configuration.

pub mod rules;
pub mod sysconfig;
pub mod template;

pub use rules::*;
pub use sysconfig::{EnvSysConfig, MapSysConfig, SysConfig};
pub use template::render;

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Framework symlink name on framework-install platforms.
const FRAMEWORK_LINK: &str = "Python.framework";

/// Read `<dir>/Makefile.in`, substitute all recognized variables, write
/// `<dir>/Makefile`. A missing template or an undefined variable is fatal.
pub fn generate(dir: &Path, cfg: &dyn SysConfig, platform: &str) -> Result<PathBuf, BuildError> {
    let template_path = dir.join("Makefile.in");
    let template = std::fs::read_to_string(&template_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BuildError::TemplateMissing(template_path.display().to_string())
        } else {
            BuildError::Io(e)
        }
    })?;
    let rendered = render(&template, cfg, platform)?;
    let out_path = dir.join("Makefile");
    std::fs::write(&out_path, rendered)?;
    Ok(out_path)
}

/// Best-effort symlink to the framework install directory, for platforms that
/// install the interpreter as a framework. Failures are ignored; the link is
/// a convenience for the build, not a requirement.
pub fn link_framework(dir: &Path, cfg: &dyn SysConfig) {
    let Some(fw_path) = cfg.var("PYTHONFRAMEWORKINSTALLDIR") else {
        return;
    };
    if fw_path.is_empty() {
        return;
    }
    let link = dir.join(FRAMEWORK_LINK);
    let _ = std::fs::remove_file(&link);
    #[cfg(unix)]
    if let Err(e) = std::os::unix::fs::symlink(&fw_path, &link) {
        tracing::debug!(error = %e, "framework symlink skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = MapSysConfig::new();
        let err = generate(dir.path(), &cfg, "linux").unwrap_err();
        assert!(matches!(err, BuildError::TemplateMissing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn framework_link_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = MapSysConfig::new().set(
            "PYTHONFRAMEWORKINSTALLDIR",
            dir.path().join("fw").display().to_string(),
        );
        // Target does not exist; symlink creation still succeeds or is ignored.
        link_framework(dir.path(), &cfg);
        link_framework(dir.path(), &cfg);

        let none = MapSysConfig::new();
        link_framework(dir.path(), &none);
    }
}
