//! `@@NAME@@` placeholder substitution.

use crate::configure::rules::{link_flags, platform_defines, version_tag, DIRECT_VARS};
use crate::configure::sysconfig::SysConfig;
use crate::error::BuildError;

fn token(name: &str) -> String {
    format!("@@{}@@", name)
}

fn required(cfg: &dyn SysConfig, name: &str) -> Result<String, BuildError> {
    cfg.var(name)
        .ok_or_else(|| BuildError::UndefinedVar(name.to_string()))
}

/// Substitute every recognized placeholder. Direct variables come from the
/// configuration verbatim; DEFINES, LDFLAGS, and VERSION are derived.
pub fn render(template: &str, cfg: &dyn SysConfig, platform: &str) -> Result<String, BuildError> {
    let mut out = template.to_string();
    for name in DIRECT_VARS {
        out = out.replace(&token(name), &required(cfg, name)?);
    }

    out = out.replace(&token("DEFINES"), platform_defines(platform));

    let ldflags = link_flags(&required(cfg, "LDFLAGS")?, &required(cfg, "LIBDIR")?);
    out = out.replace(&token("LDFLAGS"), &ldflags);

    let version = version_tag(&required(cfg, "VERSION")?)?;
    out = out.replace(&token("VERSION"), &version);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure::sysconfig::MapSysConfig;

    fn full_config() -> MapSysConfig {
        MapSysConfig::new()
            .set("CC", "cc")
            .set("CFLAGS", "-O2 -Wall")
            .set("INCLUDEPY", "/usr/include/python3.11")
            .set("LIBPL", "/usr/lib/python3.11/config")
            .set("LINKFORSHARED", "-Xlinker -export-dynamic")
            .set("LIBS", "-lpthread -lutil")
            .set("SYSLIBS", "-lm")
            .set("LDFLAGS", "-g")
            .set("LIBDIR", "/usr/lib")
            .set("VERSION", "3.11")
    }

    const TEMPLATE: &str = "CC = @@CC@@\nCFLAGS = @@CFLAGS@@ @@DEFINES@@ -I@@INCLUDEPY@@\n\
LDFLAGS = @@LDFLAGS@@ @@LINKFORSHARED@@\nLIBS = -L@@LIBPL@@ -lpython@@VERSION@@ @@LIBS@@ @@SYSLIBS@@\n";

    #[test]
    fn all_placeholders_are_replaced() {
        let out = render(TEMPLATE, &full_config(), "linux").unwrap();
        assert!(!out.contains("@@"), "leftover placeholder in: {}", out);
        assert!(out.contains("CC = cc\n"));
        assert!(out.contains("-I/usr/include/python3.11"));
        assert!(out.contains("-lpython3.11 "));
        assert!(out.contains("-g -L/usr/lib"));
    }

    #[test]
    fn undefined_variable_is_fatal() {
        let cfg = MapSysConfig::new().set("CC", "cc");
        let err = render(TEMPLATE, &cfg, "linux").unwrap_err();
        assert!(matches!(err, BuildError::UndefinedVar(_)));
    }

    #[test]
    fn defines_expand_per_platform() {
        let out = render(TEMPLATE, &full_config(), "freebsd").unwrap();
        assert!(out.contains("-DHAVE_FREEBSD_SENDFILE"));
        let out = render(TEMPLATE, &full_config(), "linux").unwrap();
        assert!(!out.contains("-DHAVE_FREEBSD_SENDFILE"));
    }

    #[test]
    fn legacy_version_gets_suffix() {
        let cfg = full_config().set("VERSION", "3.7");
        let out = render(TEMPLATE, &cfg, "linux").unwrap();
        assert!(out.contains("-lpython3.7m "));
    }
}
