//! Makefile generation end to end: template in, rendered file out.

use litepanel::configure::{generate, MapSysConfig};
use litepanel::BuildError;

fn build_config() -> MapSysConfig {
    MapSysConfig::new()
        .set("CC", "clang")
        .set("CFLAGS", "-O2")
        .set("INCLUDEPY", "/opt/py/include")
        .set("LIBPL", "/opt/py/config")
        .set("LINKFORSHARED", "-Xlinker -export-dynamic")
        .set("LIBS", "-lpthread")
        .set("SYSLIBS", "-lm")
        .set("LDFLAGS", "-g")
        .set("LIBDIR", "/opt/py/lib")
        .set("VERSION", "3.7")
}

const TEMPLATE: &str = "\
CC = @@CC@@
CFLAGS = @@CFLAGS@@ @@DEFINES@@ -I@@INCLUDEPY@@
LDFLAGS = @@LDFLAGS@@ @@LINKFORSHARED@@
LIBS = -L@@LIBPL@@ -lpython@@VERSION@@ @@LIBS@@ @@SYSLIBS@@
";

#[test]
fn renders_makefile_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Makefile.in"), TEMPLATE).unwrap();

    let out = generate(dir.path(), &build_config(), "freebsd").unwrap();
    assert_eq!(out, dir.path().join("Makefile"));

    let rendered = std::fs::read_to_string(out).unwrap();
    assert!(!rendered.contains("@@"), "leftover token: {}", rendered);
    assert!(rendered.contains("CC = clang"));
    assert!(rendered.contains("-DHAVE_FREEBSD_SENDFILE"));
    assert!(rendered.contains("LDFLAGS = -g -L/opt/py/lib"));
    assert!(rendered.contains("-lpython3.7m "));
}

#[test]
fn undefined_variable_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Makefile.in"), TEMPLATE).unwrap();

    let cfg = MapSysConfig::new().set("CC", "clang");
    let err = generate(dir.path(), &cfg, "linux").unwrap_err();
    assert!(matches!(err, BuildError::UndefinedVar(_)));
    assert!(!dir.path().join("Makefile").exists());
}

#[test]
fn missing_template_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate(dir.path(), &build_config(), "linux").unwrap_err();
    assert!(matches!(err, BuildError::TemplateMissing(_)));
}
