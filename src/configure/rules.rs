//! Derivation rules for the variables the template cannot take verbatim.

use crate::error::BuildError;

/// Variables substituted directly from the build configuration.
pub const DIRECT_VARS: &[&str] = &[
    "CC",
    "CFLAGS",
    "INCLUDEPY",
    "LIBPL",
    "LINKFORSHARED",
    "LIBS",
    "SYSLIBS",
];

/// Legacy SDK marker in the base link flags that requires a minimum-OS flag.
pub const SDK_MARKER: &str = "MacOSX10.4u.sdk";
pub const MIN_OS_FLAG: &str = "-mmacosx-version-min=10.4";

/// Platform define string; non-empty only on FreeBSD, which has its own
/// sendfile signature.
pub fn platform_defines(platform: &str) -> &'static str {
    if platform.starts_with("freebsd") {
        "-DHAVE_FREEBSD_SENDFILE"
    } else {
        ""
    }
}

/// Base link flags with the library directory appended; the minimum-OS flag is
/// prepended when the legacy SDK marker is present.
pub fn link_flags(base: &str, libdir: &str) -> String {
    let flags = format!("{} -L{}", base, libdir);
    if flags.contains(SDK_MARKER) {
        format!("{} {}", MIN_OS_FLAG, flags)
    } else {
        flags
    }
}

fn parse_version(version: &str) -> Result<(u32, u32), BuildError> {
    let mut parts = version.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| BuildError::InvalidVersion(version.to_string()))?;
    let minor = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| BuildError::InvalidVersion(version.to_string()))?;
    Ok((major, minor))
}

/// Interpreters below 3.8 carry the legacy ABI suffix in library names.
pub fn needs_abi_suffix(major: u32, minor: u32) -> bool {
    (major, minor) < (3, 8)
}

/// Version string for the template, with the ABI suffix when required.
pub fn version_tag(version: &str) -> Result<String, BuildError> {
    let (major, minor) = parse_version(version)?;
    if needs_abi_suffix(major, minor) {
        Ok(format!("{}m", version))
    } else {
        Ok(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_only_on_freebsd() {
        assert_eq!(platform_defines("freebsd"), "-DHAVE_FREEBSD_SENDFILE");
        assert_eq!(platform_defines("freebsd13"), "-DHAVE_FREEBSD_SENDFILE");
        assert_eq!(platform_defines("linux"), "");
        assert_eq!(platform_defines("macos"), "");
    }

    #[test]
    fn link_flags_append_libdir() {
        assert_eq!(link_flags("-ldl", "/usr/lib"), "-ldl -L/usr/lib");
    }

    #[test]
    fn legacy_sdk_prepends_min_os_flag() {
        let flags = link_flags("-isysroot /SDKs/MacOSX10.4u.sdk", "/usr/lib");
        assert!(flags.starts_with("-mmacosx-version-min=10.4 "));

        let flags = link_flags("-isysroot /SDKs/MacOSX11.sdk", "/usr/lib");
        assert!(!flags.starts_with("-mmacosx-version-min"));
    }

    #[test]
    fn abi_suffix_below_3_8() {
        assert_eq!(version_tag("3.7").unwrap(), "3.7m");
        assert_eq!(version_tag("3.6").unwrap(), "3.6m");
        assert_eq!(version_tag("2.7").unwrap(), "2.7m");
        assert_eq!(version_tag("3.8").unwrap(), "3.8");
        assert_eq!(version_tag("3.11").unwrap(), "3.11");
    }

    #[test]
    fn unparsable_version_is_fatal() {
        assert!(matches!(
            version_tag("three.eight"),
            Err(BuildError::InvalidVersion(_))
        ));
        assert!(matches!(version_tag("3"), Err(BuildError::InvalidVersion(_))));
    }
}
