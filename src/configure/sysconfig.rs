//! Build-variable lookup capability.

use std::collections::HashMap;

/// Source of named build variables from the host's build configuration.
pub trait SysConfig {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment.
pub struct EnvSysConfig;

impl SysConfig for EnvSysConfig {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory variables, for tests and fixtures.
#[derive(Default)]
pub struct MapSysConfig {
    vars: HashMap<String, String>,
}

impl MapSysConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl SysConfig for MapSysConfig {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
