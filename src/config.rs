//! Knobs for the symbol-entry pass.

use smol_str::SmolStr;

/// Settings shared by every pass invocation in a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnterConfig {
    /// Suffix of synthesized initializer names: `<container>.<suffix>`.
    pub init_suffix: SmolStr,
    /// Name of the self parameter added to connector initializers.
    pub connector_param: SmolStr,
    /// Package name used when a package has no package declaration.
    pub default_package: SmolStr,
}

impl EnterConfig {
    pub fn with_init_suffix(mut self, suffix: impl Into<SmolStr>) -> Self {
        self.init_suffix = suffix.into();
        self
    }

    pub fn with_connector_param(mut self, name: impl Into<SmolStr>) -> Self {
        self.connector_param = name.into();
        self
    }

    pub fn with_default_package(mut self, name: impl Into<SmolStr>) -> Self {
        self.default_package = name.into();
        self
    }

    /// Full name of the initializer generated for `container`.
    pub fn init_name(&self, container: &str) -> String {
        format!("{}.{}", container, self.init_suffix)
    }
}

impl Default for EnterConfig {
    fn default() -> Self {
        Self {
            init_suffix: SmolStr::new_static("<init>"),
            connector_param: SmolStr::new_static("connector"),
            default_package: SmolStr::new_static("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_init_name() {
        let config = EnterConfig::default();
        assert_eq!(config.init_name("ClientConnector"), "ClientConnector.<init>");
    }

    #[test]
    fn test_builder_overrides() {
        let config = EnterConfig::default()
            .with_init_suffix("__init")
            .with_connector_param("self")
            .with_default_package("main");

        assert_eq!(config.init_name("pkg"), "pkg.__init");
        assert_eq!(config.connector_param, "self");
        assert_eq!(config.default_package, "main");
    }
}
