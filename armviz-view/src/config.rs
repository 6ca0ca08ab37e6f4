use armviz::{Config, Configurable, GlobalConfig};

#[derive(Clone, Debug)]
pub(crate) struct ViewConfig {
    /// Runtime configuration.
    pub runtime: Config,
    /// Global configuration.
    pub global: GlobalConfig,
}

impl Configurable for ViewConfig {
    fn global(&self) -> &GlobalConfig {
        &self.global
    }
}
