use super::bridge::Bridge;
use super::Structs::DEFAULT_REPORT_ID;
use crate::Core::descriptor::{DeviceAttributes, DeviceStrings};
use std::sync::Arc;

/// Well-known path at which the back side opens the bridge.
pub const DEFAULT_DEVICE_PATH: &str = r"\\.\CmsisDapBridge";

/// Static startup configuration of one bridge session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// The only report identifier accepted on the front side.
    pub report_id: u8,
    /// Path the back handle must be opened with.
    pub device_path: String,
    pub attributes: DeviceAttributes,
    pub strings: DeviceStrings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            report_id: DEFAULT_REPORT_ID,
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            attributes: DeviceAttributes::default(),
            strings: DeviceStrings::default(),
        }
    }
}

#[derive(Default)]
pub struct BridgeBuilder {
    config: BridgeConfig,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report_id(mut self, report_id: u8) -> Self {
        self.config.report_id = report_id;
        self
    }

    pub fn with_device_path(mut self, path: impl Into<String>) -> Self {
        self.config.device_path = path.into();
        self
    }

    pub fn with_attributes(mut self, attributes: DeviceAttributes) -> Self {
        self.config.attributes = attributes;
        self
    }

    pub fn with_strings(mut self, strings: DeviceStrings) -> Self {
        self.config.strings = strings;
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Create the session's bridge, shared between both adapters.
    pub fn build(self) -> Arc<Bridge> {
        Arc::new(Bridge::new(self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_probe() {
        let config = BridgeConfig::default();
        assert_eq!(config.report_id, 0);
        assert_eq!(config.device_path, DEFAULT_DEVICE_PATH);
        assert_eq!(config.attributes.vendor_id, 0xDEED);
    }

    #[test]
    fn builder_overrides_fields() {
        let builder = BridgeBuilder::new()
            .with_report_id(3)
            .with_device_path("/tmp/bridge");
        assert_eq!(builder.config().report_id, 3);
        assert_eq!(builder.config().device_path, "/tmp/bridge");
        let bridge = builder.build();
        assert_eq!(bridge.config().report_id, 3);
    }
}
