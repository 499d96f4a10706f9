//! Well-known cluster and attribute identifiers.

pub const BASIC: u16 = 0x0000;
pub const POWER_CONFIGURATION: u16 = 0x0001;
pub const IDENTIFY: u16 = 0x0003;
pub const GROUPS: u16 = 0x0004;
pub const SCENES: u16 = 0x0005;
pub const ON_OFF: u16 = 0x0006;
pub const LEVEL_CONTROL: u16 = 0x0008;
pub const COLOR_CONTROL: u16 = 0x0300;
pub const ILLUMINANCE_MEASUREMENT: u16 = 0x0400;
pub const TEMPERATURE_MEASUREMENT: u16 = 0x0402;
pub const RELATIVE_HUMIDITY: u16 = 0x0405;
pub const OCCUPANCY_SENSING: u16 = 0x0406;
pub const IAS_ZONE: u16 = 0x0500;

/// Basic cluster attributes read during device discovery.
pub mod basic {
    pub const MANUFACTURER_NAME: u16 = 0x0004;
    pub const MODEL_IDENTIFIER: u16 = 0x0005;
    pub const POWER_SOURCE: u16 = 0x0007;
}

/// Profile-wide command identifiers.
pub mod global {
    pub const READ_ATTRIBUTES: u8 = 0x00;
    pub const READ_ATTRIBUTES_RESPONSE: u8 = 0x01;
    pub const WRITE_ATTRIBUTES: u8 = 0x02;
    pub const WRITE_ATTRIBUTES_RESPONSE: u8 = 0x04;
    pub const REPORT_ATTRIBUTES: u8 = 0x0A;
    pub const DEFAULT_RESPONSE: u8 = 0x0B;
}

/// Human readable name of a well-known cluster.
pub fn well_known_name(cluster_id: u16) -> Option<&'static str> {
    let name = match cluster_id {
        BASIC => "Basic",
        POWER_CONFIGURATION => "PowerConfiguration",
        IDENTIFY => "Identify",
        GROUPS => "Groups",
        SCENES => "Scenes",
        ON_OFF => "OnOff",
        LEVEL_CONTROL => "LevelControl",
        COLOR_CONTROL => "ColorControl",
        ILLUMINANCE_MEASUREMENT => "IlluminanceMeasurement",
        TEMPERATURE_MEASUREMENT => "TemperatureMeasurement",
        RELATIVE_HUMIDITY => "RelativeHumidityMeasurement",
        OCCUPANCY_SENSING => "OccupancySensing",
        IAS_ZONE => "IasZone",
        _ => return None,
    };
    Some(name)
}
