// Static enumeration data served by the front adapter.
//
// None of this interacts with the rendezvous channels; it is plain immutable
// data chosen at startup.

use super::error::{BridgeError, Result};
use crate::Rendezvous::Structs::Packet_Structs::PACKET_SIZE;

/// Report descriptor: one vendor-defined collection with a 64-byte input
/// report and a 64-byte output report, no report id.
pub const REPORT_DESCRIPTOR: [u8; 34] = [
    0x06, 0x00, 0xFF, // USAGE_PAGE (Vendor Defined 0xFF00)
    0x09, 0x01, // USAGE (Vendor Usage 0x01)
    0xA1, 0x01, // COLLECTION (Application)
    0x09, 0x01, // USAGE (Vendor Usage 0x01)
    0x15, 0x00, // LOGICAL_MINIMUM (0)
    0x26, 0xFF, 0x00, // LOGICAL_MAXIMUM (255)
    0x75, 0x08, // REPORT_SIZE (8)
    0x95, PACKET_SIZE as u8, // REPORT_COUNT (64)
    0x81, 0x02, // INPUT (Data,Var,Abs)
    0x09, 0x01, // USAGE (Vendor Usage 0x01)
    0x15, 0x00, // LOGICAL_MINIMUM (0)
    0x26, 0xFF, 0x00, // LOGICAL_MAXIMUM (255)
    0x75, 0x08, // REPORT_SIZE (8)
    0x95, PACKET_SIZE as u8, // REPORT_COUNT (64)
    0x91, 0x02, // OUTPUT (Data,Var,Abs)
    0xC0, // END_COLLECTION
];

pub const HID_DESCRIPTOR_TYPE: u8 = 0x21;
pub const REPORT_DESCRIPTOR_TYPE: u8 = 0x22;

/// Standard string ids from the HID class.
pub const STRING_ID_MANUFACTURER: u32 = 14;
pub const STRING_ID_PRODUCT: u32 = 15;
pub const STRING_ID_SERIAL_NUMBER: u32 = 16;

/// Index of the one indexed string the device exposes.
pub const DEVICE_STRING_INDEX: u32 = 5;

/// HID class descriptor pointing at `REPORT_DESCRIPTOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HidDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub hid_release: u16,
    pub country_code: u8,
    pub num_descriptors: u8,
    pub report_type: u8,
    pub report_length: u16,
}

impl HidDescriptor {
    pub const SIZE: usize = 9;

    pub const fn default_for_reports() -> Self {
        Self {
            length: Self::SIZE as u8,
            descriptor_type: HID_DESCRIPTOR_TYPE,
            hid_release: 0x0100,
            country_code: 0x00,
            num_descriptors: 1,
            report_type: REPORT_DESCRIPTOR_TYPE,
            report_length: REPORT_DESCRIPTOR.len() as u16,
        }
    }

    /// Packed little-endian wire layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let release = self.hid_release.to_le_bytes();
        let report_len = self.report_length.to_le_bytes();
        [
            self.length,
            self.descriptor_type,
            release[0],
            release[1],
            self.country_code,
            self.num_descriptors,
            self.report_type,
            report_len[0],
            report_len[1],
        ]
    }
}

/// Vendor/product identity reported on enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAttributes {
    pub vendor_id: u16,
    pub product_id: u16,
    pub version: u16,
}

impl Default for DeviceAttributes {
    fn default() -> Self {
        Self {
            vendor_id: 0xDEED,
            product_id: 0xFEED,
            version: 0x0101,
        }
    }
}

/// String table served for string requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStrings {
    pub manufacturer: String,
    pub product: String,
    pub serial_number: String,
    pub device: String,
}

impl Default for DeviceStrings {
    fn default() -> Self {
        Self {
            manufacturer: "Virtual CMSIS-DAP Manufacturer".to_string(),
            product: "CMSIS-DAP Virtual Debug Probe".to_string(),
            serial_number: "CMSIS-DAP-0001".to_string(),
            device: "CMSIS-DAP Virtual Device".to_string(),
        }
    }
}

/// Split a string request value into (string id, language id).
pub fn decode_string_request(value: u32) -> (u32, u32) {
    (value & 0xFFFF, value >> 16)
}

impl DeviceStrings {
    /// Look up a class string by id. The language id is ignored.
    pub fn by_id(&self, request: u32) -> Result<Vec<u8>> {
        let (id, _language) = decode_string_request(request);
        let s = match id {
            STRING_ID_MANUFACTURER => &self.manufacturer,
            STRING_ID_PRODUCT => &self.product,
            STRING_ID_SERIAL_NUMBER => &self.serial_number,
            _ => return Err(BridgeError::InvalidArgument(id)),
        };
        Ok(encode_wide(s))
    }

    /// Look up an indexed string. Only `DEVICE_STRING_INDEX` exists.
    pub fn by_index(&self, request: u32) -> Result<Vec<u8>> {
        let (index, _language) = decode_string_request(request);
        if index != DEVICE_STRING_INDEX {
            return Err(BridgeError::InvalidArgument(index));
        }
        Ok(encode_wide(&self.device))
    }
}

/// UTF-16LE with a terminating NUL.
fn encode_wide(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}
