// src/Rendezvous/front.rs

use super::bridge::Bridge;
use super::channel::Submission;
use super::Structs::Packet;
use crate::Core::descriptor::{DeviceAttributes, HidDescriptor, REPORT_DESCRIPTOR};
use crate::Core::error::{BridgeError, Result};
use log::{debug, warn};
use std::sync::Arc;

/// Requests the device-report side can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HidRequest {
    GetDeviceDescriptor,
    GetReportDescriptor,
    GetDeviceAttributes,
    /// Read the next input report into a buffer of `buffer_len` bytes.
    ReadReport { report_id: u8, buffer_len: usize },
    /// Write one output report.
    WriteReport { report_id: u8, data: Vec<u8> },
    GetFeature,
    SetFeature,
    GetInputReport,
    SetOutputReport,
    /// String by class id; `value` packs the id (low half) and language.
    GetString { value: u32 },
    /// String by index; same packing as `GetString`.
    GetIndexedString { value: u32 },
    IdleNotification,
    Activate,
    Deactivate,
    GetPhysicalDescriptor,
}

/// What a dispatched request produced.
#[derive(Debug)]
pub enum FrontReply {
    Bytes(Vec<u8>),
    Attributes(DeviceAttributes),
    /// Output report handed to channel F.
    Sent(Submission<usize>),
    /// Input report requested from channel B.
    Received(Submission<Packet>),
}

/// Translates device-report requests into bridge operations.
#[derive(Debug, Clone)]
pub struct FrontAdapter {
    bridge: Arc<Bridge>,
}

impl FrontAdapter {
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }

    pub fn dispatch(&self, request: HidRequest) -> Result<FrontReply> {
        let config = self.bridge.config();
        match request {
            HidRequest::GetDeviceDescriptor => Ok(FrontReply::Bytes(
                HidDescriptor::default_for_reports().to_bytes().to_vec(),
            )),
            HidRequest::GetReportDescriptor => Ok(FrontReply::Bytes(REPORT_DESCRIPTOR.to_vec())),
            HidRequest::GetDeviceAttributes => Ok(FrontReply::Attributes(config.attributes)),
            HidRequest::GetString { value } => config.strings.by_id(value).map(FrontReply::Bytes),
            HidRequest::GetIndexedString { value } => {
                config.strings.by_index(value).map(FrontReply::Bytes)
            }
            HidRequest::ReadReport {
                report_id,
                buffer_len,
            } => {
                debug!("front: read report {:#04x}", report_id);
                self.bridge
                    .front_read_report(report_id, buffer_len)
                    .map(FrontReply::Received)
            }
            HidRequest::WriteReport { report_id, data } => {
                debug!("front: write report {:#04x} ({} bytes)", report_id, data.len());
                self.bridge
                    .front_write_report(report_id, &data)
                    .map(FrontReply::Sent)
            }
            other @ (HidRequest::GetFeature
            | HidRequest::SetFeature
            | HidRequest::GetInputReport
            | HidRequest::SetOutputReport
            | HidRequest::IdleNotification
            | HidRequest::Activate
            | HidRequest::Deactivate
            | HidRequest::GetPhysicalDescriptor) => {
                warn!("front: {:?} not supported", other);
                Err(BridgeError::NotSupported)
            }
        }
    }

    /// Write one output report and return the parked or completed send.
    pub fn write_report(&self, report_id: u8, data: &[u8]) -> Result<Submission<usize>> {
        self.bridge.front_write_report(report_id, data)
    }

    /// Request the next input report.
    pub fn read_report(&self, report_id: u8, buffer_len: usize) -> Result<Submission<Packet>> {
        self.bridge.front_read_report(report_id, buffer_len)
    }
}
