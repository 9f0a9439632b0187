use alloc::string::String;

use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_ctx_character_string, decode_ctx_enumerated, decode_ctx_unsigned,
        decode_optional_ctx, encode_ctx_character_string, encode_ctx_enumerated,
        encode_ctx_unsigned,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::decode_confirmed_header;
use crate::types::ConfirmedService;
use crate::{DecodeError, EncodeError};

pub const SERVICE_DEVICE_COMMUNICATION_CONTROL: u8 =
    ConfirmedService::DeviceCommunicationControl.to_u8();
pub const SERVICE_REINITIALIZE_DEVICE: u8 = ConfirmedService::ReinitializeDevice.to_u8();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DeviceCommunicationState {
    Enable = 0,
    Disable = 1,
    DisableInitiation = 2,
}

impl DeviceCommunicationState {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Enable),
            1 => Some(Self::Disable),
            2 => Some(Self::DisableInitiation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ReinitializeState {
    Coldstart = 0,
    Warmstart = 1,
    StartBackup = 2,
    EndBackup = 3,
    StartRestore = 4,
    EndRestore = 5,
    AbortRestore = 6,
    ActivateChanges = 7,
}

impl ReinitializeState {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Coldstart),
            1 => Some(Self::Warmstart),
            2 => Some(Self::StartBackup),
            3 => Some(Self::EndBackup),
            4 => Some(Self::StartRestore),
            5 => Some(Self::EndRestore),
            6 => Some(Self::AbortRestore),
            7 => Some(Self::ActivateChanges),
            _ => None,
        }
    }
}

/// DeviceCommunicationControl. Without a duration the state holds until
/// changed again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceCommunicationControlRequest {
    pub time_duration_minutes: Option<u16>,
    pub enable_disable: DeviceCommunicationState,
    pub password: Option<String>,
    pub invoke_id: u8,
}

impl DeviceCommunicationControlRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::DeviceCommunicationControl, self.invoke_id)
            .encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some(duration) = self.time_duration_minutes {
            encode_ctx_unsigned(w, 0, duration as u32)?;
        }
        encode_ctx_enumerated(w, 1, self.enable_disable.to_u32())?;
        if let Some(password) = &self.password {
            encode_ctx_character_string(w, 2, password)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::DeviceCommunicationControl)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let time_duration_minutes = decode_optional_ctx(r, 0, decode_ctx_unsigned)?
            .map(|d| u16::try_from(d).map_err(|_| DecodeError::InvalidValue))
            .transpose()?;
        let enable_disable = DeviceCommunicationState::from_u32(decode_ctx_enumerated(r, 1)?)
            .ok_or(DecodeError::InvalidValue)?;
        Ok(Self {
            time_duration_minutes,
            enable_disable,
            password: decode_optional_ctx(r, 2, decode_ctx_character_string)?,
            invoke_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReinitializeDeviceRequest {
    pub state: ReinitializeState,
    pub password: Option<String>,
    pub invoke_id: u8,
}

impl ReinitializeDeviceRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(ConfirmedService::ReinitializeDevice, self.invoke_id)
            .encode(w)?;
        self.encode_service_data(w)
    }

    pub fn encode_service_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_enumerated(w, 0, self.state.to_u32())?;
        if let Some(password) = &self.password {
            encode_ctx_character_string(w, 1, password)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let invoke_id = decode_confirmed_header(r, ConfirmedService::ReinitializeDevice)?;
        Self::decode_after_header(r, invoke_id)
    }

    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let state = ReinitializeState::from_u32(decode_ctx_enumerated(r, 0)?)
            .ok_or(DecodeError::InvalidValue)?;
        Ok(Self {
            state,
            password: decode_optional_ctx(r, 1, decode_ctx_character_string)?,
            invoke_id,
        })
    }
}
