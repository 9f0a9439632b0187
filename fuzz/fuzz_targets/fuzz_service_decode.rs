#![no_main]

use bacwire_core::encoding::reader::Reader;
use bacwire_core::services::{
    acknowledge_alarm::AcknowledgeAlarmRequest,
    alarm_summary::GetAlarmSummaryAck,
    atomic_read_file::{AtomicReadFileAck, AtomicReadFileRequest},
    atomic_write_file::{AtomicWriteFileAck, AtomicWriteFileRequest},
    cov_notification::CovNotificationRequest,
    device_management::{DeviceCommunicationControlRequest, ReinitializeDeviceRequest},
    event_information::{GetEventInformationAck, GetEventInformationRequest},
    event_notification::EventNotificationRequest,
    i_am::IAmRequest,
    life_safety::LifeSafetyOperationRequest,
    list_element::ListElementRequest,
    object_management::{CreateObjectAck, CreateObjectRequest, DeleteObjectRequest},
    private_transfer::{PrivateTransferAck, PrivateTransferRequest},
    read_property::{ReadPropertyAck, ReadPropertyRequest},
    read_property_multiple::{ReadPropertyMultipleAck, ReadPropertyMultipleRequest},
    read_range::{ReadRangeAck, ReadRangeRequest},
    subscribe_cov::SubscribeCovRequest,
    subscribe_cov_property::SubscribeCovPropertyRequest,
    time_synchronization::TimeSynchronizationRequest,
    who_has::{IHaveRequest, WhoHasRequest},
    who_is::WhoIsRequest,
    write_property::WritePropertyRequest,
    write_property_multiple::WritePropertyMultipleRequest,
};
use libfuzzer_sys::fuzz_target;

macro_rules! try_decode {
    ($data:expr, $($ty:ty),+ $(,)?) => {
        $(
            let mut r = Reader::new($data);
            let _ = <$ty>::decode(&mut r);
        )+
    };
}

fuzz_target!(|data: &[u8]| {
    try_decode!(
        data,
        AcknowledgeAlarmRequest,
        GetAlarmSummaryAck,
        AtomicReadFileRequest,
        AtomicReadFileAck,
        AtomicWriteFileRequest,
        AtomicWriteFileAck,
        CovNotificationRequest,
        DeviceCommunicationControlRequest,
        ReinitializeDeviceRequest,
        GetEventInformationRequest,
        GetEventInformationAck,
        EventNotificationRequest,
        IAmRequest,
        LifeSafetyOperationRequest,
        ListElementRequest,
        CreateObjectRequest,
        CreateObjectAck,
        DeleteObjectRequest,
        PrivateTransferRequest,
        PrivateTransferAck,
        ReadPropertyRequest,
        ReadPropertyAck,
        ReadPropertyMultipleRequest,
        ReadPropertyMultipleAck,
        ReadRangeRequest,
        ReadRangeAck,
        SubscribeCovRequest,
        SubscribeCovPropertyRequest,
        TimeSynchronizationRequest,
        WhoHasRequest,
        IHaveRequest,
        WhoIsRequest,
        WritePropertyRequest,
        WritePropertyMultipleRequest,
    );
});
