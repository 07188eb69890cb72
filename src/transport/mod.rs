//! Transport ports: how messages leave and events enter the engine

pub mod gateway;

pub use gateway::{
    ChannelDirectory, ChannelGateway, DirectoryClient, InboundEvent, OutboundGateway,
    RecordingDirectory, RecordingGateway,
};
