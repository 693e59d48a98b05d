use avcontrol_model::UniqueServiceName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Registry error: {0}")]
    Registry(#[from] avcontrol_registry::RegistryError),

    #[error("Archive error: {0}")]
    Archive(#[from] avcontrol_archive::ArchiveError),

    #[error("Player error: {0}")]
    Player(#[from] avcontrol_player::PlayerError),

    #[error("Device not found: {0}")]
    DeviceNotFound(UniqueServiceName),

    #[error("Device {0} is not a media renderer")]
    NotARenderer(UniqueServiceName),

    #[error("No AVTransport available for renderer {0}")]
    TransportUnavailable(UniqueServiceName),
}

pub type Result<T> = std::result::Result<T, SdkError>;
