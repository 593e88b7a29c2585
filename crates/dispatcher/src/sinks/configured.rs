//! ConfiguredSink - sink selected by configuration

use contracts::{
    ContractError, DeliveryError, NotificationSink, SinkKind, SinkResponse, SinkSettings,
};

use super::{HttpSink, LogSink};

/// Any sink the relay can be configured with
pub enum ConfiguredSink {
    Http(HttpSink),
    Log(LogSink),
}

impl ConfiguredSink {
    /// Build the sink described by `settings`
    pub fn from_settings(settings: &SinkSettings) -> Result<Self, ContractError> {
        match settings.kind {
            SinkKind::Http => HttpSink::from_settings(settings).map(Self::Http),
            SinkKind::Log => Ok(Self::Log(LogSink::new(&settings.name))),
        }
    }

    pub fn kind(&self) -> SinkKind {
        match self {
            Self::Http(_) => SinkKind::Http,
            Self::Log(_) => SinkKind::Log,
        }
    }
}

impl NotificationSink for ConfiguredSink {
    fn name(&self) -> &str {
        match self {
            Self::Http(sink) => sink.name(),
            Self::Log(sink) => sink.name(),
        }
    }

    async fn send(&self, body: Vec<u8>) -> Result<SinkResponse, DeliveryError> {
        match self {
            Self::Http(sink) => sink.send(body).await,
            Self::Log(sink) => sink.send(body).await,
        }
    }
}
