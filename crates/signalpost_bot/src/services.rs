use signalpost_interface::{MessagingEndpoint, Repository, TextGenerator, Translator};
use std::sync::Arc;

/// The external collaborators the bot talks to.
#[derive(Clone)]
pub struct Services {
    /// Messaging transport
    pub endpoint: Arc<dyn MessagingEndpoint>,
    /// Copy generator
    pub generator: Arc<dyn TextGenerator>,
    /// Copy translator
    pub translator: Arc<dyn Translator>,
    /// Durable storage
    pub repository: Arc<dyn Repository>,
}

impl Services {
    /// Bundle the collaborators.
    pub fn new(
        endpoint: Arc<dyn MessagingEndpoint>,
        generator: Arc<dyn TextGenerator>,
        translator: Arc<dyn Translator>,
        repository: Arc<dyn Repository>,
    ) -> Self {
        Self {
            endpoint,
            generator,
            translator,
            repository,
        }
    }
}
