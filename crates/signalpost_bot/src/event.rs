use signalpost_core::InboundEvent;

/// Everything the coordinator reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    /// An update from the messaging transport
    Inbound(InboundEvent),
    /// The win window advanced
    WinWindowTick,
    /// Time to rebroadcast the best win
    BestWinRebroadcast,
    /// Time to rotate channel links
    LinkRotation,
}

impl From<InboundEvent> for BotEvent {
    fn from(event: InboundEvent) -> Self {
        Self::Inbound(event)
    }
}
