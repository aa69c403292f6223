mod message;
mod template;

pub use self::{message::*, template::*};
use crate::KernelError;

#[async_trait::async_trait]
pub trait SubscribeMessageSender: 'static + Clone + Sync + Send {
    async fn send(&self, message: &SubscribeMessage) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnSubscribeMessageSender: 'static + Sync + Send {
    type SubscribeMessageSender: SubscribeMessageSender;
    fn subscribe_message_sender(&self) -> &Self::SubscribeMessageSender;
    fn notification_templates(&self) -> &NotificationTemplates;
}
