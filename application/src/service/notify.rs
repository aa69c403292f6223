use tracing::{debug, warn};

use kernel::interface::notify::{DependOnSubscribeMessageSender, Notice, SubscribeMessageSender};
use kernel::prelude::entity::OpenId;

/// Fire-and-forget delivery. Never blocks the caller and never fails it.
pub(crate) fn spawn_notice<T>(module: &T, to: &OpenId, notice: Notice)
where
    T: DependOnSubscribeMessageSender + ?Sized,
{
    let Some(message) = module.notification_templates().compose(to, &notice) else {
        debug!(kind = ?notice.kind(), "no subscribe template configured, skipping");
        return;
    };
    let sender = module.subscribe_message_sender().clone();
    tokio::spawn(async move {
        match sender.send(&message).await {
            Ok(()) => debug!(kind = ?message.kind(), to = %message.to().as_ref(), "notification sent"),
            Err(report) => warn!(
                kind = ?message.kind(),
                to = %message.to().as_ref(),
                "failed to send notification: {report:?}"
            ),
        }
    });
}
