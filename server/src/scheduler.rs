use std::time::Duration;

use application::service::CheckReturnRemindersService;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::handler::AppModule;

/// Runs the reminder pass right away and then once per `every`.
pub fn spawn_reminder_scheduler(module: AppModule, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match module.handler().run_return_reminders().await {
                Ok(report) => tracing::info!(
                    total = report.total,
                    due = report.due.len(),
                    sent = report.sent,
                    "return reminder pass finished"
                ),
                Err(report) => tracing::error!("return reminder pass failed: {report:?}"),
            }
        }
    })
}
