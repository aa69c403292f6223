use application::service::CheckReturnRemindersService;
use axum::extract::State;
use axum::routing::post;
use axum::Router;

use crate::controller::Controller;
use crate::extract::Actor;
use crate::handler::AppModule;
use crate::response::ReminderPresenter;

pub trait ReminderRouter {
    fn route_reminder(self) -> Self;
}

impl<H> ReminderRouter for Router<AppModule<H>>
where
    H: CheckReturnRemindersService,
{
    fn route_reminder(self) -> Self {
        self.route(
            "/reminders/check",
            post(
                |State(module): State<AppModule<H>>, Actor(actor): Actor| async move {
                    Controller::new((), ReminderPresenter)
                        .bypass(|| async move { module.handler().check_return_reminders(&actor).await })
                        .await
                },
            ),
        )
    }
}
