use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use error_stack::Report;
use kernel::interface::access::Administrators;
use kernel::interface::notify::{NotificationTemplates, SubscribeMessageKind};
use kernel::prelude::entity::OpenId;
use kernel::KernelError;
use tracing::{info, warn};

const DEFAULT_NOTIFY_PAGE: &str = "pages/myBorrows/myBorrows";

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub reminder_interval: Duration,
    pub templates: NotificationTemplates,
    pub administrators: Administrators,
}

impl Config {
    pub fn load() -> error_stack::Result<Self, KernelError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup<L>(lookup: L) -> error_stack::Result<Self, KernelError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let port = try_load(&lookup, "PORT", "8080")?;
        let interval: u64 = try_load(&lookup, "REMINDER_INTERVAL_SECS", "3600")?;
        if interval == 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("REMINDER_INTERVAL_SECS must be positive"));
        }
        let page: String = try_load(&lookup, "NOTIFY_PAGE", DEFAULT_NOTIFY_PAGE)?;

        let templates = SubscribeMessageKind::ALL.into_iter().fold(
            NotificationTemplates::new(page),
            |templates, kind| {
                let key = template_key(kind);
                match lookup(key) {
                    Some(id) => templates.with_template(kind, id.trim()),
                    None => {
                        warn!("{key} not set, {kind:?} notifications are disabled");
                        templates
                    }
                }
            },
        );

        let administrators = lookup("ADMIN_OPEN_IDS")
            .map(|ids| parse_administrators(&ids))
            .unwrap_or_else(|| {
                warn!("ADMIN_OPEN_IDS not set, nobody can review requests");
                Administrators::default()
            });

        Ok(Self {
            port,
            reminder_interval: Duration::from_secs(interval),
            templates,
            administrators,
        })
    }
}

fn template_key(kind: SubscribeMessageKind) -> &'static str {
    match kind {
        SubscribeMessageKind::RequestSubmitted => "WX_TEMPLATE_REQUEST_SUBMITTED",
        SubscribeMessageKind::ReviewResult => "WX_TEMPLATE_REVIEW_RESULT",
        SubscribeMessageKind::BorrowSuccess => "WX_TEMPLATE_BORROW_SUCCESS",
        SubscribeMessageKind::ReturnSuccess => "WX_TEMPLATE_RETURN_SUCCESS",
        SubscribeMessageKind::ReturnReminder => "WX_TEMPLATE_RETURN_REMINDER",
        SubscribeMessageKind::OverdueReminder => "WX_TEMPLATE_OVERDUE_REMINDER",
    }
}

fn parse_administrators(ids: &str) -> Administrators {
    Administrators::new(
        ids.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(OpenId::new),
    )
}

fn try_load<L, T>(lookup: &L, key: &str, default: &str) -> error_stack::Result<T, KernelError>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e| {
        Report::new(KernelError::Validation).attach_printable(format!("invalid {key} value: {e}"))
    })
}
