use std::collections::HashMap;

use crate::entity::OpenId;
use crate::notify::{Notice, SubscribeMessage, SubscribeMessageKind};

/// Template ids per message kind plus the mini program page opened from the card.
#[derive(Debug, Clone, Default)]
pub struct NotificationTemplates {
    templates: HashMap<SubscribeMessageKind, String>,
    page: String,
}

impl NotificationTemplates {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            templates: HashMap::new(),
            page: page.into(),
        }
    }

    pub fn with_template(mut self, kind: SubscribeMessageKind, template_id: impl Into<String>) -> Self {
        self.templates.insert(kind, template_id.into());
        self
    }

    pub fn template_id(&self, kind: SubscribeMessageKind) -> Option<&str> {
        self.templates
            .get(&kind)
            .map(String::as_str)
            .filter(|id| !is_placeholder(id))
    }

    /// `None` when the kind has no usable template.
    pub fn compose(&self, to: &OpenId, notice: &Notice) -> Option<SubscribeMessage> {
        let kind = notice.kind();
        let template_id = self.template_id(kind)?;
        Some(SubscribeMessage::new(
            kind,
            template_id,
            to.clone(),
            self.page.clone(),
            notice.template_data(),
        ))
    }
}

pub fn is_placeholder(template_id: &str) -> bool {
    let template_id = template_id.trim();
    template_id.starts_with("YOUR_")
        || template_id.contains("TEMPLATE_ID")
        || template_id.chars().count() <= 10
}
