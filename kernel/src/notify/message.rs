use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use vodca::References;

use crate::entity::{format_iso_date, BookName, BorrowRequestId, OpenId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeMessageKind {
    RequestSubmitted,
    ReviewResult,
    BorrowSuccess,
    ReturnSuccess,
    ReturnReminder,
    OverdueReminder,
}

impl SubscribeMessageKind {
    pub const ALL: [SubscribeMessageKind; 6] = [
        SubscribeMessageKind::RequestSubmitted,
        SubscribeMessageKind::ReviewResult,
        SubscribeMessageKind::BorrowSuccess,
        SubscribeMessageKind::ReturnSuccess,
        SubscribeMessageKind::ReturnReminder,
        SubscribeMessageKind::OverdueReminder,
    ];
}

/// WeChat rejects `thing` values longer than this.
pub const THING_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TemplateValue {
    value: String,
}

impl TemplateValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn thing(value: &str) -> Self {
        Self::new(value.chars().take(THING_MAX_CHARS).collect::<String>())
    }

    pub fn date(date: &Date) -> Self {
        Self::new(format_iso_date(date))
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Something worth telling a requester about, before it is bound to a template.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Notice {
    RequestSubmitted {
        book_name: BookName,
        submitted_on: Date,
    },
    ReviewResult {
        book_name: BookName,
        approved: bool,
        remark: Option<String>,
    },
    BorrowSuccess {
        id: BorrowRequestId,
        book_name: BookName,
        borrow_date: Date,
        return_date: Date,
    },
    ReturnSuccess {
        id: BorrowRequestId,
        book_name: BookName,
        returned_on: Date,
    },
    ReturnReminder {
        id: BorrowRequestId,
        book_name: BookName,
        return_date: Date,
        days_left: i64,
    },
    OverdueReminder {
        id: BorrowRequestId,
        book_name: BookName,
        return_date: Date,
        overdue_days: i64,
    },
}

impl Notice {
    pub fn kind(&self) -> SubscribeMessageKind {
        match self {
            Notice::RequestSubmitted { .. } => SubscribeMessageKind::RequestSubmitted,
            Notice::ReviewResult { .. } => SubscribeMessageKind::ReviewResult,
            Notice::BorrowSuccess { .. } => SubscribeMessageKind::BorrowSuccess,
            Notice::ReturnSuccess { .. } => SubscribeMessageKind::ReturnSuccess,
            Notice::ReturnReminder { .. } => SubscribeMessageKind::ReturnReminder,
            Notice::OverdueReminder { .. } => SubscribeMessageKind::OverdueReminder,
        }
    }

    pub fn template_data(&self) -> BTreeMap<String, TemplateValue> {
        let fields = match self {
            Notice::RequestSubmitted {
                book_name,
                submitted_on,
            } => vec![
                ("thing1", TemplateValue::thing(book_name.as_ref())),
                ("date2", TemplateValue::date(submitted_on)),
                ("phrase3", TemplateValue::new("待审核")),
            ],
            Notice::ReviewResult {
                book_name,
                approved,
                remark,
            } => vec![
                ("thing1", TemplateValue::thing(book_name.as_ref())),
                (
                    "phrase2",
                    TemplateValue::new(if *approved { "已通过" } else { "未通过" }),
                ),
                (
                    "thing3",
                    TemplateValue::thing(remark.as_deref().unwrap_or("无")),
                ),
            ],
            Notice::BorrowSuccess {
                id,
                book_name,
                borrow_date,
                return_date,
            } => vec![
                ("thing1", TemplateValue::thing(book_name.as_ref())),
                ("date2", TemplateValue::date(borrow_date)),
                ("date3", TemplateValue::date(return_date)),
                ("character_string4", TemplateValue::new(id.borrow_number())),
            ],
            Notice::ReturnSuccess {
                id,
                book_name,
                returned_on,
            } => vec![
                ("thing1", TemplateValue::thing(book_name.as_ref())),
                ("date2", TemplateValue::date(returned_on)),
                ("character_string3", TemplateValue::new(id.borrow_number())),
            ],
            Notice::ReturnReminder {
                id,
                book_name,
                return_date,
                days_left,
            } => vec![
                ("thing1", TemplateValue::thing(book_name.as_ref())),
                ("date2", TemplateValue::date(return_date)),
                ("number3", TemplateValue::new(days_left.to_string())),
                ("character_string4", TemplateValue::new(id.borrow_number())),
            ],
            Notice::OverdueReminder {
                id,
                book_name,
                return_date,
                overdue_days,
            } => vec![
                ("thing1", TemplateValue::thing(book_name.as_ref())),
                ("date2", TemplateValue::date(return_date)),
                ("number3", TemplateValue::new(overdue_days.to_string())),
                ("character_string4", TemplateValue::new(id.borrow_number())),
            ],
        };
        fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct SubscribeMessage {
    kind: SubscribeMessageKind,
    template_id: String,
    to: OpenId,
    page: String,
    data: BTreeMap<String, TemplateValue>,
}

impl SubscribeMessage {
    pub fn new(
        kind: SubscribeMessageKind,
        template_id: impl Into<String>,
        to: OpenId,
        page: impl Into<String>,
        data: BTreeMap<String, TemplateValue>,
    ) -> Self {
        Self {
            kind,
            template_id: template_id.into(),
            to,
            page: page.into(),
            data,
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;
    use uuid::Uuid;

    use crate::entity::{BookName, BorrowRequestId};

    use super::{Notice, SubscribeMessageKind};

    #[test]
    fn borrow_success_fields() {
        let id = BorrowRequestId::new(Uuid::nil());
        let notice = Notice::BorrowSuccess {
            id,
            book_name: BookName::new("Rust"),
            borrow_date: date!(2024 - 03 - 01),
            return_date: date!(2024 - 03 - 08),
        };
        assert_eq!(notice.kind(), SubscribeMessageKind::BorrowSuccess);
        let data = notice.template_data();
        assert_eq!(data["thing1"].value(), "Rust");
        assert_eq!(data["date2"].value(), "2024-03-01");
        assert_eq!(data["date3"].value(), "2024-03-08");
        assert_eq!(
            data["character_string4"].value(),
            "00000000000000000000000000000000"
        );
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn long_book_names_are_cut_to_twenty_chars() {
        let notice = Notice::OverdueReminder {
            id: BorrowRequestId::default(),
            book_name: BookName::new("深入理解计算机系统第三版原书第三版典藏版限量精装"),
            return_date: date!(2024 - 03 - 08),
            overdue_days: 2,
        };
        let data = notice.template_data();
        assert_eq!(data["thing1"].value().chars().count(), 20);
        assert_eq!(data["number3"].value(), "2");
    }

    #[test]
    fn template_payload_serializes_as_value_objects() {
        let notice = Notice::ReturnSuccess {
            id: BorrowRequestId::new(Uuid::nil()),
            book_name: BookName::new("Rust"),
            returned_on: date!(2024 - 03 - 08),
        };
        let json = serde_json::to_value(notice.template_data()).unwrap();
        assert_eq!(json["thing1"]["value"], "Rust");
        assert_eq!(json["date2"]["value"], "2024-03-08");
        assert!(json.get("character_string3").is_some());
    }
}
