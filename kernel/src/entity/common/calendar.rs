use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::KernelError;

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_iso_date(value: &str) -> error_stack::Result<Date, KernelError> {
    Date::parse(value, ISO_DATE).map_err(|error| {
        error_stack::Report::new(KernelError::Validation)
            .attach_printable(format!("`{value}` is not a YYYY-MM-DD date: {error}"))
    })
}

pub fn format_iso_date(date: &Date) -> String {
    // The format only contains numeric components, which cannot fail to render.
    date.format(ISO_DATE).unwrap_or_default()
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use super::{format_iso_date, parse_iso_date};

    #[test]
    fn parses_dashed_dates() {
        assert_eq!(parse_iso_date("2024-03-09").unwrap(), date!(2024 - 03 - 09));
        assert_eq!(format_iso_date(&date!(2024 - 03 - 09)), "2024-03-09");
    }

    #[test]
    fn rejects_other_layouts() {
        assert!(parse_iso_date("2024/03/09").is_err());
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("").is_err());
    }
}
