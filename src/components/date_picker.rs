use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::form::BoundField;
use crate::icon::{self, IconRef};

use super::ChangeHandler;

pub const DEFAULT_DATE_FORMAT: &str = "dd/MM/yyyy";

/// Calendar control. Emits concrete date-times, never strings.
#[derive(Clone)]
pub struct DatePicker {
    value: Option<NaiveDateTime>,
    date_format: String,
    show_time: bool,
    time_label: String,
    icon: Option<IconRef>,
    disabled: bool,
    on_change: Option<ChangeHandler<Option<NaiveDateTime>>>,
}

impl Default for DatePicker {
    fn default() -> Self {
        Self {
            value: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            show_time: false,
            time_label: "Time:".to_string(),
            icon: Some(icon::CALENDAR),
            disabled: false,
            on_change: None,
        }
    }
}

impl DatePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: Option<NaiveDateTime>) -> Self {
        self.value = value;
        self
    }

    /// date-fns style pattern such as `dd/MM/yyyy` or `MM/dd/yyyy - h:mm aa`.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn show_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    pub fn time_label(mut self, label: impl Into<String>) -> Self {
        self.time_label = label.into();
        self
    }

    pub fn icon(mut self, icon: Option<IconRef>) -> Self {
        self.icon = icon;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(
        mut self,
        handler: impl Fn(Option<NaiveDateTime>) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn bind(self, field: BoundField<Option<NaiveDateTime>>) -> Self {
        let value = *field.value();
        self.value(value).on_change(move |next| field.on_change(next))
    }

    pub fn selected(&self) -> Option<NaiveDateTime> {
        self.value
    }

    pub fn format(&self) -> &str {
        &self.date_format
    }

    pub fn has_time_select(&self) -> bool {
        self.show_time
    }

    pub fn time_label_text(&self) -> &str {
        &self.time_label
    }

    pub fn icon_ref(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    /// The selected value rendered with the configured pattern.
    pub fn display_value(&self) -> Option<String> {
        let pattern = chrono_pattern(&self.date_format);
        self.value
            .map(|value| value.format(&pattern).to_string())
    }

    /// Picks a calendar day. Without time selection the time is midnight;
    /// with it the previously chosen time is kept.
    pub fn pick_date(&self, date: NaiveDate) {
        let time = match (self.show_time, self.value) {
            (true, Some(current)) => current.time(),
            _ => NaiveTime::MIN,
        };
        self.emit(Some(date.and_time(time)));
    }

    /// Picks a time of day on the selected date. Ignored unless time
    /// selection is enabled and a date has been chosen.
    pub fn pick_time(&self, time: NaiveTime) {
        if !self.show_time {
            return;
        }
        if let Some(current) = self.value {
            self.emit(Some(current.date().and_time(time)));
        }
    }

    pub fn clear(&self) {
        self.emit(None);
    }

    fn emit(&self, next: Option<NaiveDateTime>) {
        if self.disabled {
            return;
        }
        if let Some(handler) = &self.on_change {
            handler(next);
        }
    }
}

/// Translates a date-fns pattern into a chrono format string.
pub fn chrono_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let token = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('a', _) => "%p",
            ('%', _) => {
                for _ in 0..run {
                    out.push_str("%%");
                }
                continue;
            }
            _ => {
                for _ in 0..run {
                    out.push(c);
                }
                continue;
            }
        };
        out.push_str(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn date_fns_patterns_translate() {
        assert_eq!(chrono_pattern("dd/MM/yyyy"), "%d/%m/%Y");
        assert_eq!(chrono_pattern("MM/dd/yyyy - h:mm aa"), "%m/%d/%Y - %-I:%M %p");
    }

    #[test]
    fn display_uses_configured_pattern() {
        let picker = DatePicker::new().value(Some(date(1990, 3, 7).and_time(NaiveTime::MIN)));
        assert_eq!(picker.display_value().as_deref(), Some("07/03/1990"));
    }

    #[test]
    fn picking_keeps_time_only_with_time_select() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let noon = NaiveTime::from_hms_opt(12, 30, 0).expect("valid time");
        let picker = DatePicker::new()
            .show_time(true)
            .value(Some(date(2024, 1, 1).and_time(noon)))
            .on_change(move |value| sink.lock().expect("lock").push(value));

        picker.pick_date(date(2024, 2, 2));
        picker.pick_time(NaiveTime::MIN);

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![
                Some(date(2024, 2, 2).and_time(noon)),
                Some(date(2024, 1, 1).and_time(NaiveTime::MIN)),
            ]
        );
    }

    #[test]
    fn time_is_ignored_without_time_select() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let picker = DatePicker::new()
            .value(Some(date(2024, 1, 1).and_time(NaiveTime::MIN)))
            .on_change(move |value| sink.lock().expect("lock").push(value));
        picker.pick_time(NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"));
        assert!(seen.lock().expect("lock").is_empty());
    }
}
