// File: ./src/model/display.rs
use crate::model::item::Task;
use crate::model::validate::format_date;

pub trait TaskDisplay {
    fn checkbox_symbol(&self) -> &'static str;
    fn to_display_string(&self) -> String;
}

impl TaskDisplay for Task {
    fn checkbox_symbol(&self) -> &'static str {
        if self.done { "[x]" } else { "[ ]" }
    }

    /// Multi-line block used by `list` and `show`.
    fn to_display_string(&self) -> String {
        format!(
            "  {} #{} | {} [{}]\n      Description: {}\n      Deadline:    {}\n      Scheduled:   {} -> {}\n",
            self.checkbox_symbol(),
            self.id,
            self.title,
            self.priority.to_string().to_uppercase(),
            self.description,
            format_date(&self.deadline),
            format_date(&self.start_time),
            format_date(&self.end_time),
        )
    }
}
