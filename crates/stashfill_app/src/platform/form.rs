use std::collections::BTreeMap;

use stashfill_core::{FormField, FormHost};
use stashfill_logging::fill_debug;

/// In-memory upload form shown in the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalForm {
    fields: BTreeMap<FormField, String>,
}

impl TerminalForm {
    pub fn new(announce_url: &str) -> Self {
        let mut form = Self::default();
        if !announce_url.trim().is_empty() {
            form.fields
                .insert(FormField::AnnounceUrl, announce_url.trim().to_string());
        }
        form
    }

    pub fn announce_url(&self) -> String {
        self.get_field(FormField::AnnounceUrl).unwrap_or_default()
    }

    /// Non-empty fields in form order.
    pub fn filled(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| (*field, value.as_str()))
    }
}

impl FormHost for TerminalForm {
    fn get_field(&self, field: FormField) -> Option<String> {
        self.fields.get(&field).cloned()
    }

    fn set_field(&mut self, field: FormField, value: &str) {
        fill_debug!("Form field {} set ({} chars)", field, value.len());
        self.fields.insert(field, value.to_string());
    }
}
