//! Column selection combo box

use egui::{ComboBox, Response, Ui};

/// Entry shown for an optional column left empty
pub const NONE_LABEL: &str = "(none)";

/// A combo box over the dataset's column names
pub struct ColumnPicker<'a> {
    label: &'a str,
    selected: &'a mut Option<String>,
    columns: &'a [String],
    optional: bool,
}

impl<'a> ColumnPicker<'a> {
    pub fn new(label: &'a str, selected: &'a mut Option<String>, columns: &'a [String]) -> Self {
        Self {
            label,
            selected,
            columns,
            optional: false,
        }
    }

    /// Offer a "(none)" entry that clears the selection
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let text = self.selected.as_deref().unwrap_or(NONE_LABEL).to_string();
        ui.horizontal(|ui| {
            ui.label(self.label);
            ComboBox::from_id_salt(self.label)
                .selected_text(text)
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    if self.optional {
                        ui.selectable_value(&mut *self.selected, None, NONE_LABEL);
                    }
                    for name in self.columns {
                        ui.selectable_value(&mut *self.selected, Some(name.clone()), name);
                    }
                });
        })
        .response
    }
}
