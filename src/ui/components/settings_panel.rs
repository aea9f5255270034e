//! Settings window. Every change applies and persists immediately.

use crate::settings::FontSize;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct SettingsPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        if !self.state.show_settings {
            return;
        }

        let mut open = true;
        let before = self.state.settings;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Appearance")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
                ui.add_space(4.0);

                egui::ComboBox::from_label("Font size")
                    .selected_text(self.state.settings.font_size.label())
                    .show_ui(ui, |ui| {
                        for size in [FontSize::Small, FontSize::Medium, FontSize::Large] {
                            ui.selectable_value(
                                &mut self.state.settings.font_size,
                                size,
                                size.label(),
                            );
                        }
                    });

                ui.checkbox(&mut self.state.settings.animations, "Enable animations");

                ui.add_space(self.theme.spacing_sm);
                ui.label(
                    RichText::new("Feedback")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
                ui.add_space(4.0);

                ui.checkbox(&mut self.state.settings.sound_effects, "Sound effects");
            });

        if self.state.settings != before {
            self.state.persist_settings();
        }

        if !open {
            self.state.show_settings = false;
        }
    }
}
