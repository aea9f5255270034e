//! Input bar component
//!
//! Quick-action row plus the text input with voice, attach, and send
//! controls.

use crate::ui::state::{AppState, QUICK_ACTIONS};
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// Input bar component for text and voice input
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        self.show_quick_actions(ui);
        ui.add_space(self.theme.spacing_sm);

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_attach_button(ui);

                    if self.state.speech.available() {
                        self.show_voice_button(ui);
                    }

                    self.show_text_input(ui);
                    self.show_send_button(ui);
                });
            });
    }

    fn show_quick_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for query in QUICK_ACTIONS {
                let button = egui::Button::new(
                    RichText::new(*query)
                        .size(12.0)
                        .color(self.theme.text_secondary),
                )
                .fill(self.theme.bg_secondary)
                .rounding(self.theme.button_rounding);

                if ui.add(button).clicked() {
                    self.state.quick_action(query);
                }
            }
        });
    }

    fn show_attach_button(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new(
            RichText::new("📎").size(18.0).color(self.theme.text_muted),
        )
        .min_size(Vec2::splat(40.0))
        .rounding(self.theme.button_rounding);

        if ui.add(button).on_hover_text("Attach a file").clicked() {
            self.state.attach();
        }
    }

    fn show_voice_button(&mut self, ui: &mut egui::Ui) {
        let listening = self.state.speech.is_listening();

        let (icon, color) = if listening {
            ("🎤", self.theme.listening)
        } else {
            ("🎤", self.theme.text_secondary)
        };

        let button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding);

        let button = if listening {
            button.fill(self.theme.listening.gamma_multiply(0.2))
        } else {
            button
        };

        let response = ui.add(button);
        let button_rect = response.rect;

        if response
            .on_hover_text(if listening {
                "Stop listening (Ctrl+/)"
            } else {
                "Speak your question (Ctrl+/)"
            })
            .clicked()
        {
            self.state.toggle_voice();
        }

        if listening && self.state.settings.animations {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

            let painter = ui.painter();
            let center = button_rect.center();
            let radius = button_rect.width() / 2.0 + 2.0 + pulse * 3.0;

            painter.circle_stroke(
                center,
                radius,
                egui::Stroke::new(
                    2.0 * pulse,
                    self.theme.listening.gamma_multiply(1.0 - pulse * 0.5),
                ),
            );
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        // Reserve space for the send button.
        let available_width = ui.available_width() - 56.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text("Type your question...")
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add(text_edit);

        if self.state.focus_input {
            response.request_focus();
            self.state.focus_input = false;
        }

        let enter_pressed =
            response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if enter_pressed && !self.state.input_text.trim().is_empty() {
            let text = self.state.input_text.clone();
            self.state.submit(&text);
            response.request_focus();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty();

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(
            RichText::new("➤").size(18.0).color(egui::Color32::WHITE),
        )
        .min_size(Vec2::splat(40.0))
        .rounding(self.theme.button_rounding)
        .fill(button_color);

        let response = ui.add_enabled(can_send, button);

        if response.on_hover_text("Send message (Enter)").clicked() {
            let text = self.state.input_text.clone();
            self.state.submit(&text);
        }
    }
}
