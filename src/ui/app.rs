//! Main application struct and eframe integration

use crate::settings::{FontSize, ThemeChoice};
use crate::ui::components::{
    InputBar, MessageList, NotificationOverlay, ScrollTracker, SettingsPanel,
};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, Key, RichText, TopBottomPanel};
use std::time::Duration;

/// Main application shell
pub struct ChatterApp {
    state: AppState,
    theme: Theme,
    scroll: ScrollTracker,
    /// The (theme, font size) pair the egui context was styled with.
    applied: (ThemeChoice, FontSize),
}

impl ChatterApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::from_settings(&state.settings);
        theme.apply(&cc.egui_ctx, state.settings.font_size.scale());
        let applied = (state.settings.theme, state.settings.font_size);

        Self {
            state,
            theme,
            scroll: ScrollTracker::new(),
            applied,
        }
    }

    /// Re-style the context when the theme or font size changed.
    fn sync_theme(&mut self, ctx: &egui::Context) {
        let current = (self.state.settings.theme, self.state.settings.font_size);
        if current != self.applied {
            self.theme = Theme::from_settings(&self.state.settings);
            self.theme
                .apply(ctx, self.state.settings.font_size.scale());
            self.applied = current;
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (focus, close, voice) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(Key::K),
                i.key_pressed(Key::Escape),
                i.modifiers.command && i.key_pressed(Key::Slash),
            )
        });

        if focus {
            self.state.focus_input = true;
        }
        if close {
            self.state.show_settings = false;
            self.state.confirm_clear = false;
        }
        if voice {
            self.state.toggle_voice();
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Chatter")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Campus Assistant")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    if self.state.speech.is_listening() {
                        ui.label(
                            RichText::new("listening…")
                                .size(12.0)
                                .color(self.theme.listening),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("⚙").on_hover_text("Settings").clicked() {
                            self.state.show_settings = true;
                            self.state.cue(crate::sound::Cue::Click);
                        }

                        let theme_icon = match self.state.settings.theme {
                            ThemeChoice::Dark => "☀",
                            ThemeChoice::Light => "🌙",
                        };
                        if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                            self.state.toggle_theme();
                        }

                        if ui.button("🗑").on_hover_text("Clear chat").clicked() {
                            self.state.confirm_clear = true;
                        }
                    });
                });
            });
    }

    fn show_clear_confirm(&mut self, ctx: &egui::Context) {
        if !self.state.confirm_clear {
            return;
        }

        egui::Window::new("Clear chat?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to clear the chat history?");
                ui.add_space(self.theme.spacing_sm);
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.state.clear_chat();
                        self.state.confirm_clear = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.state.confirm_clear = false;
                    }
                });
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&self.state, &self.theme).show(ui, &mut self.scroll);
            });
    }
}

impl eframe::App for ChatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();
        self.sync_theme(ctx);
        self.handle_shortcuts(ctx);

        self.show_header(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);
        self.show_clear_confirm(ctx);

        SettingsPanel::new(&mut self.state, &self.theme).show(ctx);

        let has_toasts = !self.state.notifications.active().is_empty();
        NotificationOverlay::new(
            &mut self.state.notifications,
            &self.theme,
            self.state.settings.animations,
        )
        .show(ctx);

        // Keep painting while something is in motion: pending
        // exchanges, an open voice session, live toasts, or a
        // throttled scroll waiting its turn.
        if self.state.pending_exchanges() > 0
            || self.state.speech.is_listening()
            || has_toasts
            || self.scroll.pending()
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
        tracing::info!("Chatter shutting down");
    }
}
