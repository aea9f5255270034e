//! Toast overlay, anchored to the top-right corner.

use crate::notify::{Kind, NotificationCenter};
use crate::ui::theme::Theme;
use egui::{self, Align2, RichText};

pub struct NotificationOverlay<'a> {
    center: &'a mut NotificationCenter,
    theme: &'a Theme,
    animations: bool,
}

impl<'a> NotificationOverlay<'a> {
    pub fn new(center: &'a mut NotificationCenter, theme: &'a Theme, animations: bool) -> Self {
        Self {
            center,
            theme,
            animations,
        }
    }

    pub fn show(self, ctx: &egui::Context) {
        let ttl = self.center.ttl();
        let toasts = self.center.active().to_vec();
        if toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notification_overlay"))
            .anchor(Align2::RIGHT_TOP, [-16.0, 16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(300.0);

                for toast in &toasts {
                    // Fade over the last fifth of the toast's life.
                    let alpha = if self.animations {
                        let age = toast.age_fraction(ttl);
                        (1.0 - (age - 0.8).max(0.0) / 0.2).clamp(0.0, 1.0)
                    } else {
                        1.0
                    };

                    let accent = self.theme.kind_color(toast.kind).gamma_multiply(alpha);

                    egui::Frame::none()
                        .fill(self.theme.bg_secondary.gamma_multiply(alpha))
                        .rounding(self.theme.card_rounding)
                        .stroke(egui::Stroke::new(1.0, accent))
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(kind_icon(toast.kind)).color(accent));
                                ui.label(
                                    RichText::new(&toast.text)
                                        .color(self.theme.text_primary.gamma_multiply(alpha)),
                                );
                            });
                        });

                    ui.add_space(6.0);
                }
            });
    }
}

fn kind_icon(kind: Kind) -> &'static str {
    match kind {
        Kind::Info => "ℹ",
        Kind::Success => "✔",
        Kind::Warning => "⚠",
        Kind::Error => "✖",
    }
}
