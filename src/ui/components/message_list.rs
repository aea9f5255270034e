//! Message list component
//!
//! Displays the transcript: welcome card, message bubbles, and typing
//! placeholders, with throttled auto-scroll to the newest entry.

use crate::messages::{Sender, TranscriptEntry, WELCOME_TEXT};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, RichText};
use std::time::{Duration, Instant};

/// Minimum gap between two auto-scrolls.
const SCROLL_THROTTLE: Duration = Duration::from_millis(100);

/// Tracks transcript revisions and throttles auto-scrolling so rapid
/// successive appends do not scroll on every frame.
pub struct ScrollTracker {
    last_revision: u64,
    last_scroll: Option<Instant>,
    pending: bool,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self {
            last_revision: 0,
            last_scroll: None,
            pending: false,
        }
    }

    /// Whether this frame should scroll to the bottom. A revision
    /// change within the throttle window stays pending and fires on a
    /// later frame.
    pub fn should_scroll(&mut self, revision: u64) -> bool {
        if revision != self.last_revision {
            self.last_revision = revision;
            self.pending = true;
        }

        if !self.pending {
            return false;
        }

        if let Some(last) = self.last_scroll {
            if last.elapsed() < SCROLL_THROTTLE {
                return false;
            }
        }

        self.pending = false;
        self.last_scroll = Some(Instant::now());
        true
    }

    /// A scroll is queued but throttled; the caller should repaint.
    pub fn pending(&self) -> bool {
        self.pending
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Message list component
pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui, tracker: &mut ScrollTracker) {
        let entries = self.state.transcript.entries();
        let scroll_now = tracker.should_scroll(self.state.transcript.revision());

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    for entry in &entries {
                        match entry {
                            TranscriptEntry::Welcome => self.show_welcome(ui),
                            TranscriptEntry::Message {
                                message,
                                display_text,
                            } => self.show_bubble(ui, message.sender, display_text, &message.time_label()),
                            TranscriptEntry::Placeholder { .. } => self.show_typing(ui),
                        }
                        ui.add_space(self.theme.spacing_sm);
                    }

                    ui.add_space(self.theme.spacing);
                });

                if scroll_now {
                    ui.scroll_to_cursor(Some(Align::BOTTOM));
                }
            });
    }

    fn show_welcome(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing);

            egui::Frame::none()
                .fill(self.theme.bg_secondary)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new("Campus Assistant")
                            .size(18.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.add_space(self.theme.spacing_sm);
                    ui.label(RichText::new(WELCOME_TEXT).color(self.theme.text_secondary));
                });
        });
    }

    fn show_bubble(&self, ui: &mut egui::Ui, sender: Sender, text: &str, time: &str) {
        let is_user = sender == Sender::User;
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.bot_bubble
        };
        let text_color = if is_user {
            egui::Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Assistant" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(text).color(text_color));
                });

            ui.label(
                RichText::new(time)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_typing(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            ui.label(
                RichText::new("Assistant")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            egui::Frame::none()
                .fill(self.theme.bot_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for i in 0..3 {
                            let alpha = if self.state.settings.animations {
                                let t = ui.ctx().input(|input| input.time);
                                ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32
                            } else {
                                0.6
                            };
                            ui.label(
                                RichText::new("●")
                                    .size(10.0)
                                    .color(self.theme.text_muted.gamma_multiply(alpha)),
                            );
                        }
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scroll_without_revision_change() {
        let mut tracker = ScrollTracker::new();
        assert!(!tracker.should_scroll(0));
        assert!(!tracker.should_scroll(0));
    }

    #[test]
    fn test_first_change_scrolls_immediately() {
        let mut tracker = ScrollTracker::new();
        assert!(tracker.should_scroll(1));
        assert!(!tracker.should_scroll(1));
    }

    #[test]
    fn test_rapid_changes_are_throttled() {
        let mut tracker = ScrollTracker::new();
        assert!(tracker.should_scroll(1));
        // A second mutation right away stays pending.
        assert!(!tracker.should_scroll(2));
        assert!(tracker.pending());

        std::thread::sleep(SCROLL_THROTTLE + Duration::from_millis(10));
        assert!(tracker.should_scroll(2));
        assert!(!tracker.pending());
    }
}
