pub mod input_bar;
pub mod message_list;
pub mod notifications;
pub mod settings_panel;

pub use input_bar::InputBar;
pub use message_list::{MessageList, ScrollTracker};
pub use notifications::NotificationOverlay;
pub use settings_panel::SettingsPanel;
