//! Presentation Shim
//!
//! Write-only sinks driven by the editor: the mode indicator, a single
//! transient notification and the cursor affordance. The binary reads them
//! each frame. Time is passed in so the notification timer follows the
//! render loop.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::mode::EditorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    /// Hovering something that can be dragged
    Grab,
    /// Dragging
    Grabbing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    expires_at: Instant,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct Presenter {
    mode_text: String,
    notification: Option<Notification>,
    cursor: CursorStyle,
    notification_duration: Duration,
}

impl Presenter {
    pub fn new(notification_duration: Duration) -> Self {
        Self {
            mode_text: mode_indicator_text(EditorMode::Draw),
            notification: None,
            cursor: CursorStyle::Default,
            notification_duration,
        }
    }

    pub fn set_mode_indicator(&mut self, mode: EditorMode) {
        self.mode_text = mode_indicator_text(mode);
    }

    pub fn mode_text(&self) -> &str {
        &self.mode_text
    }

    /// Show `message`, replacing any current notification.
    pub fn notify(&mut self, message: impl Into<String>, is_error: bool, now: Instant) {
        let message = message.into();
        if is_error {
            warn!(%message, "notification");
        } else {
            info!(%message, "notification");
        }
        self.notification = Some(Notification {
            message,
            is_error,
            expires_at: now + self.notification_duration,
        });
    }

    /// The notification currently shown, if any.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Drop the notification once it has expired. Returns `true` if it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.notification {
            Some(n) if now >= n.expires_at => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    pub fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

/// "Current Mode: Extrude Shape" for [`EditorMode::ExtrudeShape`].
pub fn mode_indicator_text(mode: EditorMode) -> String {
    format!("Current Mode: {}", format_mode_label(mode.id()))
}

/// Space before each internal capital, first letter upper-cased.
pub fn format_mode_label(id: &str) -> String {
    let mut label = String::with_capacity(id.len() + 4);
    for (i, c) in id.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mode_label() {
        assert_eq!(format_mode_label("draw"), "Draw");
        assert_eq!(format_mode_label("extrudeShape"), "Extrude Shape");
        assert_eq!(format_mode_label("editVertex"), "Edit Vertex");
        assert_eq!(format_mode_label(""), "");
    }

    #[test]
    fn test_mode_indicator() {
        let mut presenter = Presenter::default();
        assert_eq!(presenter.mode_text(), "Current Mode: Draw");
        presenter.set_mode_indicator(EditorMode::ExtrudeShape);
        assert_eq!(presenter.mode_text(), "Current Mode: Extrude Shape");
    }

    #[test]
    fn test_notification_expires() {
        let mut presenter = Presenter::new(Duration::from_secs(2));
        let start = Instant::now();
        presenter.notify("Scene has been reset.", false, start);

        assert!(!presenter.tick(start + Duration::from_millis(1999)));
        assert!(presenter.notification().is_some());

        assert!(presenter.tick(start + Duration::from_secs(2)));
        assert!(presenter.notification().is_none());
    }

    #[test]
    fn test_new_notification_overwrites() {
        let mut presenter = Presenter::default();
        let start = Instant::now();
        presenter.notify("first", false, start);
        presenter.notify("second", true, start + Duration::from_secs(1));

        let n = presenter.notification().unwrap();
        assert_eq!(n.message, "second");
        assert!(n.is_error);

        // Timer restarted by the second message
        assert!(!presenter.tick(start + Duration::from_millis(2500)));
        assert!(presenter.tick(start + Duration::from_secs(3)));
    }

    #[test]
    fn test_cursor() {
        let mut presenter = Presenter::default();
        assert_eq!(presenter.cursor(), CursorStyle::Default);
        presenter.set_cursor(CursorStyle::Grabbing);
        assert_eq!(presenter.cursor(), CursorStyle::Grabbing);
    }
}
