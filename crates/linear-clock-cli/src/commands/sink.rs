//! Notification sinks for `watch`.

use linear_clock_core::{CoreError, Notification, NotificationSink};

const APP_NAME: &str = "linear-clock";

/// Desktop popups via the platform notification service.
pub struct DesktopSink;

impl NotificationSink for DesktopSink {
    fn notify(&mut self, notification: &Notification) -> linear_clock_core::error::Result<()> {
        let mut desktop = notify_rust::Notification::new();
        desktop
            .summary(&notification.title)
            .body(&notification.body)
            .appname(APP_NAME)
            .icon("appointment-soon")
            .timeout(notify_rust::Timeout::Milliseconds(
                u32::try_from(notification.duration_ms).unwrap_or(u32::MAX),
            ));

        // Urgency hints exist only on the XDG backend.
        #[cfg(all(unix, not(target_os = "macos")))]
        desktop.urgency(xdg_urgency(notification.urgency));

        desktop
            .show()
            .map_err(|e| CoreError::Custom(format!("desktop notification failed: {e}")))?;
        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn xdg_urgency(urgency: linear_clock_core::Urgency) -> notify_rust::Urgency {
    use linear_clock_core::Urgency;
    match urgency {
        Urgency::Low => notify_rust::Urgency::Low,
        Urgency::Normal => notify_rust::Urgency::Normal,
        Urgency::Critical => notify_rust::Urgency::Critical,
    }
}

/// One JSON object per line on stdout.
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn notify(&mut self, notification: &Notification) -> linear_clock_core::error::Result<()> {
        println!("{}", serde_json::to_string(notification)?);
        Ok(())
    }
}
