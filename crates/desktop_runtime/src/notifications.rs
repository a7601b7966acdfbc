//! Notification tray: FIFO history, unread counter, a single active popup, and auto-close timers.
//!
//! Timers are not owned here. Operations return [`TrayEffect`] values that the UI layer turns
//! into real timeouts; an elapsed timer reports back with its token, and stale tokens are ignored.

use std::time::Duration;

use platform_host::unix_time_ms_now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    /// Unix milliseconds when the notification was added.
    pub timestamp: u64,
    pub auto_close: bool,
}

/// Timer work requested by the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEffect {
    ScheduleAutoClose {
        id: NotificationId,
        token: u64,
        after: Duration,
    },
    CancelAutoClose {
        id: NotificationId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    id: NotificationId,
    token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTray {
    items: Vec<Notification>,
    unread: usize,
    popup: Option<NotificationId>,
    history_open: bool,
    timer: Option<PendingTimer>,
    auto_close_after: Duration,
    next_id: u64,
    next_token: u64,
}

impl Default for NotificationTray {
    fn default() -> Self {
        Self::new(Duration::from_millis(5_000))
    }
}

impl NotificationTray {
    pub fn new(auto_close_after: Duration) -> Self {
        Self {
            items: Vec::new(),
            unread: 0,
            popup: None,
            history_open: false,
            timer: None,
            auto_close_after,
            next_id: 0,
            next_token: 0,
        }
    }

    /// Delay used for notifications added from now on.
    pub fn set_auto_close_after(&mut self, after: Duration) {
        self.auto_close_after = after;
    }

    /// Notifications oldest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn popup(&self) -> Option<&Notification> {
        let id = self.popup?;
        self.items.iter().find(|n| n.id == id)
    }

    /// Adds a notification and shows it as the popup, replacing any previous popup.
    pub fn notify(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        auto_close: bool,
    ) -> (NotificationId, Vec<TrayEffect>) {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.items.push(Notification {
            id,
            title: title.into(),
            message: message.into(),
            timestamp: unix_time_ms_now(),
            auto_close,
        });
        self.unread += 1;

        let mut effects = self.cancel_timer();
        self.popup = Some(id);
        if auto_close {
            self.next_token += 1;
            let token = self.next_token;
            self.timer = Some(PendingTimer { id, token });
            effects.push(TrayEffect::ScheduleAutoClose {
                id,
                token,
                after: self.auto_close_after,
            });
        }
        (id, effects)
    }

    fn cancel_timer(&mut self) -> Vec<TrayEffect> {
        self.timer
            .take()
            .map(|timer| vec![TrayEffect::CancelAutoClose { id: timer.id }])
            .unwrap_or_default()
    }

    fn cancel_timer_for(&mut self, id: NotificationId) -> Vec<TrayEffect> {
        if self.timer.is_some_and(|timer| timer.id == id) {
            self.cancel_timer()
        } else {
            Vec::new()
        }
    }

    /// Timer callback. Hides the popup only when `token` is still current.
    pub fn auto_close_elapsed(&mut self, id: NotificationId, token: u64) -> bool {
        if self.timer != Some(PendingTimer { id, token }) {
            return false;
        }
        self.timer = None;
        if self.popup == Some(id) {
            self.popup = None;
        }
        true
    }

    /// User closed the popup. The notification stays in history.
    pub fn dismiss_popup(&mut self) -> Vec<TrayEffect> {
        let Some(id) = self.popup.take() else {
            return Vec::new();
        };
        self.cancel_timer_for(id)
    }

    /// User clicked the popup: it counts as read and closes.
    pub fn click_popup(&mut self) -> Vec<TrayEffect> {
        if self.popup.is_some() {
            self.unread = self.unread.saturating_sub(1);
        }
        self.dismiss_popup()
    }

    /// Tray icon click. Opening the history panel marks everything read.
    pub fn toggle_history(&mut self) {
        self.history_open = !self.history_open;
        if self.history_open {
            self.unread = 0;
        }
    }

    /// Removes one notification from history, closing its popup and timer.
    pub fn dismiss(&mut self, id: NotificationId) -> Vec<TrayEffect> {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        if self.items.len() == before {
            return Vec::new();
        }
        self.unread = self.unread.min(self.items.len());
        if self.popup == Some(id) {
            self.popup = None;
        }
        self.cancel_timer_for(id)
    }

    pub fn clear_all(&mut self) -> Vec<TrayEffect> {
        self.items.clear();
        self.unread = 0;
        self.popup = None;
        self.cancel_timer()
    }
}
