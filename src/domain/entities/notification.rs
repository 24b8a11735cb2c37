#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub const MAX_VISIBLE_NOTIFICATIONS: usize = 4;

/// Toast queue shown by the app shell. Oldest entries drop off first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationCenter {
    next_id: u64,
    items: Vec<(u64, Notification)>,
}

impl NotificationCenter {
    pub fn push(&mut self, notification: Notification) -> u64 {
        self.next_id += 1;
        self.items.push((self.next_id, notification));
        if self.items.len() > MAX_VISIBLE_NOTIFICATIONS {
            let overflow = self.items.len() - MAX_VISIBLE_NOTIFICATIONS;
            self.items.drain(..overflow);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|(item_id, _)| *item_id != id);
    }

    pub fn items(&self) -> &[(u64, Notification)] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_latest_notifications() {
        let mut center = NotificationCenter::default();
        for idx in 0..6 {
            center.push(Notification::success(format!("saved {idx}")));
        }

        let messages: Vec<_> = center.items().iter().map(|(_, n)| n.message.as_str()).collect();
        assert_eq!(messages, vec!["saved 2", "saved 3", "saved 4", "saved 5"]);
    }

    #[test]
    fn dismiss_removes_by_id() {
        let mut center = NotificationCenter::default();
        let first = center.push(Notification::error("boom"));
        center.push(Notification::success("ok"));

        center.dismiss(first);

        assert_eq!(center.items().len(), 1);
        assert!(!center.items()[0].1.is_error());
    }
}
