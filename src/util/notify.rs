//! Transient user-visible messages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards and the account flows report outcomes here. Each notice is shown
//! through a [`NoticeSink`] and dismissed by a scheduled task after the
//! configured lifetime.
//!
//! DESIGN
//! ======
//! Visible notices are capped. Past the cap the oldest notice is dismissed
//! early and its pending dismissal is cancelled, so rapid repeated calls
//! cannot pile up without bound. Identical texts are not merged.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::schedule::{ScheduledTask, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// CSS classes for the rendered element.
    #[must_use]
    pub fn css_class(self) -> String {
        format!("message message-{}", self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub severity: Severity,
}

/// Where notices are rendered.
pub trait NoticeSink {
    fn show(&self, notice: &Notice);
    fn dismiss(&self, id: u64);
}

/// Sink for headless use: notices go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NoticeSink for LogSink {
    fn show(&self, notice: &Notice) {
        match notice.severity {
            Severity::Error => tracing::error!(id = notice.id, "{}", notice.text),
            Severity::Warning => tracing::warn!(id = notice.id, "{}", notice.text),
            Severity::Info | Severity::Success => {
                tracing::info!(id = notice.id, severity = %notice.severity, "{}", notice.text);
            }
        }
    }

    fn dismiss(&self, id: u64) {
        tracing::debug!(id, "notice dismissed");
    }
}

// =============================================================================
// SERVICE
// =============================================================================

struct Inner {
    scheduler: Rc<dyn Scheduler>,
    sink: Rc<dyn NoticeSink>,
    ttl: Duration,
    max_visible: Option<usize>,
    next_id: Cell<u64>,
    active: RefCell<VecDeque<(Notice, ScheduledTask)>>,
}

impl Inner {
    fn remove(&self, id: u64) -> Option<(Notice, ScheduledTask)> {
        let mut active = self.active.borrow_mut();
        let index = active.iter().position(|(notice, _)| notice.id == id)?;
        active.remove(index)
    }
}

#[derive(Clone)]
pub struct NotificationService {
    inner: Rc<Inner>,
}

impl NotificationService {
    #[must_use]
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        sink: Rc<dyn NoticeSink>,
        ttl: Duration,
        max_visible: Option<usize>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                sink,
                ttl,
                max_visible,
                next_id: Cell::new(1),
                active: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Show `text` and schedule its removal. Nothing to await or act on.
    pub fn show_message(&self, text: impl Into<String>, severity: Severity) -> Notice {
        let inner = &self.inner;
        let id = inner.next_id.get();
        inner.next_id.set(id + 1);
        let notice = Notice { id, text: text.into(), severity };

        if let Some(max) = inner.max_visible {
            self.evict_down_to(max.saturating_sub(1));
        }

        inner.sink.show(&notice);
        let weak: Weak<Inner> = Rc::downgrade(inner);
        let task = inner.scheduler.schedule(
            inner.ttl,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if inner.remove(id).is_some() {
                        inner.sink.dismiss(id);
                    }
                }
            }),
        );
        inner.active.borrow_mut().push_back((notice.clone(), task));
        notice
    }

    /// Notices currently on screen, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        self.inner.active.borrow().iter().map(|(notice, _)| notice.clone()).collect()
    }

    fn evict_down_to(&self, keep: usize) {
        loop {
            let evicted = {
                let mut active = self.inner.active.borrow_mut();
                if active.len() <= keep {
                    break;
                }
                active.pop_front()
            };
            if let Some((notice, task)) = evicted {
                task.cancel();
                self.inner.sink.dismiss(notice.id);
            }
        }
    }
}
