use std::{
    fmt::{self, Write as _},
    sync::{Mutex, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use egui::{Color32, RichText};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn color(self) -> Color32 {
        match self {
            LogLevel::Debug => Color32::GRAY,
            LogLevel::Info => Color32::LIGHT_GRAY,
            LogLevel::Warn => Color32::from_rgb(230, 180, 60),
            LogLevel::Error => Color32::from_rgb(230, 80, 80),
        }
    }
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        if *level == Level::ERROR {
            LogLevel::Error
        } else if *level == Level::WARN {
            LogLevel::Warn
        } else if *level == Level::INFO {
            LogLevel::Info
        } else {
            LogLevel::Debug
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp_secs: u64,
    pub level: LogLevel,
    pub message: String,
}

const MAX_ENTRIES: usize = 500;

static LOG_BUFFER: OnceLock<Mutex<Vec<LogEntry>>> = OnceLock::new();

fn buffer() -> &'static Mutex<Vec<LogEntry>> {
    LOG_BUFFER.get_or_init(|| Mutex::new(Vec::with_capacity(128)))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn push(level: LogLevel, message: String) {
    let Ok(mut guard) = buffer().lock() else {
        return;
    };
    guard.push(LogEntry {
        timestamp_secs: now_secs(),
        level,
        message,
    });
    if guard.len() > MAX_ENTRIES {
        let overflow = guard.len() - MAX_ENTRIES;
        guard.drain(0..overflow);
    }
}

pub fn entries() -> Vec<LogEntry> {
    buffer().lock().map(|v| v.clone()).unwrap_or_default()
}

pub fn clear() {
    if let Ok(mut guard) = buffer().lock() {
        guard.clear();
    }
}

/// Collects an event's message followed by its other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// Mirrors tracing events into the panel buffer.
pub struct PanelLayer;

pub fn layer() -> PanelLayer {
    PanelLayer
}

impl<S: Subscriber> Layer<S> for PanelLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let MessageVisitor { mut message, fields } = visitor;
        message.push_str(&fields);
        push(LogLevel::from(event.metadata().level()), message);
    }
}

pub fn show(ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("log_panel")
        .resizable(true)
        .default_height(140.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Log");
                if ui.small_button("Clear").clicked() {
                    clear();
                }
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for entry in entries() {
                        ui.label(
                            RichText::new(format!(
                                "{} {:<5} {}",
                                entry.timestamp_secs,
                                entry.level.label(),
                                entry.message
                            ))
                            .monospace()
                            .color(entry.level.color()),
                        );
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn events_land_in_the_buffer_with_their_fields() {
        let subscriber = tracing_subscriber::registry().with(layer());
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(view = 7, "panel layer check");
        });

        let entry = entries()
            .into_iter()
            .rev()
            .find(|entry| entry.message.starts_with("panel layer check"))
            .unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "panel layer check view=7");
    }
}
