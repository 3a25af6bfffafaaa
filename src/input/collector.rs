//! Raw input collection from crossterm events

use crossterm::event::{
    Event, KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use super::events::{EventKind, EventRecord, KeyCode, Modifiers, MouseButton};
use crate::interrupt::InterruptFlag;

/// Converts crossterm events into event records
///
/// Keeps the last known cursor position so wheel events, which crossterm
/// reports at the cursor, carry a `pos` like every other mouse record.
pub struct InputCollector {
    cursor: (i32, i32),
    ctrl_c_quits: bool,
    interrupt: Option<InterruptFlag>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self {
            cursor: (0, 0),
            ctrl_c_quits: true,
            interrupt: None,
        }
    }

    /// Raises `flag` on Ctrl+C instead of emitting a record
    pub fn with_interrupt(mut self, flag: InterruptFlag) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Whether Ctrl+C becomes a `Quit` record (raw mode swallows SIGINT)
    pub fn with_ctrl_c_quits(mut self, enabled: bool) -> Self {
        self.ctrl_c_quits = enabled;
        self
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Handles one crossterm event; `None` for events with no record
    pub fn convert(&mut self, event: &Event) -> Option<EventRecord> {
        match event {
            Event::Key(key) => self.key(key),
            Event::Mouse(mouse) => Some(self.mouse(mouse)),
            Event::Resize(width, height) => Some(
                EventRecord::new(EventKind::Resize).with("size", (i32::from(*width), i32::from(*height))),
            ),
            Event::FocusGained => Some(EventRecord::new(EventKind::Focus).with("gained", true)),
            Event::FocusLost => Some(EventRecord::new(EventKind::Focus).with("gained", false)),
            Event::Paste(text) => Some(EventRecord::new(EventKind::Paste).with("text", text.as_str())),
        }
    }

    fn key(&self, event: &KeyEvent) -> Option<EventRecord> {
        let ctrl_c = event.kind != KeyEventKind::Release
            && event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, TermKey::Char('c' | 'C'));
        if ctrl_c {
            if let Some(flag) = &self.interrupt {
                flag.trigger();
                return None;
            }
            if self.ctrl_c_quits {
                return Some(EventRecord::quit());
            }
        }

        let kind = match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => EventKind::KeyPress,
            KeyEventKind::Release => EventKind::KeyRelease,
        };
        let key = KeyCode::from(event.code);
        if key == KeyCode::Other && !matches!(event.code, TermKey::Char(_)) {
            return None;
        }
        let mut record = EventRecord::new(kind)
            .with("key", key)
            .with("mods", Modifiers::from(event.modifiers));
        if let TermKey::Char(c) = event.code {
            record = record.with("char", c);
        }
        Some(record)
    }

    fn mouse(&mut self, event: &MouseEvent) -> EventRecord {
        let pos = (i32::from(event.column), i32::from(event.row));
        self.cursor = pos;
        let mods = Modifiers::from(event.modifiers);

        let pressed = |kind: EventKind, button: crossterm::event::MouseButton| {
            EventRecord::new(kind)
                .with("button", MouseButton::from(button))
                .with("pos", pos)
                .with("mods", mods)
        };
        let scroll = |dx: i32, dy: i32| {
            EventRecord::new(EventKind::Scroll)
                .with("delta", (dx, dy))
                .with("pos", pos)
                .with("mods", mods)
        };

        match event.kind {
            MouseEventKind::Down(button) => pressed(EventKind::Click, button),
            MouseEventKind::Up(button) => pressed(EventKind::Release, button),
            MouseEventKind::Drag(button) => pressed(EventKind::Drag, button),
            MouseEventKind::Moved => EventRecord::new(EventKind::Hover).with("pos", pos),
            MouseEventKind::ScrollUp => scroll(0, 1),
            MouseEventKind::ScrollDown => scroll(0, -1),
            MouseEventKind::ScrollLeft => scroll(-1, 0),
            MouseEventKind::ScrollRight => scroll(1, 0),
        }
    }
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::Value;
    use crossterm::event::MouseButton as TermButton;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_mouse_down_becomes_click() {
        let mut collector = InputCollector::new();
        let record = collector
            .convert(&mouse(MouseEventKind::Down(TermButton::Left), 3, 4))
            .unwrap();
        assert_eq!(record.kind(), EventKind::Click);
        assert_eq!(record.get("button"), Some(&Value::Button(MouseButton::Left)));
        assert_eq!(record.get("pos"), Some(&Value::Point(3, 4)));
    }

    #[test]
    fn test_scroll_uses_last_cursor() {
        let mut collector = InputCollector::new();
        collector.convert(&mouse(MouseEventKind::Moved, 7, 1));
        let record = collector
            .convert(&mouse(MouseEventKind::ScrollDown, 7, 1))
            .unwrap();
        assert_eq!(record.kind(), EventKind::Scroll);
        assert_eq!(record.get("delta"), Some(&Value::Point(0, -1)));
        assert_eq!(collector.cursor(), (7, 1));
    }

    #[test]
    fn test_char_key_carries_char() {
        let mut collector = InputCollector::new();
        let event = Event::Key(KeyEvent::new(TermKey::Char('q'), KeyModifiers::NONE));
        let record = collector.convert(&event).unwrap();
        assert_eq!(record.kind(), EventKind::KeyPress);
        assert_eq!(record.get("key"), Some(&Value::Key(KeyCode::Q)));
        assert_eq!(record.get("char"), Some(&Value::from('q')));
    }

    #[test]
    fn test_ctrl_c_becomes_quit() {
        let mut collector = InputCollector::new();
        let event = Event::Key(KeyEvent::new(TermKey::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(collector.convert(&event).unwrap().kind(), EventKind::Quit);

        let mut plain = InputCollector::new().with_ctrl_c_quits(false);
        assert_eq!(plain.convert(&event).unwrap().kind(), EventKind::KeyPress);
    }

    #[test]
    fn test_ctrl_c_raises_interrupt_flag() {
        let flag = InterruptFlag::new();
        let mut collector = InputCollector::new().with_interrupt(flag.clone());
        let event = Event::Key(KeyEvent::new(TermKey::Char('c'), KeyModifiers::CONTROL));
        assert!(collector.convert(&event).is_none());
        assert!(flag.is_raised());

        let plain = Event::Key(KeyEvent::new(TermKey::Char('c'), KeyModifiers::NONE));
        flag.reset();
        assert_eq!(collector.convert(&plain).unwrap().kind(), EventKind::KeyPress);
        assert!(!flag.is_raised());
    }

    #[test]
    fn test_key_release() {
        let mut collector = InputCollector::new();
        let event = Event::Key(KeyEvent::new_with_kind(
            TermKey::Esc,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        let record = collector.convert(&event).unwrap();
        assert_eq!(record.kind(), EventKind::KeyRelease);
        assert_eq!(record.get("key"), Some(&Value::Key(KeyCode::Escape)));
    }

    #[test]
    fn test_unmapped_key_is_dropped() {
        let mut collector = InputCollector::new();
        let event = Event::Key(KeyEvent::new(TermKey::Insert, KeyModifiers::NONE));
        assert!(collector.convert(&event).is_none());
    }

    #[test]
    fn test_resize_and_focus() {
        let mut collector = InputCollector::new();
        let resize = collector.convert(&Event::Resize(80, 24)).unwrap();
        assert_eq!(resize.get("size"), Some(&Value::Point(80, 24)));
        let focus = collector.convert(&Event::FocusLost).unwrap();
        assert_eq!(focus.get("gained"), Some(&Value::Bool(false)));
    }
}
