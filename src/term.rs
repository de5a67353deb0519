use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

/// Screen positions are (column, row), matching crossterm's cursor order.
pub type ScreenPos = (u16, u16);

/// Thin wrapper over the raw terminal: alternate screen, queued drawing,
/// centered message boxes and key-event draining. Callers repaint whatever
/// a message box overwrote.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        let (width, height) = terminal::size().expect("Error reading size.");
        TermManager { width, height, stdout: stdout() }
    }

    pub fn setup(&mut self) {
        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        self.set_raw_mode(true);
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .expect("Error hiding cursor.");
    }

    pub fn restore(&mut self) {
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking)
            .expect("Error showing cursor.");
        self.set_raw_mode(false);
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    pub fn size(&self) -> ScreenPos {
        (self.width, self.height)
    }

    pub fn read_key_blocking(&self) -> KeyEvent {
        loop {
            if let Event::Key(ev) = read().unwrap() {
                return ev;
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).unwrap() {
            if let Event::Key(ev) = read().unwrap() {
                events.push(ev);
            }
        }

        events
    }

    pub fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
    }

    pub fn print_at(&mut self, pos: ScreenPos, ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).unwrap();
    }

    pub fn print_text(&mut self, pos: ScreenPos, text: &str) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(text)).unwrap();
    }

    /// Draws a box frame whose interior is `inner` (columns, rows) in size,
    /// with its top-left corner at `top_left`.
    pub fn draw_box(&mut self, top_left: ScreenPos, inner: (u16, u16)) {
        let width = inner.0 + 2;
        let height = inner.1 + 2;
        let end_x = top_left.0 + width - 1;
        let end_y = top_left.1 + height - 1;

        for x in top_left.0..=end_x {
            let ch = if x == top_left.0 || x == end_x { '+' } else { '-' };
            self.print_at((x, top_left.1), ch);
            self.print_at((x, end_y), ch);
        }

        for y in top_left.1 + 1..end_y {
            self.print_at((top_left.0, y), '|');
            self.print_at((end_x, y), '|');
        }

        self.flush();
    }

    pub fn show_message(&mut self, lines: &[&str]) {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap() + 2) as u16;
        let top_left = (
            (self.width - msg_width) / 2,
            (self.height - msg_height) / 2,
        );

        // Blank top and bottom lines frame the text
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, *y), ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.print_text((top_left.0, top_left.1 + i as u16 + 1), &padded);
        }

        self.flush();
    }

    pub fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_raw_mode(&self, option: bool) {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.expect("Error setting raw mode.");
    }
}
