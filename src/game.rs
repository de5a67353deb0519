use std::{process::exit, thread::sleep, time::Duration};

use crate::engine::{
    Direction::{self, *},
    GameEngine,
};
use crate::term::{ScreenPos, TermManager};
use crate::{Cell, GridInt};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const TICK_INTERVAL_MS: u64 = 5;
const TICKS_PER_STEP: u64 = 20;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Drives the engine: paces the ticks, feeds it the last pending direction
/// key, and paints the snapshot it returns. All game logic lives in the
/// engine; this shell only renders and collects input.
pub struct GameShell {
    grid_size: GridInt,
    engine: GameEngine,
    term: TermManager,
    origin: ScreenPos,
    paused: bool,
}

impl GameShell {
    pub fn new(grid_size: GridInt) -> Self {
        GameShell {
            grid_size,
            engine: GameEngine::new(grid_size),
            term: TermManager::new(),
            origin: (0, 0),
            paused: false,
        }
    }

    pub fn run(&mut self) -> ! {
        self.term.setup();

        // Center the bordered board on the screen
        let (term_w, term_h) = self.term.size();
        let board = self.grid_size + 2;
        self.origin = (
            term_w.saturating_sub(board) / 2,
            term_h.saturating_sub(board) / 2,
        );

        self.show_intro();

        loop {
            self.play_round();
        }
    }

    fn show_intro(&mut self) {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ]);

        if is_ctrl_c(&self.term.read_key_blocking()) {
            self.clean_exit()
        }
    }

    fn play_round(&mut self) {
        self.engine.reset();
        self.paused = false;
        self.repaint();

        let mut pending: Option<Direction> = None;
        let mut ticks_until_step = TICKS_PER_STEP;

        loop {
            sleep(Duration::from_millis(TICK_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue() {
                match &key_ev {
                    ev if is_ctrl_c(ev) => self.clean_exit(),
                    KeyEvent { code, modifiers: _ } => match code {
                        KeyCode::Char('w') | KeyCode::Up => pending = Some(Up),
                        KeyCode::Char('a') | KeyCode::Left => pending = Some(Left),
                        KeyCode::Char('s') | KeyCode::Down => pending = Some(Down),
                        KeyCode::Char('d') | KeyCode::Right => pending = Some(Right),
                        KeyCode::Esc => self.toggle_pause(),
                        _ => {}
                    },
                }
            }

            if self.paused {
                continue;
            }

            ticks_until_step -= 1;
            if ticks_until_step > 0 {
                continue;
            }
            ticks_until_step = TICKS_PER_STEP;

            let alive = self.engine.step(pending.take()).alive;
            self.draw_board(!alive);

            if !alive {
                self.game_over();
                return;
            }
        } // Game loop
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) {
        self.term.restore();
        exit(0);
    }

    fn game_over(&mut self) {
        let state = self.engine.state();
        let cells = self.grid_size as usize * self.grid_size as usize;
        let title = if state.snake.len() == cells { "You won!" } else { "Game over!" };
        let score = state.score;

        self.term.show_message(&[
            title,
            &*format!("Score: {}", score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit.",
        ]);

        if is_ctrl_c(&self.term.read_key_blocking()) {
            self.clean_exit()
        }
    }

    fn repaint(&mut self) {
        self.term.clear();
        self.term.draw_box(self.origin, (self.grid_size, self.grid_size));
        let dead = !self.engine.state().alive;
        self.draw_board(dead);
    }

    fn draw_board(&mut self, dead: bool) {
        let state = self.engine.state().clone();

        for x in 0..self.grid_size {
            for y in 0..self.grid_size {
                let cell = (x, y);
                let ch = if cell == state.snake[0] {
                    if dead { DEAD_SNAKE_CHAR } else { head_glyph(state.direction) }
                } else if state.snake.contains(&cell) {
                    if dead { DEAD_SNAKE_CHAR } else { SNAKE_BODY_CHAR }
                } else if cell == state.food {
                    FOOD_CHAR
                } else {
                    ' '
                };
                self.term.print_at(self.cell_pos(cell), ch);
            }
        }

        let below_board = (self.origin.0, self.origin.1 + self.grid_size + 2);
        self.term.print_text(below_board, &format!("Score: {}", state.score));
        self.term.flush();
    }

    // Grid cells are (row, column), screen positions are (column, row);
    // the +1 skips the border
    fn cell_pos(&self, cell: Cell) -> ScreenPos {
        (self.origin.0 + 1 + cell.1, self.origin.1 + 1 + cell.0)
    }

    fn toggle_pause(&mut self) {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"]);
        } else {
            // The message box overwrote part of the board
            self.repaint();
        }

        self.paused = !self.paused;
    }
}

fn head_glyph(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
