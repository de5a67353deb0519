use std::collections::VecDeque;

use crate::{Cell, GridInt};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use Direction::*;

pub const GRID_SIZE: GridInt = 20;

const START_CELL: Cell = (5, 5);
const START_DIRECTION: Direction = Right;
const FOOD_SAMPLE_RETRIES: u32 = 64;

/// A heading on the grid. The grid is row-major: `x` indexes rows and `y`
/// indexes columns, so `Up` decreases `x` and `Right` increases `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Snapshot of one game: the snake (head at the front, length >= 1, no
/// duplicate cells), its heading, the food cell (never on the snake while
/// the game is alive), the score, and whether the game is still running.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub alive: bool,
}

/// Owns the authoritative game state and advances it one tick at a time.
/// Movement wraps around the edges; the game only ends on self-collision
/// (or when the snake fills the whole board).
pub struct GameEngine {
    grid_size: GridInt,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(grid_size: GridInt) -> Self {
        Self::from_rng(grid_size, StdRng::from_entropy())
    }

    /// Deterministic food placement, for tests.
    pub fn with_seed(grid_size: GridInt, seed: u64) -> Self {
        Self::from_rng(grid_size, StdRng::seed_from_u64(seed))
    }

    fn from_rng(grid_size: GridInt, mut rng: StdRng) -> Self {
        let state = initial_state(grid_size, &mut rng);
        GameEngine { grid_size, state, rng }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Discards the current game and starts a fresh one.
    pub fn reset(&mut self) -> &GameState {
        self.state = initial_state(self.grid_size, &mut self.rng);
        &self.state
    }

    /// Advances the game by one tick. `requested` is the direction change
    /// asked for this tick, if any; a request for the exact opposite of the
    /// current heading is ignored, everything else is accepted. Once the
    /// game is over, `step` returns the final snapshot unchanged until
    /// `reset` is called.
    pub fn step(&mut self, requested: Option<Direction>) -> &GameState {
        if !self.state.alive {
            return &self.state;
        }

        if let Some(dir) = requested {
            if dir != self.state.direction.opposite() {
                self.state.direction = dir;
            }
        }

        let (dx, dy) = self.state.direction.delta();
        let (head_x, head_y) = self.state.snake[0];
        let size = self.grid_size as i32;
        let new_head = (
            (head_x as i32 + dx).rem_euclid(size) as GridInt,
            (head_y as i32 + dy).rem_euclid(size) as GridInt,
        );

        // Collision is checked against the pre-move body, tail included,
        // so the state freezes exactly as it was at the moment of death
        if self.state.snake.contains(&new_head) {
            self.state.alive = false;
            return &self.state;
        }

        self.state.snake.push_front(new_head);

        if new_head == self.state.food {
            self.state.score += 1;
            match spawn_food(&mut self.rng, self.grid_size, &self.state.snake) {
                Some(food) => self.state.food = food,
                None => self.state.alive = false, // snake fills the board
            }
        } else {
            self.state.snake.pop_back();
        }

        &self.state
    }
}

fn initial_state(grid_size: GridInt, rng: &mut StdRng) -> GameState {
    let snake: VecDeque<Cell> = vec![START_CELL].into();
    let food = spawn_food(rng, grid_size, &snake).unwrap();

    GameState {
        snake,
        direction: START_DIRECTION,
        food,
        score: 0,
        alive: true,
    }
}

fn spawn_food(rng: &mut StdRng, grid_size: GridInt, snake: &VecDeque<Cell>) -> Option<Cell> {
    // Rejection sampling over the whole grid, capped so a nearly full
    // board can't keep us spinning
    for _ in 0..FOOD_SAMPLE_RETRIES {
        let cell = (rng.gen_range(0..grid_size), rng.gen_range(0..grid_size));
        if !snake.contains(&cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = (0..grid_size)
        .flat_map(|x| (0..grid_size).map(move |y| (x, y)))
        .filter(|cell| !snake.contains(cell))
        .collect();
    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(grid_size: GridInt, snake: Vec<Cell>, direction: Direction, food: Cell) -> GameEngine {
        GameEngine {
            grid_size,
            state: GameState {
                snake: snake.into(),
                direction,
                food,
                score: 0,
                alive: true,
            },
            rng: StdRng::seed_from_u64(7),
        }
    }

    fn in_bounds(cell: Cell, grid_size: GridInt) -> bool {
        cell.0 < grid_size && cell.1 < grid_size
    }

    #[test]
    fn head_wraps_off_the_top_edge() {
        let mut engine = engine_with(20, vec![(0, 5)], Up, (9, 9));
        let state = engine.step(None);
        assert_eq!(state.snake[0], (19, 5));
        assert!(state.alive);
    }

    #[test]
    fn head_wraps_off_the_left_edge() {
        let mut engine = engine_with(20, vec![(5, 0)], Left, (9, 9));
        let state = engine.step(None);
        assert_eq!(state.snake[0], (5, 19));
    }

    #[test]
    fn reversal_request_is_silently_ignored() {
        let mut engine = engine_with(20, vec![(5, 5)], Right, (9, 9));
        let state = engine.step(Some(Left));
        assert_eq!(state.direction, Right);
        assert_eq!(state.snake[0], (5, 6));
    }

    #[test]
    fn perpendicular_turn_is_accepted() {
        let mut engine = engine_with(20, vec![(5, 5)], Right, (9, 9));
        let state = engine.step(Some(Up));
        assert_eq!(state.direction, Up);
        assert_eq!(state.snake[0], (4, 5));
    }

    // Only one direction request is seen per tick, so a reversal is judged
    // against the heading at the start of that tick: after turning Up, a
    // Left request on the next tick is a normal perpendicular turn even
    // though it is the opposite of the heading two ticks ago.
    #[test]
    fn reversal_allowed_after_perpendicular_turn() {
        let mut engine = engine_with(20, vec![(5, 5)], Right, (9, 9));
        engine.step(Some(Up));
        let state = engine.step(Some(Left));
        assert_eq!(state.direction, Left);
    }

    #[test]
    fn eating_food_grows_and_scores() {
        // The end-to-end example: one snake cell at (5,5) heading Right
        // with food directly ahead
        let mut engine = engine_with(20, vec![(5, 5)], Right, (5, 6));
        let state = engine.step(None).clone();

        assert_eq!(state.score, 1);
        assert_eq!(state.snake, VecDeque::from(vec![(5, 6), (5, 5)]));
        assert_ne!(state.food, (5, 6));
        assert_ne!(state.food, (5, 5));
        assert!(in_bounds(state.food, 20));
    }

    #[test]
    fn moving_without_food_keeps_length_and_score() {
        let mut engine = engine_with(20, vec![(5, 6), (5, 5)], Right, (9, 9));
        let state = engine.step(None);
        assert_eq!(state.snake, VecDeque::from(vec![(5, 7), (5, 6)]));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn self_collision_freezes_state() {
        // The body closes a square; moving Right runs the head into the
        // tail cell at (5,6)
        let body = vec![(5, 5), (4, 5), (4, 6), (5, 6)];
        let mut engine = engine_with(20, body.clone(), Right, (9, 9));
        let state = engine.step(None);

        assert!(!state.alive);
        assert_eq!(state.snake, VecDeque::from(body));
        assert_eq!(state.score, 0);
        assert_eq!(state.food, (9, 9));
    }

    #[test]
    fn dead_engine_ignores_further_steps() {
        let mut engine = engine_with(20, vec![(5, 5), (4, 5), (4, 6), (5, 6)], Right, (9, 9));
        engine.step(None);
        let dead = engine.state().clone();

        for dir in [None, Some(Up), Some(Down), Some(Left), Some(Right)].iter() {
            assert_eq!(*engine.step(*dir), dead);
        }
    }

    #[test]
    fn reset_restores_a_fresh_game() {
        let mut engine = engine_with(20, vec![(5, 5), (4, 5), (4, 6), (5, 6)], Right, (9, 9));
        engine.step(None);
        assert!(!engine.state().alive);

        let state = engine.reset();
        assert!(state.alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake, VecDeque::from(vec![(5, 5)]));
        assert_eq!(state.direction, Right);
        assert_ne!(state.food, (5, 5));
        assert!(in_bounds(state.food, 20));
    }

    #[test]
    fn food_never_lands_on_the_snake() {
        let mut engine = GameEngine::with_seed(10, 42);
        let turns = [Some(Down), None, Some(Right), None, Some(Up), Some(Left)];

        for (i, dir) in turns.iter().cycle().take(300).enumerate() {
            let state = engine.step(*dir).clone();
            if !state.alive {
                engine.reset();
                continue;
            }

            assert!(!state.snake.contains(&state.food), "tick {}", i);
            assert!(in_bounds(state.food, 10));
            for cell in state.snake.iter() {
                assert!(in_bounds(*cell, 10));
            }
        }
    }

    #[test]
    fn food_spawn_falls_back_to_the_free_cell_set() {
        // One free cell on a 2x2 board; rejection sampling alone would
        // almost certainly exhaust its retry cap
        let snake: VecDeque<Cell> = vec![(0, 0), (0, 1), (1, 1)].into();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spawn_food(&mut rng, 2, &snake), Some((1, 0)));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut engine = engine_with(2, vec![(0, 1), (1, 1), (1, 0)], Left, (0, 0));
        let state = engine.step(None);

        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert!(!state.alive);
    }
}
