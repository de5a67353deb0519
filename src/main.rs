mod engine;
mod game;
mod term;

/// Grid coordinates are row-major: `.0` is the row, `.1` is the column.
pub type GridInt = u16;
pub type Cell = (GridInt, GridInt);

fn main() {
    // The shell exits cleanly on CTRL+C and restores the terminal itself
    game::GameShell::new(engine::GRID_SIZE).run();
}
