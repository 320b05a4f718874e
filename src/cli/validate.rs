//! Layout validation command implementation.

use std::path::Path;

use ctf_reflex::game::{Distancer, MIN_FOOD, UNREACHABLE};
use ctf_reflex::{Coord, Team};

use super::{CliError, read_layout};

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the layout cannot be read or fails a check.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    println!("Validating: {}", path.display());
    println!();

    let layout = match read_layout(path) {
        Ok(layout) => {
            print_check("Layout parses", true);
            layout
        }
        Err(e) => {
            print_check("Layout parses", false);
            return Err(e);
        }
    };

    let agents_ok = layout.num_agents() == 4;
    print_check("Four agents placed", agents_ok);

    let maze = &layout.maze;
    let width = maze.width();
    let sides_ok = layout
        .agent_starts
        .iter()
        .enumerate()
        .all(|(index, start)| Team::of_index(index).is_home(start.x, width));
    print_check("Agents start on their home half", sides_ok);

    let distancer = Distancer::new(maze);
    let origin = layout.agent_starts.first().copied().unwrap_or(Coord::new(0, 0));
    let connected = maze
        .open_cells()
        .all(|cell| distancer.distance(origin, cell) < UNREACHABLE);
    print_check("Every open cell is reachable", connected);

    let red_food = layout.food.iter().filter(|f| Team::Red.is_home(f.x, width)).count();
    let blue_food = layout.food.len() - red_food;
    let food_ok = red_food > MIN_FOOD && blue_food > MIN_FOOD;
    print_check("Each half holds more food than the win margin", food_ok);

    println!();
    println!("Summary:");
    println!("  Size:         {}x{}", width, maze.height());
    println!("  Open cells:   {}", distancer.open_cells());
    println!("  Food:         {red_food} red half, {blue_food} blue half");
    println!("  Capsules:     {}", layout.capsules.len());
    println!("  Agents:       {}", layout.num_agents());
    println!();

    if agents_ok && sides_ok && connected && food_ok {
        println!("Validation successful!");
        Ok(())
    } else {
        Err(CliError::new("Layout failed validation"))
    }
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
