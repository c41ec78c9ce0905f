//! Tower-defence field demo: random towers, creeps walking to the exit.
//!
//! Run: cargo run --bin field [config.json]
//! Set `RUST_LOG=debug` to watch cache misses and refused placements.

use tdpath_demos::{Field, FieldConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::default(),
    };
    let attempts = config.initial_towers;
    let mut field = Field::new(config)?;

    let placed = field.place_random_towers(attempts)?;
    println!("placed {placed} of {attempts} towers");
    println!("route length: {}", field.route().len());
    print!("{}", field.render());

    let summary = field.run()?;
    println!();
    print!("{}", field.render());
    println!(
        "{} ticks, {} towers, {} creeps arrived, {} still on the field",
        summary.ticks, summary.towers, summary.arrived, summary.remaining
    );
    Ok(())
}
