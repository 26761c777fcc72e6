//! Minimal Hilbert curve example: map an index to a point and back, then
//! pack a small curve into bricks.

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // 3D Hilbert curve in an 8x8x8 cube (order 3)
    let curve = hilbrick::Hilbert::from_dimensions(3, 8)?;
    println!(
        "{}D Hilbert length: {} cells",
        curve.dimensions(),
        curve.length()
    );

    let index = 10;
    let point = curve.point(index);
    println!("Point at index {index}: {:?}", point);

    let round_trip = curve.index(&point)?;
    println!("Index for {:?}: {round_trip}", point);
    assert_eq!(round_trip, index);

    let volume = hilbrick::volume::build(4)?;
    let placements = hilbrick::bricks::pack(&volume, 0.5);
    println!("A 4x4x4 curve packs into {} bricks", placements.len());

    Ok(())
}
