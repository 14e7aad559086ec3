//! Rescale a 1-sigma location ellipse to a 90% confidence region.
//!
//! The coefficients come from a projected 2×2 location covariance with
//! `c3 = 1` (Δχ² = 1 contour). For two degrees of freedom the 90% region is
//! `Δχ² = 4.605`, so the ellipse is rescaled with `κ² = 4.605` and the axes
//! grow by `sqrt(κ²)` without re-deriving the orientation.

use locellipse::prelude::*;

fn main() -> Result<(), EllipseError> {
    let center = Location::new(0.62, -1.98, 12.0, 0.0);
    let mut ellipse = Ellipse::new();
    ellipse.initialize(center, Some(&[0.04, 0.012, 0.09, 1.0][..]))?;
    if !ellipse.is_valid() {
        println!("not an ellipse");
        return Ok(());
    }

    let one_sigma = ellipse.to_record()?;
    ellipse.set_scale_factor(4.605);
    let ninety = ellipse.to_record()?;

    let mut text = KeyValueRecord::default();
    ninety.write_to(&mut text);
    println!(
        "1-sigma: major={:.3} minor={:.3} trend={:.1}°",
        one_sigma.major_axis_length, one_sigma.minor_axis_length, one_sigma.trend_degrees
    );
    print!("{text}");

    for p in ellipse.boundary_points(8)? {
        println!("north={:8.3} east={:8.3}", p.x, p.y);
    }
    Ok(())
}
