//! Round-trip accuracy and timing demo
//!
//! Seeds random coefficients, synthesizes the Euler-angle sample, transforms
//! back and reports the residual plus wall-clock timings per stage.
//!
//! Run with: cargo run --release -p sofft-core --example round_trip

use sofft_core::prelude::*;
use sofft_core::Stopwatch;

fn main() {
    tracing_subscriber::fmt::init();

    let threads = max_threads();
    println!("SO(3) round trip, {threads} worker threads\n");
    println!("{:>5}  {:>12}  {:>12}  {:>12}", "B", "idsoft [ms]", "dsoft [ms]", "max residual");

    for bandwidth in [2usize, 4, 8, 16, 32, 64] {
        let mut fc = SoftCoefficients::new(bandwidth);
        fill_coefficients(&mut fc, -1.0, 1.0, Engine::Default).unwrap();

        let mut grid = Grid3::cube(2 * bandwidth);
        let sw = Stopwatch::tic();
        idsoft(&fc, &mut grid, threads).unwrap();
        let inverse_ms = sw.toc_millis();

        let mut recovered = SoftCoefficients::new(bandwidth);
        let sw = Stopwatch::tic();
        dsoft(grid, &mut recovered, threads).unwrap();
        let forward_ms = sw.toc_millis();

        let residual = fc.max_abs_diff(&recovered);
        println!("{bandwidth:>5}  {inverse_ms:>12.3}  {forward_ms:>12.3}  {residual:>12.3e}");
    }
}
