//! Compare sorting a small and a large slice, and print both reports.
//!
//! Run with `cargo run --release --example sorting`.

use std::time::Duration;

use microbench::output::format_result;
use microbench::{do_not_optimize, Bencher, TimeUnit};

fn shuffled(len: usize) -> Vec<u32> {
    (0..len).map(|_| rand::random()).collect()
}

fn main() {
    let bencher = Bencher::new()
        .max_time(Duration::from_millis(500))
        .unit(TimeUnit::Microseconds);

    for len in [16, 4096] {
        let input = shuffled(len);
        let mut scratch = input.clone();

        let report = bencher.run(|| {
            scratch.copy_from_slice(&input);
            scratch.sort_unstable();
            do_not_optimize(&scratch);
        });

        match report {
            Ok(report) => {
                println!("sort_unstable, {} elements", len);
                println!("{}", format_result(&report));
            }
            Err(e) => eprintln!("benchmark failed: {}", e),
        }
    }
}
