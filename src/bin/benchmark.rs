//! Performance benchmark for the wave simulation.
//!
//! Run with: cargo run --bin benchmark --release

use std::time::Instant;

use wavefield::{KernelKind, SimConfig, Simulation};

const WARMUP_STEPS: usize = 5;
const TIMED_STEPS: usize = 50;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wavefield=info".parse().unwrap()),
        )
        .init();

    println!("Wavefield step benchmark");
    println!();

    let sizes = [64u32, 128, 256, 512, 1024];
    let kernels = kernel_list();

    println!(
        "{:<12} {:>10} {:>10} {:>12} {:>16}",
        "Grid", "Cells", "Kernel", "Init (ms)", "Step avg (ms)"
    );
    println!("{}", "-".repeat(64));

    for &size in &sizes {
        for &kernel in &kernels {
            run_case(size, kernel);
        }
    }
}

fn kernel_list() -> Vec<KernelKind> {
    let mut kernels = vec![KernelKind::Scalar];
    #[cfg(feature = "simd")]
    kernels.push(KernelKind::Packed);
    kernels
}

fn run_case(size: u32, kernel: KernelKind) {
    let init_start = Instant::now();
    let mut sim = match Simulation::new(SimConfig::new(size).with_kernel(kernel)) {
        Ok(sim) => sim,
        Err(e) => {
            println!("{size}x{size}: failed to initialize: {e}");
            return;
        }
    };
    let init_ms = init_start.elapsed().as_secs_f64() * 1000.0;

    // Give the wave field something to chew on.
    sim.inject(size / 2, size / 2, 1.0).expect("fresh simulation");
    for _ in 0..WARMUP_STEPS {
        sim.tick().expect("warmup step");
    }

    let step_start = Instant::now();
    for _ in 0..TIMED_STEPS {
        sim.tick().expect("timed step");
    }
    let step_ms = step_start.elapsed().as_secs_f64() * 1000.0 / TIMED_STEPS as f64;

    println!(
        "{:<12} {:>10} {:>10} {:>12.2} {:>16.3}",
        format!("{size}x{size}"),
        size * size,
        kernel.to_string(),
        init_ms,
        step_ms
    );

    sim.destroy().expect("destroy");
}
