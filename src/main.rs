//! # scalargrad-bench
//!
//! Builds a reference expression, runs the reverse-mode sweep in a loop and
//! reports the timing together with the terminal value and leaf gradients.
//!
//! All settings come from `SCALARGRAD_*` environment variables; see
//! [`scalargrad::config`] for keys and defaults.

use scalargrad::config::from_env;
use scalargrad::harness::{run, STATE_ARITY};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = from_env()?;
    cfg.validate()?;

    let report = run(&cfg)?;

    println!(
        "workload: {}  mode: {}  precision: {}  iterations: {}",
        cfg.workload, cfg.mode, report.precision, report.iterations
    );
    println!("graph nodes: {}", report.graph_len);
    println!(
        "elapsed: {:.4} s ({:.3} us/iter)",
        report.elapsed.as_secs_f64(),
        report.micros_per_iteration()
    );
    println!("g = {:.4}", report.terminal);
    println!("dg/da = {:.4}", report.grad_a);
    println!("dg/db = {:.4}", report.grad_b);
    if cfg.save_state {
        println!(
            "state: {} nodes, {} bytes per dump -> {}",
            STATE_ARITY,
            report.state_bytes,
            cfg.state_path.display()
        );
    }
    if let Some(path) = &cfg.dot_path {
        println!("graph written to {}", path.display());
    }
    Ok(())
}
