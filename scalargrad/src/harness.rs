//! Timing loop over a reference workload.
//!
//! [`run`] builds the configured expression `iterations` times (rebuild mode)
//! or once with in-place refreshes (reuse mode), sweeps it, optionally dumps
//! the seven-node state tuple each round and renders the final graph.

use std::fs;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::autograd::{backward, dot, topological_order, ScalarNode, Tape};
use crate::config::{BenchConfig, Mode, Precision};
use crate::error::Result;
use crate::scalar::Scalar;
use crate::state::{save_nodes, FileStore, StateSchema, StateStore};
use crate::workload::Expression;

/// Number of named nodes persisted per dump.
pub const STATE_ARITY: usize = 7;

/// Half-width of the uniform jitter applied to reused leaves.
const REUSE_JITTER: f64 = 1.0;

/// Outcome of a run; values widened to `f64` for reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Element type the graph ran with ("f64" / "f32").
    pub precision: &'static str,
    pub iterations: usize,
    pub elapsed: Duration,
    /// Datum of the terminal `g` after the last iteration.
    pub terminal: f64,
    pub grad_a: f64,
    pub grad_b: f64,
    /// Nodes in the last graph.
    pub graph_len: usize,
    /// Bytes written per dump, 0 when state saving is off.
    pub state_bytes: usize,
}

impl RunReport {
    /// Mean wall time per iteration in microseconds.
    #[must_use]
    pub fn micros_per_iteration(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e6 / self.iterations.max(1) as f64
    }
}

/// Runs the configured workload at the configured precision.
///
/// # Errors
///
/// - [`Error::Config`](crate::Error::Config) when the configuration does not validate.
/// - [`Error::State`](crate::Error::State) when a dump cannot be written.
/// - [`Error::Io`](crate::Error::Io) when the DOT file cannot be written.
pub fn run(cfg: &BenchConfig) -> Result<RunReport> {
    cfg.validate()?;
    match cfg.precision {
        Precision::F64 => run_with::<f64>(cfg),
        Precision::F32 => run_with::<f32>(cfg),
    }
}

fn run_with<T: Scalar>(cfg: &BenchConfig) -> Result<RunReport> {
    let (a0, b0) = cfg.workload.default_inputs();
    let (a0, b0) = (T::from_f64(a0), T::from_f64(b0));
    let schema = StateSchema::<T>::new(STATE_ARITY, cfg.state_layout());
    let store = cfg.save_state.then(|| FileStore::new(&cfg.state_path));
    let dump = |x: &Expression<T>| -> Result<()> {
        if let Some(store) = &store {
            store.save(&save_nodes(&x.nodes(), &schema)?)?;
        }
        Ok(())
    };

    let start = Instant::now();
    let (last, graph_len) = match cfg.mode {
        Mode::Rebuild => {
            let mut last = cfg.workload.build(a0, b0);
            backward(&last.g);
            dump(&last)?;
            for _ in 1..cfg.iterations {
                last = cfg.workload.build(a0, b0);
                backward(&last.g);
                dump(&last)?;
            }
            let len = topological_order(&last.g).len();
            (last, len)
        }
        Mode::Reuse => {
            let x = cfg.workload.build(a0, b0);
            let mut tape = Tape::new();
            tape.record(&x.g);
            let mut rng = StdRng::seed_from_u64(cfg.seed);
            for i in 0..cfg.iterations {
                // Last round runs on the reference inputs so reports compare across modes.
                let (a, b) = if i + 1 == cfg.iterations {
                    (a0, b0)
                } else {
                    (
                        a0 + T::from_f64(rng.random_range(-REUSE_JITTER..REUSE_JITTER)),
                        b0 + T::from_f64(rng.random_range(-REUSE_JITTER..REUSE_JITTER)),
                    )
                };
                x.a.set_data(a);
                x.b.set_data(b);
                tape.forward();
                tape.zero_grads();
                tape.backward();
                dump(&x)?;
            }
            let len = tape.len();
            (x, len)
        }
    };
    let elapsed = start.elapsed();

    if let Some(path) = &cfg.dot_path {
        last.label_nodes();
        fs::write(path, dot::render(&last.g, &cfg.workload.to_string()))?;
    }

    Ok(RunReport {
        precision: T::NAME,
        iterations: cfg.iterations,
        elapsed,
        terminal: last.g.data().to_f64(),
        grad_a: last.a.grad().to_f64(),
        grad_b: last.b.grad().to_f64(),
        graph_len,
        state_bytes: if cfg.save_state { schema.byte_len() } else { 0 },
    })
}
