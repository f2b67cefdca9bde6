use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Randomness is injected: the engine only ever asks for uniform floats in
// [0,1). Closures, any `rand::Rng`, or a scripted sequence can stand behind it.

pub trait UniformSource {
    /// Next value, expected in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<F> UniformSource for F
where
    F: FnMut() -> f64,
{
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Adapter over any `rand` generator.
pub struct RandSource<R> {
    rng: R,
}

impl<R: Rng> RandSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandSource<StdRng> {
    /// Reproducible source: the same seed always yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSource for RandSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Cycles through a fixed list of values.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values, pos: 0 }
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl UniformSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

/// Fresh random seed for a logged spin.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen()
}
