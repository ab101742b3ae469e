use std::time::Instant;
use tracing::trace;

/// Measures how long an operation takes.
#[derive(Debug, Clone)]
pub struct SpanTimer {
    start: Instant,
    name: &'static str,
}

impl SpanTimer {
    /// Starts timing `name`.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        trace!(span = name, "Span started");
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Milliseconds since the timer started.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Stops the timer and returns the duration in milliseconds.
    #[must_use]
    pub fn finish(self) -> f64 {
        let elapsed = self.elapsed_ms();
        trace!(span = self.name, duration_ms = elapsed, "Span finished");
        elapsed
    }
}
