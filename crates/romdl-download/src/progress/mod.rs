//! Progress rate-limiting.

mod throttle;

pub use throttle::ProgressThrottle;
