//! End-to-end tests: sequence files through the Martingale runner and
//! back out to results.

mod replay;
mod scripted_wheel;
