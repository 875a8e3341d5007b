//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `trackday_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("trackday_core ping={}", trackday_core::ping());
    println!("trackday_core version={}", trackday_core::core_version());
}
