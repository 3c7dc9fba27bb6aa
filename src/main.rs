//! # Voxel Stream Demo Entry Point
//!
//! This is the entry point for the headless streaming demo. It calls into the
//! library's `run()` function, which walks a scripted viewer through a
//! procedurally generated world and logs chunk lifecycle events.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release [config.json]
//! ```

fn main() {
    if let Err(error) = voxel_stream::run() {
        eprintln!("fatal: {error}");
        std::process::exit(1);
    }
}
