//! # Driwich Register Entry Point
//!
//! The actual setup is in lib.rs so it can be tested.

#[tokio::main]
async fn main() {
    if let Err(e) = driwich_register::run().await {
        eprintln!("driwich-register: {}", e);
        std::process::exit(1);
    }
}
