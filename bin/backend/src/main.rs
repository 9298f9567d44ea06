//! Paceline Backend Binary
//!
//! Group, member, and event management plus the public join flow, served
//! as a single server on BIND_ADDR (e.g. 0.0.0.0:8888).

#[tokio::main]
async fn main() {
    paceline_core::log();
    paceline_server::run().await.unwrap();
}
