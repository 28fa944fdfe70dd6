//! Pool worker - joins a coordinator and serves claims.
//!
//! This example demonstrates:
//! - Joining a pool with the builder pattern
//! - Producing objects from the loader callback
//! - Processing claims and choosing which objects to release
//!
//! # Running against a coordinator
//!
//! ```sh
//! RUST_LOG=debug cargo run --example worker -- ws://localhost:9000/session
//! ```
//!
//! The worker joins the `renders` pool, announces capacity for 4
//! concurrent claims, and serves until the coordinator closes the
//! connection.

use objectpool_client::{ClaimResult, Claimed, LoadRequest, Mark, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://localhost:9000/session".to_string());

    let session = Session::builder(endpoint)
        .pool("renders")
        .limit(4)
        // Produce a fresh batch of frames when the pool runs low
        .loader(|request: LoadRequest| async move {
            let objects: Vec<String> = (0..request.size)
                .map(|i| format!("frame-{}", i))
                .collect();

            // One group for the whole batch, watermark at the batch size
            Ok(Mark::new(request.size).group("frames", objects))
        })
        // Render each claimed frame, then hand every one back
        .processor(|claim: Claimed| async move {
            for object in &claim.objects {
                println!("rendering {}", object);
            }

            Ok(Some(ClaimResult::release(claim.objects)))
        })
        .join()
        .await?;

    // Serve until the coordinator ends the session
    session.completed().await;

    Ok(())
}
