//! Push listener example
//!
//! Connects to a backend, logs in, then prints every push message until
//! Ctrl+C.
//!
//! Run: cargo run --example push_listener

use saffron_client::{ClientConfig, PushListener};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let base_url = std::env::var("SAFFRON_API").unwrap_or_else(|_| "http://localhost:8080".into());
    let push_url = std::env::var("SAFFRON_PUSH").unwrap_or_else(|_| "ws://localhost:8080/ws".into());
    let username = std::env::var("SAFFRON_USER").unwrap_or_else(|_| "demo".into());
    let password = std::env::var("SAFFRON_PASS").unwrap_or_else(|_| "demo".into());

    let config = ClientConfig::new(base_url, push_url);
    let http = config.build_http_client();

    let login = http.login(&username, &password).await?;
    println!("Logged in as {} ({})", login.user.username, login.user.role);

    let handle = PushListener::spawn(&config, login.user.id);
    let mut rx = handle.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            msg = rx.recv() => match msg {
                Ok(msg) => println!("[{}] {} {}", msg.timestamp, msg.event_type, msg.payload),
                Err(e) => {
                    eprintln!("subscription lagged: {e}");
                }
            }
        }
    }

    handle.shutdown();
    Ok(())
}
