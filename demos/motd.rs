//! Connects to a server, prints the MOTD as it arrives, and quits once the
//! MOTD ends.
//!
//! ```sh
//! cargo run --example motd -- irc.libera.chat 6667 mynick
//! ```

use ircore::{Client, ClientConfig, ClientEvent, EventKey, ReplyCode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "irc.libera.chat".into());
    let port: u16 = args.next().and_then(|p| p.parse().ok()).unwrap_or(6667);
    let nick = args.next().unwrap_or_else(|| "ircore-demo".into());

    let mut client = Client::new(ClientConfig::new(server, port, nick));

    let motd_line = |event: &ClientEvent| -> anyhow::Result<()> {
        if let ClientEvent::Message { message, .. } = event {
            if let Some(text) = message.params.last() {
                println!("{text}");
            }
        }
        Ok(())
    };
    client.on(EventKey::Reply(ReplyCode::MotdStart), motd_line);
    client.on(EventKey::Reply(ReplyCode::Motd), motd_line);

    client.connect().await?;
    let sender = client.sender()?;
    let shutdown = client.shutdown_handle()?;

    client.on(EventKey::Reply(ReplyCode::EndOfMotd), move |_| {
        let sender = sender.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = sender.send_quit("MOTD received, bye").await;
            shutdown.signal();
        });
        Ok(())
    });

    client.on(EventKey::Disconnected, |event| {
        if let ClientEvent::Disconnected { reason } = event {
            tracing::info!(%reason, "connection ended");
        }
        Ok(())
    });

    client.handshake().await?;
    Ok(())
}
