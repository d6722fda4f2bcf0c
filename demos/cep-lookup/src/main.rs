//! CEP lookup demo
//!
//! Walks the header widget through a hover, a few lookups and the delayed
//! close, against the real provider or (with `--offline`) canned responses.
//!
//! ```text
//! cep-lookup [--offline] [CEP...]
//! ```
//!
//! Lookups persist under `$TMPDIR/vitrine-sessions/$VITRINE_SESSION_ID`, so a
//! second run in the same session starts from the last resolved address.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_address::mocks::{MockTransport, fixtures};
use vitrine_address::{
    AddressEnvironment, AddressStore, AddressWidget, FileSessionStorage, HttpTransport,
    LookupClient, LookupConfig, ReqwestTransport, WidgetConfig,
};
use vitrine_core::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cep_lookup=info,vitrine_address=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut offline = false;
    let mut codes = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--offline" {
            offline = true;
        } else {
            codes.push(arg);
        }
    }
    if codes.is_empty() {
        codes = vec!["01310100".to_string(), "123".to_string(), "99999999".to_string()];
    }

    let session_id = std::env::var("VITRINE_SESSION_ID").unwrap_or_else(|_| "demo".to_string());
    let storage = FileSessionStorage::for_session(&session_id)
        .with_context(|| format!("opening session storage for {session_id}"))?;
    tracing::info!(dir = %storage.dir().display(), "Using session storage");

    let config = LookupConfig::from_env().context("reading lookup configuration")?;

    if offline {
        let transport = MockTransport::new().with_address("01310100", fixtures::paulista_payload());
        run(LookupClient::new(transport, config), storage, &codes).await
    } else {
        run(LookupClient::new(ReqwestTransport::new(), config), storage, &codes).await
    }
}

async fn run<T>(
    client: LookupClient<T>,
    storage: FileSessionStorage,
    codes: &[String],
) -> anyhow::Result<()>
where
    T: HttpTransport + Clone + 'static,
{
    let env = AddressEnvironment::new(client, Arc::new(storage), Arc::new(SystemClock));
    let store = AddressStore::open(env);
    let widget = AddressWidget::open(store.clone(), WidgetConfig::default());
    let close_delay = widget.config().close_delay;

    println!("=== CEP widget ===\n");
    println!("Trigger: {}", widget.trigger_label().await);

    widget.pointer_enter().await?;
    println!("\n>>> Pointer entered, popup {:?}", widget.state().await.widget.popup);

    for code in codes {
        let shown = widget.type_input(code).await?;
        println!("\n>>> Typed {code:?}, input shows {shown:?}");

        let view = widget.submit().await?;
        match (&view.lookup.record, view.message()) {
            (_, Some(message)) => println!("Error: {message}"),
            (Some(record), None) => println!(
                "Resolved: {}, {} - {}/{}",
                record.street, record.neighborhood, record.city, record.state_code
            ),
            (None, None) => println!("No address"),
        }
        println!("Popup {:?}, trigger: {}", view.widget.popup, widget.trigger_label().await);

        if !view.is_open() {
            widget.pointer_enter().await?;
        }
    }

    widget.pointer_leave().await?;
    println!("\n>>> Pointer left, waiting {}ms", close_delay.as_millis());
    tokio::time::sleep(close_delay + Duration::from_millis(100)).await;
    println!("Popup {:?}", widget.state().await.widget.popup);

    widget.dispose().await?;
    store.shutdown().await?;
    println!("\n=== Done ===");
    Ok(())
}
