use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use villa_agent::auth::{AuthClient, AuthGate};
use villa_agent::config::{Config, StoreBackend};
use villa_agent::dashboard::format::{
    availability_label, description_preview, format_rupiah, EMPTY_LIST_MESSAGE,
};
use villa_agent::dashboard::notify::{Notification, FETCH_FAILED};
use villa_agent::store::{MemoryStore, RecordStore, SupabaseStore};
use villa_agent::VillaRepository;

const LOAD_ATTEMPTS: u32 = 3;
const LOAD_HINT: &str =
    "Could not fetch villa data. Check the Row Level Security policies on the villas table";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏝️  Villa Agent Dashboard");
    info!("========================");

    let config = Config::from_env()?;

    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::Memory => {
            info!("Using the in-memory store; nothing will be persisted");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Supabase => {
            if !config.is_configured() {
                println!("{}", config.setup_instructions());
                return Ok(());
            }

            let (Some(email), Some(password)) = (&config.operator_email, &config.operator_password)
            else {
                bail!("Set VILLA_AGENT_EMAIL and VILLA_AGENT_PASSWORD to sign in");
            };

            let mut gate = AuthGate::new();
            let auth = AuthClient::new(&config)?;
            let outcome = auth.sign_in_with_password(email, password).await;
            let session = gate.resolve(outcome)?;
            Arc::new(SupabaseStore::new(&config)?.with_session(session))
        }
    };

    let repo = VillaRepository::new(store);
    load_with_retry(&repo).await?;
    print_dashboard(&repo);

    Ok(())
}

async fn load_with_retry(repo: &VillaRepository) -> anyhow::Result<()> {
    let mut attempt = 1;
    loop {
        match repo.load().await {
            Ok(_) => return Ok(()),
            Err(err) if attempt < LOAD_ATTEMPTS => {
                let notification = Notification::error(FETCH_FAILED);
                warn!("{} {} (attempt {}/{})", notification.message, err, attempt, LOAD_ATTEMPTS);
                tokio::time::sleep(Duration::from_secs(2)).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(anyhow!(err).context(LOAD_HINT));
            }
        }
    }
}

fn print_dashboard(repo: &VillaRepository) {
    let stats = repo.aggregates();
    println!();
    println!("Total Villas:     {}", stats.total);
    println!("Available:        {}", stats.available);
    println!("Rented Out:       {}", stats.unavailable);
    println!("Total Commission: {}", format_rupiah(stats.commission_sum));
    println!();

    let villas = repo.villas();
    if villas.is_empty() {
        println!("{}", EMPTY_LIST_MESSAGE);
        return;
    }

    for (i, villa) in villas.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, villa.name, availability_label(villa.is_available));
        println!("   {}", description_preview(&villa.description));
        println!(
            "   Price/Night: {}   Commission: {}",
            format_rupiah(villa.price),
            format_rupiah(villa.commission)
        );
        if !villa.facilities.is_empty() {
            println!("   Facilities: {}", villa.facilities.join(", "));
        }
        println!("   ID: {}", villa.id);
        println!();
    }
}
