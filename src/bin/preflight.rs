use memo_api::infra::{config, logging};
use memo_api::{ConnectionManager, MemoStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads:\n\
           DATABASE_URL (required unless MEMO_STORE_BACKEND=memory)\n\
           MEMO_STORE_BACKEND=pooled|http|memory (default pooled)\n\
           DATABASE_MAX_CONNECTIONS, DATABASE_HTTP_ENDPOINT (optional)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let backend = config::store_backend()?;
    println!("> Preflight:");
    println!("  MEMO_STORE_BACKEND={}", backend);

    if backend != config::StoreBackend::Memory {
        let url = config::database_url()?;
        let parsed = config::parse_database_url(&url)?;
        println!(
            "  DATABASE_URL host={} database={}",
            parsed.host_str().unwrap_or_default(),
            parsed.path().trim_start_matches('/')
        );
    }
    if backend == config::StoreBackend::Pooled {
        println!("  DATABASE_MAX_CONNECTIONS={}", config::database_max_connections());
    }
    if let Some(endpoint) = config::database_http_endpoint() {
        println!("  DATABASE_HTTP_ENDPOINT={}", endpoint);
    }

    // Connects (and ensures the memos table) exactly like the server's first request would.
    let manager = ConnectionManager::from_env()?;
    manager
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Store check failed ({}): {}", e.kind(), e))?;
    println!("  Store reachable, memos table present.");

    println!("> Preflight OK.");
    Ok(())
}
