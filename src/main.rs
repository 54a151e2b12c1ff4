use clap::Parser;
use miette::{IntoDiagnostic, Result};
use mortgage_register::application::dispatch::Dispatcher;
use mortgage_register::application::registry::LoanRegistry;
use mortgage_register::domain::collection::CollectionPolicy;
use mortgage_register::domain::ports::RecordStoreBox;
use mortgage_register::infrastructure::in_memory::InMemoryRecordStore;
use mortgage_register::interfaces::csv::response_writer::ResponseWriter;
use mortgage_register::interfaces::json::invocation_reader::InvocationReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Invocations file, one JSON invocation per line
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "MORTGAGE_REGISTER_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Collection membership policy (JSON). Without it every collection is open.
    #[arg(long, env = "MORTGAGE_REGISTER_COLLECTIONS")]
    collections: Option<PathBuf>,
}

fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            use mortgage_register::infrastructure::rocksdb::RocksDBStore;
            tracing::info!(path = %path.display(), "opening RocksDB store");
            Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
            Ok(Box::new(InMemoryRecordStore::new()))
        }
        None => Ok(Box::new(InMemoryRecordStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let policy = match &cli.collections {
        Some(path) => {
            let bytes = std::fs::read(path).into_diagnostic()?;
            CollectionPolicy::from_json(&bytes).into_diagnostic()?
        }
        None => CollectionPolicy::open(),
    };

    let store = open_store(cli.db_path)?;
    let dispatcher = Dispatcher::new(LoanRegistry::new(store).with_policy(policy));
    let init = dispatcher.init();
    if !init.is_success() {
        miette::bail!("Contract initialisation failed: {}", init.message());
    }

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = InvocationReader::new(file);
    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    for (index, invocation) in reader.invocations().enumerate() {
        let seq = index + 1;
        match invocation {
            Ok(invocation) => {
                let response = dispatcher.invoke(&invocation).await;
                writer
                    .write_response(seq, &invocation.function, &response)
                    .into_diagnostic()?;
            }
            Err(e) => {
                error!(seq, "Error reading invocation: {}", e);
            }
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
