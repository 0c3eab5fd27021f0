use std::env;
use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::EnvFilter;

use streamsearch_core::config::{resolve_with_base, Config};
use streamsearch_core::query::Query;
use streamsearch_visitor::{ReplayVisitorFactory, StreamingSearcher};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.len() < 2 {
        eprintln!("Usage: {} <recordings> <request>...", prog);
        eprintln!("Example: {} recordings/ '/?streaming.userid=1&query=oneuserhit'", prog);
        std::process::exit(1);
    }
    let recordings = args.remove(0);
    (recordings, args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let searcher_config = config.searcher()?;
    let (recordings, requests) = parse_args();

    let recordings = resolve_with_base(&env::current_dir()?, &recordings);
    let factory = ReplayVisitorFactory::load(&recordings)?;
    let default_timeout = searcher_config.default_timeout();
    let searcher = Arc::new(StreamingSearcher::new(Arc::new(factory), searcher_config));

    let mut queries = Vec::with_capacity(requests.len());
    for request in &requests {
        queries.push(Query::from_request_with_timeout(request, default_timeout)?);
    }

    let searches = queries.iter().map(|query| {
        let searcher = Arc::clone(&searcher);
        async move { searcher.search(query).await }
    });
    let results = futures::future::join_all(searches).await;

    for (request, result) in requests.iter().zip(results) {
        let report = match result {
            Ok(result) => json!({ "request": request, "result": result }),
            Err(err) => json!({ "request": request, "error": err.to_error_message() }),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
