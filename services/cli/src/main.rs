use scholar_portal_cli::{already_reported, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        if !already_reported(&err) {
            eprintln!("scholar-portal: {err}");
        }
        std::process::exit(1);
    }
}
