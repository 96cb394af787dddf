#[tokio::main]
async fn main() {
    if let Err(e) = yolohome::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
