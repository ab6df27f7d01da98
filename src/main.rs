use clap::Parser;

use on_air::cli::Flags;
use on_air::config::Config;
use on_air::runtime;

#[tokio::main]
async fn main() {
    let flags = Flags::parse();
    let mut config = match Config::from_file(&flags.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config: {}", err);
            std::process::exit(1);
        }
    };
    flags.apply_to(&mut config);

    runtime::run(config).await;
}
