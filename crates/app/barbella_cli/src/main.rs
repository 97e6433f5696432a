// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use barbella_core::render::render;
use clap::Parser;
use cli::{Cli, Commands};
use transport::HttpChatTransport;

mod cli;
mod logging;
mod session;
mod transport;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Chat => {
            let transport = HttpChatTransport::new(&args.url)?;
            log::info!("chatting with {}", transport.endpoint());
            session::run_chat(&transport).await?;
        }
        Commands::Ask { message } => {
            let transport = HttpChatTransport::new(&args.url)?;
            session::run_ask(&transport, &message.join(" ")).await?;
        }
        Commands::Render { path } => {
            let content = std::fs::read_to_string(path)?;
            println!("{}", session::format_rendered(&render(&content)));
        }
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
