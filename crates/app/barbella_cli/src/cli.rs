use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "barbella", about = "Barbella support chat in the terminal")]
pub struct Cli {
    /// Base URL of the Barbella chat API.
    #[arg(
        long,
        global = true,
        env = "BARBELLA_API_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    pub url: Url,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat session. Type `/quit` or send EOF to leave.
    Chat,
    /// Send one message and print the reply.
    Ask {
        /// Message text; multiple words are joined with spaces.
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Show how an assistant reply stored in a file would be rendered.
    Render {
        /// File holding the reply text.
        path: PathBuf,
    },
    /// Print the version.
    Version,
}
