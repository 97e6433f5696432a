use std::io::Write;

use barbella_core::render::Rendered;
use barbella_core::view::{ChatTransport, ConversationView, SendOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{Error, Result};

const QUIT: &str = "/quit";

/// Text shown for one rendered turn.
pub fn format_rendered(rendered: &Rendered) -> String {
    match rendered {
        Rendered::Plain(text) | Rendered::Markdown(text) => text.clone(),
        Rendered::Table(table) => table.to_string().trim_end().to_string(),
    }
}

fn print_latest(view: &ConversationView) {
    if let Some(rendered) = view.rendered().last() {
        println!("barbella> {}\n", format_rendered(rendered));
    }
}

/// Interactive session on stdin/stdout.
pub async fn run_chat<T: ChatTransport>(transport: &T) -> Result<()> {
    let mut view = ConversationView::new();
    print_latest(&view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line.trim() == QUIT {
            break;
        }

        view.set_input(line);
        match view.send(transport).await {
            SendOutcome::Ignored => continue,
            SendOutcome::Replied => print_latest(&view),
            SendOutcome::Failed => {
                log::warn!("chat request failed");
                print_latest(&view);
            }
        }
    }
    Ok(())
}

/// Sends one message; a failed request is an error.
pub async fn run_ask<T: ChatTransport>(transport: &T, message: &str) -> Result<()> {
    let mut view = ConversationView::new();
    view.set_input(message);

    match view.send(transport).await {
        SendOutcome::Ignored => Err(Error::Custom("message is empty".into())),
        SendOutcome::Replied => {
            if let Some(rendered) = view.rendered().last() {
                println!("{}", format_rendered(rendered));
            }
            Ok(())
        }
        SendOutcome::Failed => {
            let content = view
                .turns()
                .last()
                .map(|t| t.content.clone())
                .unwrap_or_default();
            Err(Error::Custom(content))
        }
    }
}
