//! Submit one trade through the form and print the service's answer.
//!
//! ```bash
//! CLEARING_FUNCTION_KEY=... cargo run --example submit_trade --features native -- A B XYZ 100 50.25
//! ```
//!
//! Configuration comes from the environment (or a `.env` file):
//! `CLEARING_API_URL`, `CLEARING_FUNCTION_KEY`, `CLEARING_TIMEOUT_SECS`.
//! Set `RUST_LOG=clearing_sdk=debug` to see the request and response bodies.

use clearing_sdk::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,clearing_sdk=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = ClearingClientBuilder::from_env()?.build()?;
    let controller = client.controller().with_observer(|snap| {
        if snap.is_loading {
            println!("Submitting trade...");
        }
    });

    controller
        .edit_form(|form| {
            for (field, value) in FormField::ALL.iter().zip(args.iter()) {
                form.set(*field, value.as_str());
            }
        })
        .await;

    match controller.submit().await {
        Ok(response) => print_response(&response),
        Err(SubmitError::Validation(messages)) => {
            eprintln!("{}", controller.status().await);
            for message in messages {
                eprintln!("  - {}", message);
            }
        }
        Err(_) => eprintln!("{}", controller.status().await),
    }

    println!();
    println!("Submitted trades:");
    for trade in &controller.history().await {
        println!("  {}", trade);
    }

    Ok(())
}

fn print_response(response: &TradeResponse) {
    println!("Trade Submitted!");
    println!("Trade ID: {}", response.trade.id);

    match &response.matched_trade {
        Some(MatchedTradeOrMessage::Trade(matched)) => {
            println!("Matched Trade ID: {}", matched.id);
            println!("Buyer: {}", matched.buyer);
            println!("Seller: {}", matched.seller);
        }
        Some(MatchedTradeOrMessage::Message(message)) => println!("{}", message),
        None => println!("No matching trade found."),
    }

    match &response.netting_result {
        Some(netting) => {
            println!("Netting Result:");
            println!("Trade ID: {}", netting.trade_id);
            println!("Counterparty: {}", netting.counterparty);
            println!("Net Position: {}", netting.net_position);
        }
        None => println!("No netting performed."),
    }

    let lines = response.settlement_lines();
    if lines.is_empty() {
        println!("No settlement instruction generated.");
    } else {
        println!("Settlement Instruction:");
        for line in lines {
            println!("{}", line);
        }
    }
}
