// SPDX-License-Identifier: MIT

use careflow::flow::state::SupportState;
use careflow::oracle::{OpenAiChat, OpenAiVision};
use careflow::support;
use careflow::support::config::Config;
use careflow::support::console::{Console, StdConsole};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the support workflow
    Run {
        /// The opening complaint; prompted for interactively when omitted
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Run { message } => {
            let config = Config::from_env();
            log::info!(
                "models: classifier='{}' agent='{}' vision='{}'",
                config.classifier_model,
                config.agent_model,
                config.vision_model
            );

            let console: Arc<dyn Console> = Arc::new(StdConsole);

            println!("\nWelcome to the Food Delivery Support Agent!");
            println!("-------------------------------------------");

            let first_message = match message {
                Some(m) => m,
                None => console.prompt("\nPlease describe your issue or complaint:")?,
            };

            let chat = Arc::new(OpenAiChat::new(config.agent_model)?);
            let classifier = Arc::new(OpenAiChat::new(config.classifier_model)?);
            let vision = Arc::new(OpenAiVision::new(config.vision_model)?);

            let executor = support::build(chat, classifier, vision, console)?;

            log::info!("invoking support workflow");
            let final_state = executor.run(SupportState::new(&first_message)).await?;

            println!("\n---- Conversation/Notes ----");
            println!("{}", final_state.notes.trim_start());
            println!("----------------------------");

            println!("Workflow completed. Final state summary:");
            println!("- Issue type: {}", final_state.classification);
            println!("- Resolved: {}", final_state.resolved);
            if final_state.refund_amount > 0 {
                println!(
                    "- Refund processed: {} for {}",
                    final_state.refund_amount, final_state.refund_product
                );
            }
            println!("Thank you for using our Food Delivery Support Agent!\n");
        }
    }

    Ok(())
}
