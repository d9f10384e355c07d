//! textbridge - chat with an LLM or send SMS from one terminal thread
//!
//! Lines typed at the prompt go either to an OpenAI-compatible completion
//! endpoint or to the Twilio Messages API, and the results are shown in a
//! single ephemeral conversation.

mod config;
mod console;
mod controller;
mod error;
mod llm;
mod phone;
mod sms;
mod state_machine;

#[cfg(test)]
mod testing;

use config::{AppConfig, Credentials};
use console::Console;
use controller::ConversationController;
use llm::{LoggingCompletion, OpenAIService};
use sms::{LoggingMessaging, TwilioService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging. stdout belongs to the console.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textbridge=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let app_config = AppConfig::from_env();
    let credentials = Credentials::resolve();

    if credentials.is_complete() {
        tracing::info!("All credentials configured");
    } else {
        tracing::warn!(
            missing = ?credentials.missing_keys(),
            completion = credentials.completion_configured(),
            messaging = credentials.messaging_configured(),
            "Missing environment variables"
        );
    }

    let completion = LoggingCompletion::new(OpenAIService::new(
        credentials.completion_api_key.clone(),
        app_config.openai_model.as_str(),
        &app_config.openai_base_url,
    ));
    let messaging = LoggingMessaging::new(TwilioService::new(
        &credentials,
        &app_config.twilio_base_url,
    ));

    tracing::info!(
        model = %app_config.openai_model,
        openai_base_url = %app_config.openai_base_url,
        twilio_base_url = %app_config.twilio_base_url,
        "Clients initialized"
    );

    let controller = ConversationController::new(completion, messaging);
    let mut console = Console::new(controller, app_config.app_name, credentials);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    console.run(stdin, &mut stdout).await?;

    Ok(())
}
