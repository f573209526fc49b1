//! Sends a templated email through the log transport.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p courier --example log_mailer
//! ```

use askama::Template;
use courier::{
    AskamaTemplateEngine, Email, MailDefaults, MailerModule, MailerModuleOptions,
    SendMailOptions, TemplateData, TransportConfig,
};
use serde::Deserialize;

#[derive(Template, Deserialize)]
#[template(
    source = "<h1>Hello {{ name }}</h1><p>Your order {{ order }} has shipped.</p>",
    ext = "html"
)]
struct ShippedTemplate {
    name: String,
    order: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let module = MailerModule::for_root(
        MailerModuleOptions::new("log")
            .defaults(MailDefaults::from_address("Shop <orders@example.com>"))
            .mailer("log", TransportConfig::Log { verbose: true })
            .template_engine(AskamaTemplateEngine::new().register::<ShippedTemplate>("shipped")),
    )?;

    let email = Email::builder()
        .to("ann@example.com")
        .subject("Your order has shipped")
        .build();

    let delivery = module
        .service()
        .send(
            SendMailOptions::new(email).template("shipped").data(
                TemplateData::new()
                    .insert("name", "Ann")?
                    .insert("order", "#1042")?,
            ),
        )
        .await?;

    tracing::info!(message_id = ?delivery.message_id, "Done");
    Ok(())
}
