use crate::config::Config;
use crate::config::SmtpConfig;
use cartkeeper_domain::{CartItem, Customer, ReminderStage, ID};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::info;

/// Delivers abandoned cart reminder emails. Failures are returned to
/// the caller, the sweep decides what to do with them.
#[async_trait::async_trait]
pub trait ICartNotifier: Send + Sync {
    async fn send_reminder(
        &self,
        customer: &Customer,
        items: &[CartItem],
        stage: ReminderStage,
    ) -> anyhow::Result<()>;
}

pub struct SmtpCartNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    smtp: SmtpConfig,
    frontend_url: String,
}

impl SmtpCartNotifier {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let creds = Credentials::new(
            config.smtp.from_address.clone(),
            config.smtp.password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp.host)?
            .port(config.smtp.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            smtp: config.smtp.clone(),
            frontend_url: config.frontend_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ICartNotifier for SmtpCartNotifier {
    async fn send_reminder(
        &self,
        customer: &Customer,
        items: &[CartItem],
        stage: ReminderStage,
    ) -> anyhow::Result<()> {
        let label = stage
            .label()
            .ok_or_else(|| anyhow::anyhow!("No reminder email exists for stage: {:?}", stage))?;

        let cart_url = format!("{}/shop/cart", self.frontend_url);
        let html = render_reminder_html(&customer.username, items, label, &cart_url);

        let email = Message::builder()
            .from(format!("Cartkeeper <{}>", self.smtp.from_address).parse()?)
            .to(customer.email.parse()?)
            .subject(format!("Reminder: Items in your cart for over {}", label))
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(email).await?;
        info!(
            "Sent {} cart reminder to customer with id: {}",
            label, customer.id
        );
        Ok(())
    }
}

fn render_reminder_html(username: &str, items: &[CartItem], label: &str, cart_url: &str) -> String {
    let items_list = items
        .iter()
        .map(|item| {
            let image = item
                .image
                .as_deref()
                .map(|url| {
                    format!(
                        r#"<img src="{}" alt="{}" style="width: 80px; height: 80px; object-fit: cover;" />"#,
                        url, item.name
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<li style="margin-bottom: 20px; display: flex; align-items: flex-start;">
  {}
  <div style="margin-left: 10px;">
    <strong>Product Name:</strong> {} <br/>
    <strong>Size:</strong> {} <br/>
    <strong>Color:</strong> <span style="background-color:{}"></span> <br/>
    <strong>Quantity:</strong> {} <br/>
    <strong>Price:</strong> ${:.2} <br/>
  </div>
</li>"#,
                image, item.name, item.size, item.color, item.quantity, item.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<html>
<body style="font-family: sans-serif;">
  <h1>Hi {},</h1>
  <p>You left items in your cart over {} ago. Don't forget to complete your purchase!</p>
  <ul style="list-style: none; padding: 0;">
{}
  </ul>
  <p><a href="{}">Return to your cart</a></p>
</body>
</html>"#,
        username, label, items_list, cart_url
    )
}

/// A reminder recorded by the `InMemoryCartNotifier`
#[derive(Debug, Clone)]
pub struct SentReminder {
    pub customer_id: ID,
    pub email: String,
    pub stage: ReminderStage,
    pub item_count: usize,
}

/// Notifier that records reminders instead of sending them, with an
/// optional forced failure mode. Used in tests.
pub struct InMemoryCartNotifier {
    sent: Mutex<Vec<SentReminder>>,
    failing: AtomicBool,
}

impl InMemoryCartNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentReminder> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for InMemoryCartNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ICartNotifier for InMemoryCartNotifier {
    async fn send_reminder(
        &self,
        customer: &Customer,
        items: &[CartItem],
        stage: ReminderStage,
    ) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("smtp server unavailable"));
        }
        self.sent.lock().unwrap().push(SentReminder {
            customer_id: customer.id.clone(),
            email: customer.email.clone(),
            stage,
            item_count: items.len(),
        });
        Ok(())
    }
}
