mod mailer;

pub use mailer::{ICartNotifier, InMemoryCartNotifier, SentReminder, SmtpCartNotifier};
