//! Mail Sender Implementations

use crate::domain::repository::{MailError, MailSender};

/// Mail sender that writes the message to the log instead of a wire
///
/// Stands in for a real delivery backend in development and demo
/// deployments; the traced event carries everything an operator needs
/// to complete a verification by hand.
#[derive(Debug, Clone, Default)]
pub struct LogMailSender;

impl MailSender for LogMailSender {
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(
            to_email = %to_email,
            subject = %subject,
            body = %body,
            "mail send stub"
        );
        Ok(())
    }
}
