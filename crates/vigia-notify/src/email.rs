use crate::error::Result;
use crate::{AlertMessage, Notifier};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP delivery channel.
///
/// Built for an internal relay: port 25, no authentication, no TLS by
/// default, with credentials and STARTTLS available for relays that need
/// them.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl EmailChannel {
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        username: Option<&str>,
        password: Option<&str>,
        starttls: bool,
        from: &str,
    ) -> Result<Self> {
        let mut builder = if starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)?.port(smtp_port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host).port(smtp_port)
        };

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.to_string(),
        })
    }

    /// Renders the HTML body: a red centered heading over the incident
    /// lines, one per row.
    pub(crate) fn format_body(message: &AlertMessage) -> String {
        let lines = message.body_lines.join("<br>\n");
        format!(
            "<html>\n<body>\n\
             <h1 style=\"color: red; text-align: center;\">{}</h1>\n\
             <h3 style=\"text-align: center;\">{}</h3>\n\
             </body>\n</html>",
            message.heading, lines
        )
    }
}

#[async_trait]
impl Notifier for EmailChannel {
    async fn send(&self, message: &AlertMessage, recipients: &[String]) -> Result<()> {
        if recipients.is_empty() {
            tracing::warn!(subject = %message.subject, "no recipients configured, dropping alert");
            return Ok(());
        }

        let body = Self::format_body(message);
        let mut last_err = None;

        for recipient in recipients {
            let email = Message::builder()
                .from(self.from.parse()?)
                .to(recipient.parse()?)
                .subject(&message.subject)
                .header(ContentType::TEXT_HTML)
                .body(body.clone())?;

            match self.transport.send(email).await {
                Ok(_) => {
                    tracing::debug!(recipient = %recipient, subject = %message.subject, "alert mail sent");
                }
                Err(e) => {
                    tracing::error!(recipient = %recipient, error = %e, "alert mail failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}
