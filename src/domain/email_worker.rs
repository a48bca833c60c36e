//! Background worker draining the email queue.
//!
//! Delivery failures are logged and dropped; they never surface as request
//! errors. The worker exits when all senders are dropped.

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::domain::email_job::EmailJob;
use crate::infrastructure::email::EmailSender;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Runs the email delivery loop.
///
/// When `sender` is `None` (no email provider configured), jobs are logged
/// and discarded so the rest of the service keeps working.
pub async fn run_email_worker(mut rx: mpsc::Receiver<EmailJob>, sender: Option<EmailSender>) {
    while let Some(job) = rx.recv().await {
        let Some(sender) = sender.as_ref() else {
            debug!(to = %job.to, "email delivery disabled, dropping message");
            continue;
        };

        let mut delivered = false;
        for attempt in 1..=MAX_ATTEMPTS {
            match sender.send(&job).await {
                Ok(()) => {
                    delivered = true;
                    break;
                }
                Err(e) => {
                    warn!(to = %job.to, attempt, error = %e, "email delivery attempt failed");
                    if attempt < MAX_ATTEMPTS {
                        sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        if !delivered {
            warn!(to = %job.to, subject = %job.subject, "giving up on email delivery");
        }
    }
}
