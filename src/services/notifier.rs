use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::{is_eligible, DonorCriteria};
use crate::models::{BloodGroup, BloodRequest, Donor};
use crate::services::mailer::{MailMessage, MailTransport};
use crate::services::store::DonorStore;

const SUBJECT: &str = "🩸 Urgent Blood Donation Request - BloodPlus";

/// What donors are told about a new request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestAlert {
    pub blood_group: BloodGroup,
    pub city: String,
    pub contact_person: String,
    pub contact_phone: String,
}

impl RequestAlert {
    /// Eligibility filter for donors who should hear about this request
    pub fn criteria(&self) -> DonorCriteria {
        DonorCriteria::new(Some(self.blood_group.as_str()), Some(&self.city), None)
    }
}

impl From<&BloodRequest> for RequestAlert {
    fn from(request: &BloodRequest) -> Self {
        Self {
            blood_group: request.blood_group,
            city: request.city.clone(),
            contact_person: request.contact_person.clone(),
            contact_phone: request.contact_phone.clone(),
        }
    }
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub eligible: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Sends one email per eligible donor when a request is created
///
/// Failures are logged per donor and never stop the remaining sends or
/// surface to whoever created the request.
pub struct NotificationDispatcher {
    store: Arc<dyn DonorStore>,
    transport: Arc<dyn MailTransport>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn DonorStore>, transport: Arc<dyn MailTransport>) -> Self {
        Self { store, transport }
    }

    /// Run the fan-out on a detached task
    pub fn spawn(self: &Arc<Self>, alert: RequestAlert) -> JoinHandle<DispatchReport> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.notify_eligible_donors(&alert).await })
    }

    pub async fn notify_eligible_donors(&self, alert: &RequestAlert) -> DispatchReport {
        // A blank city would drop the city filter and reach every donor
        if alert.city.trim().is_empty() {
            tracing::warn!("Skipping {} alert with no city", alert.blood_group);
            return DispatchReport::default();
        }

        let criteria = alert.criteria();

        let candidates = match self.store.find_donors(&criteria).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(
                    "Could not load donors for {} request in {}: {}",
                    alert.blood_group,
                    alert.city,
                    e
                );
                return DispatchReport::default();
            }
        };

        let donors: Vec<Donor> = candidates
            .into_iter()
            .filter(|donor| is_eligible(donor, &criteria))
            .collect();

        self.dispatch(&donors, alert).await
    }

    /// Send the alert to every donor in `donors`
    pub async fn dispatch(&self, donors: &[Donor], alert: &RequestAlert) -> DispatchReport {
        let mut report = DispatchReport {
            eligible: donors.len(),
            ..DispatchReport::default()
        };

        for donor in donors {
            let message = compose_message(donor, alert);
            match self.transport.send(&message).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Failed to notify donor {} <{}>: {}", donor.id, donor.email, e);
                }
            }
        }

        tracing::info!(
            "Notified {} of {} eligible {} donors in {} ({} failed)",
            report.delivered,
            report.eligible,
            alert.blood_group,
            alert.city,
            report.failed
        );

        report
    }
}

/// Render the alert email for one donor
pub fn compose_message(donor: &Donor, alert: &RequestAlert) -> MailMessage {
    let esc = |text: &str| html_escape::encode_text(text).into_owned();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #dc143c;">Blood Donation Request</h2>
  <p>Dear {name},</p>
  <p>Someone urgently needs <strong>{group}</strong> blood in your area!</p>
  <div style="background-color: #fff0f0; padding: 15px; border-left: 4px solid #dc143c; margin: 20px 0;">
    <p><strong>Location:</strong> {city}</p>
    <p><strong>Contact Person:</strong> {person}</p>
    <p><strong>Contact Phone:</strong> {phone}</p>
  </div>
  <p>Your donation can save a life! Please contact the person above if you can help.</p>
  <p style="color: #666; font-size: 12px;">Thank you for being a life saver!</p>
  <p style="color: #666; font-size: 12px;">- BloodPlus Team</p>
</div>"#,
        name = esc(&donor.name),
        group = alert.blood_group,
        city = esc(&alert.city),
        person = esc(&alert.contact_person),
        phone = esc(&alert.contact_phone),
    );

    MailMessage {
        to: donor.email.clone(),
        subject: SUBJECT.to_string(),
        html,
    }
}
