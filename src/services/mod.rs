// Service exports
pub mod auth;
pub mod geocoder;
pub mod mailer;
pub mod notifier;
pub mod postgres;
pub mod store;

pub use auth::{AuthError, Claims, PasswordHasher, TokenService};
pub use geocoder::{GeocodeError, Geocoder};
pub use mailer::{HttpMailer, MailError, MailMessage, MailTransport};
pub use notifier::{compose_message, DispatchReport, NotificationDispatcher, RequestAlert};
pub use postgres::{PostgresClient, PostgresError};
pub use store::{DonorStore, RequestStore};
