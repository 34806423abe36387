pub mod feedback_repo;
pub mod mailer;
pub mod models;
pub mod order_repo;
pub mod outbox_relay;

#[cfg(test)]
pub(crate) mod memory;
