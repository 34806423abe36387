pub mod feedback_service;
pub mod notifications;
pub mod order_service;
