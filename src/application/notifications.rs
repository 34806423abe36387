use crate::domain::feedback::ContactMessage;
use crate::domain::order::PersistedOrder;
use crate::domain::ports::Notification;

const CURRENCY: &str = "৳";

/// Who gets told about new orders and contact messages.
#[derive(Debug, Clone, Default)]
pub struct NotificationPolicy {
    pub admin_email: Option<String>,
    pub shop_name: String,
}

impl NotificationPolicy {
    pub fn new(admin_email: Option<String>, shop_name: impl Into<String>) -> Self {
        Self {
            admin_email,
            shop_name: shop_name.into(),
        }
    }

    pub fn for_order(&self, order: &PersistedOrder) -> Vec<Notification> {
        let lines = order_lines(order);
        let mut notices = Vec::with_capacity(2);

        if let Some(admin) = &self.admin_email {
            let c = &order.customer;
            let mut body = format!(
                "New order #{}\nName: {}\nPhone: {}\nEmail: {}\nAddress: {}\nArea: {}\nNote: {}\n\n",
                order.id,
                c.name,
                c.phone,
                c.email.as_deref().unwrap_or("-"),
                c.address,
                order.delivery_area,
                c.note.as_deref().unwrap_or("-"),
            );
            body.push_str(&lines);
            body.push_str(&format!(
                "\n\nSubtotal: {CURRENCY}{}\nDelivery: {CURRENCY}{}\nTotal: {CURRENCY}{}",
                order.subtotal, order.delivery_fee, order.total
            ));
            notices.push(Notification {
                recipient: admin.clone(),
                subject: format!("New order #{}", order.id),
                body,
            });
        }

        if let Some(email) = &order.customer.email {
            let body = format!(
                "Hi {},\n\nThanks for your order (#{})! An agent from {} will call you within 24 hours to confirm.\n\nOrder summary:\n{}\n\nTotal: {CURRENCY}{}\n\n- {}",
                order.customer.name, order.id, self.shop_name, lines, order.total, self.shop_name
            );
            notices.push(Notification {
                recipient: email.clone(),
                subject: format!("Your {} order #{}", self.shop_name, order.id),
                body,
            });
        }

        notices
    }

    pub fn for_contact(&self, message: &ContactMessage) -> Vec<Notification> {
        let Some(admin) = &self.admin_email else {
            return Vec::new();
        };
        vec![Notification {
            recipient: admin.clone(),
            subject: format!("New contact message from {}", message.name),
            body: format!(
                "{}\n\nPhone: {}\nEmail: {}",
                message.message,
                message.phone.as_deref().unwrap_or("-"),
                message.email.as_deref().unwrap_or("-"),
            ),
        }]
    }
}

fn order_lines(order: &PersistedOrder) -> String {
    order
        .lines
        .iter()
        .map(|l| format!("- {} x {} @ {CURRENCY}{}", l.name, l.quantity, l.unit_price))
        .collect::<Vec<_>>()
        .join("\n")
}
