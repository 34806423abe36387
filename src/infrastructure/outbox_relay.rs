use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use diesel::prelude::*;
use log::{error, info, warn};

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::schema::notification_outbox;

use super::mailer::{Mailer, OutgoingMail};
use super::models::OutboxRow;

/// Rows that failed this many times are left for manual inspection.
pub const MAX_ATTEMPTS: i32 = 5;

const MIN_POLL: Duration = Duration::from_secs(1);

/// Delivers queued notifications through a [`Mailer`] and marks them sent.
pub struct NotificationRelay<M> {
    pool: DbPool,
    mailer: M,
    from: String,
    batch_size: i64,
}

impl<M: Mailer> NotificationRelay<M> {
    pub fn new(pool: DbPool, mailer: M, from: impl Into<String>) -> Self {
        Self {
            pool,
            mailer,
            from: from.into(),
            batch_size: 50,
        }
    }

    /// Send one batch of pending rows, oldest first. Returns how many were
    /// delivered; failed rows keep `sent_at` empty and are retried later.
    pub fn drain_once(&self) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let pending: Vec<OutboxRow> = notification_outbox::table
            .filter(notification_outbox::sent_at.is_null())
            .filter(notification_outbox::attempts.lt(MAX_ATTEMPTS))
            .order(notification_outbox::created_at.asc())
            .limit(self.batch_size)
            .select(OutboxRow::as_select())
            .load(&mut conn)?;

        let mut delivered = 0;
        for row in pending {
            let mail = OutgoingMail {
                from: &self.from,
                to: &row.recipient,
                subject: &row.subject,
                body: &row.body,
            };
            let target = notification_outbox::table.find(row.id);
            match self.mailer.send(&mail) {
                Ok(()) => {
                    diesel::update(target)
                        .set((
                            notification_outbox::sent_at.eq(Some(Utc::now())),
                            notification_outbox::attempts.eq(notification_outbox::attempts + 1),
                        ))
                        .execute(&mut conn)?;
                    delivered += 1;
                }
                Err(e) => {
                    warn!("notification {} to {} failed: {e}", row.id, row.recipient);
                    diesel::update(target)
                        .set(notification_outbox::attempts.eq(notification_outbox::attempts + 1))
                        .execute(&mut conn)?;
                }
            }
        }
        Ok(delivered)
    }
}

impl<M: Mailer> NotificationRelay<M> {
    /// Drain the outbox every `every` on the blocking pool until the runtime
    /// shuts down.
    pub fn spawn(self, every: Duration) -> tokio::task::JoinHandle<()> {
        let relay = Arc::new(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(MIN_POLL));
            loop {
                ticker.tick().await;
                let relay = Arc::clone(&relay);
                match tokio::task::spawn_blocking(move || relay.drain_once()).await {
                    Ok(Ok(0)) => {}
                    Ok(Ok(n)) => info!("delivered {n} notifications"),
                    Ok(Err(e)) => error!("notification relay failed: {e}"),
                    Err(e) => error!("notification relay task aborted: {e}"),
                }
            }
        })
    }
}
