//! Durable deferred-task worker.
//!
//! Tasks are rows in `scheduled_tasks` with a `visible_after` timestamp,
//! so pending work survives process restarts. The worker polls for due
//! rows, runs each once, and deletes the row whatever the outcome; task
//! bodies have no caller to report to, so failures are logged and
//! dropped.

use crate::{
    entities::{scheduled_task, scheduled_task::TaskType, ScheduledTasks},
    errors::ServiceError,
    services::PaymentService,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub struct TaskWorker {
    db: Arc<DatabaseConnection>,
    payments: Arc<PaymentService>,
    poll_interval: Duration,
}

impl TaskWorker {
    pub fn new(
        db: Arc<DatabaseConnection>,
        payments: Arc<PaymentService>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            db,
            payments,
            poll_interval,
        }
    }

    /// Runs the poll loop until the process shuts down.
    pub async fn run(self) {
        info!(interval = ?self.poll_interval, "Deferred-task worker started");
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.drain_due_tasks().await {
                error!("Deferred-task sweep failed: {}", e);
            }
        }
    }

    /// Executes every task whose visibility time has passed.
    pub async fn drain_due_tasks(&self) -> Result<usize, ServiceError> {
        let due = ScheduledTasks::find()
            .filter(scheduled_task::Column::VisibleAfter.lte(Utc::now()))
            .order_by_asc(scheduled_task::Column::VisibleAfter)
            .all(&*self.db)
            .await?;

        let count = due.len();
        for task in due {
            let outcome = match task.task_type {
                TaskType::OrderPaymentCheck => {
                    self.payments.run_payment_check(task.subject_id).await
                }
            };
            if let Err(e) = outcome {
                error!(task_id = %task.id, subject = %task.subject_id, "Deferred task failed: {}", e);
            }

            ScheduledTasks::delete_by_id(task.id).exec(&*self.db).await?;
            debug!(task_id = %task.id, "Deferred task consumed");
        }

        Ok(count)
    }
}
