//! Shared fixtures for task lifecycle unit tests.

use crate::order::domain::{OrderId, OrderSummary};
use crate::task::domain::{Assignee, Task, TaskDetails};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};

/// Clock that only moves when a test advances it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += Duration::seconds(seconds);
    }

    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += Duration::milliseconds(millis);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn order_id() -> OrderId {
    OrderId::new(42).expect("valid order id")
}

pub fn order_summary() -> OrderSummary {
    OrderSummary::new(order_id(), "Muebles Ruiz", "Corte", "Alta").expect("valid order summary")
}

pub fn sample_task(clock: &ManualClock) -> Task {
    let details = TaskDetails::new("Cortar tableros", "Corte", "Alta").expect("valid details");
    let assignee = Assignee::new("ana").expect("valid assignee");
    Task::new(order_id(), details, assignee, clock)
}
