//! Shared fixtures for integration tests.

use std::sync::{Arc, Mutex};

use carpenter::order::domain::{OrderId, OrderSummary};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock that only moves when a test advances it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward by whole seconds.
    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += Duration::seconds(seconds);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(epoch())
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

/// Fixed start instant for deterministic scenarios.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Order every fixture task belongs to.
pub fn seeded_order() -> OrderSummary {
    let order_id = OrderId::new(1).expect("valid order id");
    OrderSummary::new(order_id, "Muebles Ruiz", "Corte", "Alta").expect("valid order summary")
}
