//! Database metrics.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record how long a named query took.
pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("bookings_db_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Publish connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("bookings_db_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("bookings_db_connections_idle").set(idle as f64);
    gauge!("bookings_db_connections_total").set(size as f64);
}

/// Times a single query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_booking_by_uid");
/// let result = sqlx::query_as::<_, BookingEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed time and consume the timer.
    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }
}
