use common::types::METRIC_HTTP_REQUESTS_TOTAL;
use common::types::METRIC_HTTP_REQUEST_TIME_SECONDS;
use common::types::METRIC_RBAC_DENIED_TOTAL;
use metrics::describe_counter;
use metrics::describe_histogram;
use metrics::Unit;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::Result;

pub mod config;
pub mod error;
pub mod server;

pub fn init_metrics() -> Result<()> {
    PrometheusBuilder::new().install()?;

    describe_counter!(METRIC_HTTP_REQUESTS_TOTAL, "number of http requests");
    describe_histogram!(
        METRIC_HTTP_REQUEST_TIME_SECONDS,
        Unit::Seconds,
        "http request time"
    );
    describe_counter!(
        METRIC_RBAC_DENIED_TOTAL,
        "number of requests denied by the permission matrix"
    );

    Ok(())
}
