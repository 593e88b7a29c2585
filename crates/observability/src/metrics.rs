//! Relay 指标收集模块
//!
//! 每个批次调用一次，记录批次规模、解码结果与投递状态。

use contracts::{BatchSummary, DecodeError};
use metrics::{counter, gauge, histogram};

/// 记录收到的批次
pub fn record_batch_received(batch_size: usize) {
    counter!("sqs_relay_batches_total").increment(1);
    histogram!("sqs_relay_batch_size").record(batch_size as f64);
}

/// 记录批次结果
///
/// # Example
///
/// ```ignore
/// let result = dispatcher.dispatch(&batch).await;
/// observability::metrics::record_batch_result(result.as_ref(), started.elapsed().as_secs_f64() * 1000.0);
/// ```
pub fn record_batch_result(result: Result<&BatchSummary, &DecodeError>, elapsed_ms: f64) {
    match result {
        Ok(summary) => {
            counter!("sqs_relay_messages_decoded_total").increment(summary.processed as u64);
            histogram!("sqs_relay_batch_duration_ms").record(elapsed_ms);
        }
        Err(_) => {
            counter!("sqs_relay_decode_failures_total").increment(1);
        }
    }
}

/// 投递累计值 (来自 dispatcher 快照)
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryTotals {
    pub delivered: u64,
    pub rejected: u64,
    pub in_flight: usize,
}

/// 同步投递累计值
pub fn record_delivery_totals(sink_name: &str, totals: DeliveryTotals) {
    counter!(
        "sqs_relay_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => "success"
    )
    .absolute(totals.delivered);

    counter!(
        "sqs_relay_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => "rejected"
    )
    .absolute(totals.rejected);

    gauge!("sqs_relay_in_flight", "sink" => sink_name.to_string()).set(totals.in_flight as f64);
}
