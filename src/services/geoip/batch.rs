//! Batch orchestrator
//!
//! 并发查询多个地址，成功与失败分开收集，单个失败不会中断整个批次。

use futures_util::{StreamExt, stream};
use tracing::{debug, info};

use super::address::Address;
use super::lookup::GeolocationService;
use super::response::{BatchFailure, BatchItemOutcome, BatchResult};
use crate::errors::GeoError;

impl GeolocationService {
    /// Look up every address concurrently
    ///
    /// At most `batch_concurrency` lookups are in flight at once. Outcomes are
    /// paired with their originating address, so both result lists follow
    /// input order regardless of completion order.
    pub async fn lookup_batch(&self, addresses: &[Address]) -> BatchResult {
        let result: BatchResult = self.lookup_outcomes(addresses).await.into_iter().collect();
        info!(
            "Batch lookup completed: {} succeeded, {} failed",
            result.successes.len(),
            result.failures.len()
        );
        result
    }

    async fn lookup_outcomes(&self, addresses: &[Address]) -> Vec<BatchItemOutcome> {
        stream::iter(addresses.iter().copied())
            .map(|address| async move {
                match self.lookup(address).await {
                    Ok(response) => BatchItemOutcome::Found(Box::new(response)),
                    Err(e) => failed(address.to_string(), &e),
                }
            })
            .buffered(self.batch_concurrency)
            .collect()
            .await
    }

    /// Validate then look up raw address strings
    ///
    /// Entries that do not parse become `InvalidAddress` failures in place,
    /// the remaining ones are looked up concurrently.
    pub async fn resolve_batch(&self, inputs: &[String]) -> BatchResult {
        let parsed: Vec<Result<Address, BatchItemOutcome>> = inputs
            .iter()
            .map(|text| Address::parse(text).map_err(|e| failed(text.clone(), &e)))
            .collect();

        let valid: Vec<Address> = parsed.iter().filter_map(|p| p.as_ref().ok().copied()).collect();
        if valid.len() < inputs.len() {
            debug!(
                "Batch contains {} invalid address(es)",
                inputs.len() - valid.len()
            );
        }

        let mut looked_up = self.lookup_outcomes(&valid).await.into_iter();

        // 按输入顺序把校验失败项与查询结果交织回去
        let mut result = BatchResult::default();
        for entry in parsed {
            match entry {
                Ok(_) => {
                    if let Some(outcome) = looked_up.next() {
                        result.push(outcome);
                    }
                }
                Err(outcome) => result.push(outcome),
            }
        }
        info!(
            "Batch lookup completed: {} succeeded, {} failed",
            result.successes.len(),
            result.failures.len()
        );
        result
    }
}

fn failed(address: String, error: &GeoError) -> BatchItemOutcome {
    BatchItemOutcome::Failed(BatchFailure {
        address,
        kind: error.kind(),
        detail: error.batch_detail(),
    })
}
