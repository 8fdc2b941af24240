//! # Sale Submission
//!
//! Turns a cart snapshot plus sale metadata into a persisted sale, its line
//! items and an invoice.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         submit(snapshot, meta)                          │
//! │                                                                         │
//! │  Idle ──► Validating ──► empty cart? no payment method? ──► Failed     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CreatingSale ──► create_sale ──────────────► Failed(SaleCreation)      │
//! │      │            (no id counts as failure)                             │
//! │      ▼                                                                  │
//! │  RecordingDetails                                                       │
//! │      │   add_sale_detail ─┐                                             │
//! │      │   add_sale_detail ─┼── join_all: every call settles first ──┐    │
//! │      │   add_sale_detail ─┘                                        │    │
//! │      ▼                                          any failed? ──► Failed  │
//! │  CreatingInvoice ──► create_invoice ─────────► Failed(Invoice)         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Succeeded { sale_id, invoice_id }                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one attempt per call. Nothing is retried and nothing already
//! persisted is undone; errors raised after `create_sale` carry the sale id.
//! The coordinator reads the snapshot and metadata but never changes them:
//! clearing the cart after a success is the caller's job.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use salesys_core::{
    CartSnapshot, InvoiceId, Money, NewInvoice, NewSale, NewSaleDetail, SaleId, SaleMetadata,
    NEW_INVOICE_STATUS, NEW_SALE_STATUS, SALES_TAX_RATE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::backend::{with_timeout, Backend, Operation};
use crate::config::ClientConfig;
use crate::error::{BackendError, SubmissionError};

// =============================================================================
// Stages and Observers
// =============================================================================

/// Where a submission attempt currently is.
///
/// Every attempt reports `Idle` first, then walks the stages in order and
/// ends in `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Idle,
    Validating,
    CreatingSale,
    RecordingDetails,
    CreatingInvoice,
    Succeeded,
    Failed,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SubmissionStage::Idle => "idle",
            SubmissionStage::Validating => "validating",
            SubmissionStage::CreatingSale => "creating the sale",
            SubmissionStage::RecordingDetails => "recording the sale items",
            SubmissionStage::CreatingInvoice => "creating the invoice",
            SubmissionStage::Succeeded => "done",
            SubmissionStage::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// Receives stage changes, e.g. to drive a progress indicator.
pub trait SubmissionObserver: Send + Sync {
    fn on_stage(&self, stage: SubmissionStage);
}

/// Observer that ignores every stage.
pub struct NoOpObserver;

impl SubmissionObserver for NoOpObserver {
    fn on_stage(&self, _stage: SubmissionStage) {}
}

// =============================================================================
// Outcome
// =============================================================================

/// A fully recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSale {
    pub sale_id: SaleId,
    pub invoice_id: InvoiceId,
    pub invoice_uuid: String,
    pub total: Money,
}

// =============================================================================
// Coordinator
// =============================================================================

pub struct SaleSubmissionCoordinator {
    backend: Arc<dyn Backend>,
    call_timeout: Duration,
    observer: Arc<dyn SubmissionObserver>,
}

impl SaleSubmissionCoordinator {
    pub fn new(backend: Arc<dyn Backend>, config: &ClientConfig) -> Self {
        Self {
            backend,
            call_timeout: config.call_timeout(),
            observer: Arc::new(NoOpObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Submits one sale. See the module docs for the flow.
    pub async fn submit(
        &self,
        snapshot: &CartSnapshot,
        meta: &SaleMetadata,
    ) -> Result<SubmittedSale, SubmissionError> {
        let submission_id = Uuid::new_v4();
        let span = info_span!("submit_sale", %submission_id, items = snapshot.len());

        async move {
            self.enter(SubmissionStage::Idle);
            let result = self.run(snapshot, meta).await;
            match &result {
                Ok(sale) => {
                    self.enter(SubmissionStage::Succeeded);
                    info!(
                        sale_id = sale.sale_id,
                        invoice = %sale.invoice_uuid,
                        total = %sale.total,
                        "Sale submitted"
                    );
                }
                Err(e) => {
                    self.enter(SubmissionStage::Failed);
                    warn!(error = %e, sale_id = ?e.sale_id(), "Sale submission failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    fn enter(&self, stage: SubmissionStage) {
        debug!(%stage, "Submission stage");
        self.observer.on_stage(stage);
    }

    async fn run(
        &self,
        snapshot: &CartSnapshot,
        meta: &SaleMetadata,
    ) -> Result<SubmittedSale, SubmissionError> {
        self.enter(SubmissionStage::Validating);
        if snapshot.is_empty() {
            return Err(SubmissionError::EmptyCart);
        }
        let payment_method = meta
            .payment_method
            .ok_or(SubmissionError::MissingPaymentMethod)?;
        let totals = snapshot.totals();

        // Step 1: the sale header
        self.enter(SubmissionStage::CreatingSale);
        let sale = NewSale {
            customer_id: meta.customer_id,
            subtotal: totals.subtotal,
            taxes: totals.taxes,
            total: totals.total,
            payment_method,
            status: Some(NEW_SALE_STATUS),
        };
        let created = with_timeout(
            Operation::CreateSale,
            self.call_timeout,
            self.backend.create_sale(&sale),
        )
        .await;
        let sale_id = match created {
            Ok(Some(id)) => id,
            Ok(None) => {
                return Err(SubmissionError::SaleCreationFailed {
                    reason: "the backend returned no sale id".to_string(),
                })
            }
            Err(e) if e.is_timeout() => {
                return Err(SubmissionError::Timeout {
                    stage: SubmissionStage::CreatingSale,
                    sale_id: None,
                })
            }
            Err(e) => {
                return Err(SubmissionError::SaleCreationFailed {
                    reason: e.to_string(),
                })
            }
        };
        debug!(sale_id, "Sale created");

        // Step 2: one detail per line, all in flight together
        self.enter(SubmissionStage::RecordingDetails);
        let details: Vec<NewSaleDetail> = snapshot
            .items()
            .iter()
            .map(|item| NewSaleDetail {
                sale_id,
                product_id: item.product_id(),
                quantity: i64::from(item.quantity()),
                unit_price: item.unit_price(),
                discount: Money::zero(),
                tax_percentage: SALES_TAX_RATE.percentage(),
            })
            .collect();
        let outcomes = join_all(details.iter().map(|detail| {
            with_timeout(
                Operation::AddSaleDetail,
                self.call_timeout,
                self.backend.add_sale_detail(detail),
            )
        }))
        .await;

        let failures: Vec<(&NewSaleDetail, BackendError)> = details
            .iter()
            .zip(outcomes)
            .filter_map(|(detail, outcome)| outcome.err().map(|e| (detail, e)))
            .collect();
        for (detail, e) in &failures {
            warn!(sale_id, product_id = detail.product_id, error = %e, "Sale item not recorded");
        }
        if failures.iter().any(|(_, e)| e.is_timeout()) {
            return Err(SubmissionError::Timeout {
                stage: SubmissionStage::RecordingDetails,
                sale_id: Some(sale_id),
            });
        }
        if !failures.is_empty() {
            return Err(SubmissionError::DetailRecordingFailed {
                sale_id,
                failed: failures.len(),
                total: details.len(),
            });
        }

        // Step 3: the invoice
        self.enter(SubmissionStage::CreatingInvoice);
        let invoice = NewInvoice {
            sale_id,
            uuid: Uuid::new_v4().to_string(),
            file_path: String::new(),
            status: Some(NEW_INVOICE_STATUS),
        };
        let invoice_id = with_timeout(
            Operation::CreateInvoice,
            self.call_timeout,
            self.backend.create_invoice(&invoice),
        )
        .await
        .map_err(|e| {
            if e.is_timeout() {
                SubmissionError::Timeout {
                    stage: SubmissionStage::CreatingInvoice,
                    sale_id: Some(sale_id),
                }
            } else {
                SubmissionError::InvoiceCreationFailed {
                    sale_id,
                    reason: e.to_string(),
                }
            }
        })?;

        Ok(SubmittedSale {
            sale_id,
            invoice_id,
            invoice_uuid: invoice.uuid,
            total: totals.total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{Fault, MemoryBackend, Trigger};
    use salesys_core::{CartEngine, InvoiceStatus, NewProduct, PaymentMethod, SaleStatus};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        stages: Mutex<Vec<SubmissionStage>>,
    }

    impl SubmissionObserver for RecordingObserver {
        fn on_stage(&self, stage: SubmissionStage) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    /// Backend with products A ($10.00) and B ($5.50), and a cart holding
    /// A × 2 and B × 1.
    async fn setup() -> (Arc<MemoryBackend>, CartEngine) {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .insert_product(NewProduct {
                name: "A".to_string(),
                code: "A-1".to_string(),
                price: Money::from_cents(1000),
                stock: 10,
            })
            .await;
        backend
            .insert_product(NewProduct {
                name: "B".to_string(),
                code: "B-1".to_string(),
                price: Money::from_cents(550),
                stock: 10,
            })
            .await;

        let products = backend.get_all_products().await.unwrap();
        let mut cart = CartEngine::new();
        cart.add_item(&products[0]);
        cart.add_item(&products[0]);
        cart.add_item(&products[1]);
        (backend, cart)
    }

    fn cash() -> SaleMetadata {
        let mut meta = SaleMetadata::new();
        meta.set_payment_method(Some(PaymentMethod::Cash));
        meta
    }

    fn coordinator(backend: &Arc<MemoryBackend>) -> SaleSubmissionCoordinator {
        SaleSubmissionCoordinator::new(backend.clone(), &ClientConfig::default())
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let (backend, cart) = setup().await;
        let observer = Arc::new(RecordingObserver::default());
        let coordinator = coordinator(&backend).with_observer(observer.clone());

        let submitted = coordinator.submit(&cart.snapshot(), &cash()).await.unwrap();
        assert_eq!(submitted.total.cents(), 2958);

        let sales = backend.sales().await;
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, submitted.sale_id);
        assert_eq!(sales[0].subtotal.cents(), 2550);
        assert_eq!(sales[0].taxes.cents(), 408);
        assert_eq!(sales[0].total.cents(), 2958);
        assert_eq!(sales[0].status, SaleStatus::Completed);
        assert_eq!(sales[0].payment_method, PaymentMethod::Cash);

        let details = backend.details().await;
        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.discount.is_zero()));
        assert_eq!(details[0].quantity, 2);
        assert_eq!(details[0].tax_amount.cents(), 320);

        let invoices = backend.invoices().await;
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].id, submitted.invoice_id);
        assert_eq!(invoices[0].uuid, submitted.invoice_uuid);
        assert_eq!(invoices[0].file_path, "");
        assert_eq!(invoices[0].status, InvoiceStatus::Active);
        assert!(Uuid::parse_str(&submitted.invoice_uuid).is_ok());

        assert_eq!(
            *observer.stages.lock().unwrap(),
            vec![
                SubmissionStage::Idle,
                SubmissionStage::Validating,
                SubmissionStage::CreatingSale,
                SubmissionStage::RecordingDetails,
                SubmissionStage::CreatingInvoice,
                SubmissionStage::Succeeded,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_calls() {
        let backend = Arc::new(MemoryBackend::new());
        let result = coordinator(&backend)
            .submit(&CartEngine::new().snapshot(), &cash())
            .await;

        assert_eq!(result, Err(SubmissionError::EmptyCart));
        assert_eq!(backend.total_calls().await, 0);
    }

    #[tokio::test]
    async fn test_missing_payment_method_makes_no_calls() {
        let (backend, cart) = setup().await;
        let calls_before = backend.total_calls().await;

        let result = coordinator(&backend)
            .submit(&cart.snapshot(), &SaleMetadata::new())
            .await;

        assert_eq!(result, Err(SubmissionError::MissingPaymentMethod));
        assert_eq!(backend.total_calls().await, calls_before);
    }

    #[tokio::test]
    async fn test_sale_creation_failure_stops_everything() {
        let (backend, cart) = setup().await;
        backend
            .inject(
                Operation::CreateSale,
                Trigger::Always,
                Fault::Fail("database is locked".to_string()),
            )
            .await;

        let result = coordinator(&backend).submit(&cart.snapshot(), &cash()).await;

        assert!(matches!(
            result,
            Err(SubmissionError::SaleCreationFailed { .. })
        ));
        assert_eq!(backend.calls(Operation::AddSaleDetail).await, 0);
        assert_eq!(backend.calls(Operation::CreateInvoice).await, 0);
    }

    #[tokio::test]
    async fn test_missing_sale_id_is_a_creation_failure() {
        let (backend, cart) = setup().await;
        backend
            .inject(Operation::CreateSale, Trigger::Always, Fault::OmitId)
            .await;

        let result = coordinator(&backend).submit(&cart.snapshot(), &cash()).await;

        assert!(matches!(
            result,
            Err(SubmissionError::SaleCreationFailed { .. })
        ));
        assert_eq!(backend.calls(Operation::AddSaleDetail).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_failure_reported_after_all_settle() {
        let (backend, mut cart) = setup().await;
        let extra = backend
            .insert_product(NewProduct {
                name: "C".to_string(),
                code: "C-1".to_string(),
                price: Money::from_cents(100),
                stock: 5,
            })
            .await;
        cart.add_item(&backend.get_product(extra).await.unwrap());

        // first call fails at once, the other two are still in flight
        backend
            .inject(
                Operation::AddSaleDetail,
                Trigger::Nth(1),
                Fault::Fail("constraint failed".to_string()),
            )
            .await;
        for n in [2, 3] {
            backend
                .inject(
                    Operation::AddSaleDetail,
                    Trigger::Nth(n),
                    Fault::Delay(Duration::from_millis(500)),
                )
                .await;
        }

        let result = coordinator(&backend).submit(&cart.snapshot(), &cash()).await;

        let sale_id = backend.sales().await[0].id;
        assert_eq!(
            result,
            Err(SubmissionError::DetailRecordingFailed {
                sale_id,
                failed: 1,
                total: 3,
            })
        );
        // the delayed calls finished before the failure was reported
        assert_eq!(backend.details().await.len(), 2);
        assert_eq!(backend.calls(Operation::CreateInvoice).await, 0);
        // nothing rolled back
        assert_eq!(backend.sales().await.len(), 1);
    }

    #[tokio::test]
    async fn test_invoice_failure_keeps_sale_and_details() {
        let (backend, cart) = setup().await;
        backend
            .inject(
                Operation::CreateInvoice,
                Trigger::Always,
                Fault::Fail("disk full".to_string()),
            )
            .await;

        let result = coordinator(&backend).submit(&cart.snapshot(), &cash()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, SubmissionError::InvoiceCreationFailed { .. }));
        assert_eq!(err.sale_id(), Some(backend.sales().await[0].id));
        assert_eq!(backend.details().await.len(), 2);
        assert!(backend.invoices().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sale_creation_timeout() {
        let (backend, cart) = setup().await;
        backend
            .inject(
                Operation::CreateSale,
                Trigger::Always,
                Fault::Delay(Duration::from_secs(60)),
            )
            .await;

        let result = coordinator(&backend).submit(&cart.snapshot(), &cash()).await;

        assert_eq!(
            result,
            Err(SubmissionError::Timeout {
                stage: SubmissionStage::CreatingSale,
                sale_id: None,
            })
        );
        assert_eq!(backend.calls(Operation::AddSaleDetail).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_timeout_carries_sale_id() {
        let (backend, cart) = setup().await;
        backend
            .inject(
                Operation::AddSaleDetail,
                Trigger::Nth(2),
                Fault::Delay(Duration::from_secs(60)),
            )
            .await;

        let result = coordinator(&backend).submit(&cart.snapshot(), &cash()).await;

        let sale_id = backend.sales().await[0].id;
        assert_eq!(
            result,
            Err(SubmissionError::Timeout {
                stage: SubmissionStage::RecordingDetails,
                sale_id: Some(sale_id),
            })
        );
        assert_eq!(backend.calls(Operation::CreateInvoice).await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_and_metadata_untouched() {
        let (backend, cart) = setup().await;
        let snapshot = cart.snapshot();
        let meta = cash();

        coordinator(&backend).submit(&snapshot, &meta).await.unwrap();

        assert_eq!(snapshot, cart.snapshot());
        assert_eq!(meta, cash());
    }

    #[tokio::test]
    async fn test_failure_stage_is_observed() {
        let (backend, cart) = setup().await;
        let observer = Arc::new(RecordingObserver::default());
        backend
            .inject(
                Operation::CreateSale,
                Trigger::Always,
                Fault::Fail("boom".to_string()),
            )
            .await;

        let _ = coordinator(&backend)
            .with_observer(observer.clone())
            .submit(&cart.snapshot(), &cash())
            .await;

        assert_eq!(
            *observer.stages.lock().unwrap(),
            vec![
                SubmissionStage::Idle,
                SubmissionStage::Validating,
                SubmissionStage::CreatingSale,
                SubmissionStage::Failed,
            ]
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(SubmissionStage::CreatingSale.to_string(), "creating the sale");
        assert_eq!(
            SubmissionStage::RecordingDetails.to_string(),
            "recording the sale items"
        );
    }
}
