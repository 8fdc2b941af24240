//! # Sale Form State
//!
//! The metadata the cashier fills in next to the cart, plus the flag that
//! keeps a second submission from starting while one is in flight.
//!
//! While the flag is up, cart and form edits are refused with `BUSY`. An
//! edit checks the flag under the lock it mutates, and a submission raises
//! the flag before it takes either lock, so every edit either lands before
//! the snapshot or is refused. Nothing is lost when the cart is cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use salesys_core::SaleMetadata;

use crate::error::ApiError;

pub(crate) const SUBMISSION_IN_PROGRESS: &str =
    "A sale is being submitted; wait for it to finish";

#[derive(Debug, Default)]
pub struct SaleFormState {
    meta: Mutex<SaleMetadata>,
    submitting: AtomicBool,
}

impl SaleFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meta<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SaleMetadata) -> R,
    {
        let meta = self.meta.lock().expect("Sale form mutex poisoned");
        f(&meta)
    }

    pub fn with_meta_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SaleMetadata) -> R,
    {
        let mut meta = self.meta.lock().expect("Sale form mutex poisoned");
        f(&mut meta)
    }

    /// Mutates the form unless a submission is running.
    pub fn edit<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut SaleMetadata) -> R,
    {
        let mut meta = self.meta.lock().expect("Sale form mutex poisoned");
        if self.is_submitting() {
            return Err(ApiError::busy(SUBMISSION_IN_PROGRESS));
        }
        Ok(f(&mut meta))
    }

    /// Marks a submission as running. `None` if one already is.
    pub fn try_begin_submission(&self) -> Option<SubmissionGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard { form: self })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag when dropped, whatever the outcome.
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    form: &'a SaleFormState,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.form.submitting.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesys_core::PaymentMethod;

    #[test]
    fn test_single_submission_at_a_time() {
        let form = SaleFormState::new();

        let guard = form.try_begin_submission();
        assert!(guard.is_some());
        assert!(form.is_submitting());
        assert!(form.try_begin_submission().is_none());

        drop(guard);
        assert!(!form.is_submitting());
        assert!(form.try_begin_submission().is_some());
    }

    #[test]
    fn test_edits_refused_while_submitting() {
        let form = SaleFormState::new();

        let guard = form.try_begin_submission().unwrap();
        let err = form
            .edit(|meta| meta.set_notes(Some("late".to_string())))
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Busy);
        assert_eq!(form.with_meta(|meta| meta.notes.clone()), None);

        drop(guard);
        form.edit(|meta| meta.set_notes(Some("late".to_string())))
            .unwrap();
        assert_eq!(
            form.with_meta(|meta| meta.notes.clone()),
            Some("late".to_string())
        );
    }

    #[test]
    fn test_metadata_updates() {
        let form = SaleFormState::new();
        form.with_meta_mut(|meta| meta.set_payment_method(Some(PaymentMethod::Transfer)));

        assert_eq!(
            form.with_meta(|meta| meta.payment_method),
            Some(PaymentMethod::Transfer)
        );
    }
}
