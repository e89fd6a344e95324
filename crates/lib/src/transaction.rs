//! Uniform outcomes for mutating operations.
//!
//! Every mutation in the framework (a single-key offer through a
//! [`crate::processor::ValueProcessor`], a whole-bundle write through a
//! [`crate::processor::DataProcessor`], a container fill) reports a
//! [`DataTransactionResult`]: what was applied, what was replaced, what was
//! rejected, and whether the operation as a whole succeeded.
//!
//! Partial failure is data, not an error: a bulk operation that applied some
//! keys and rejected others returns a `Failure` result with both sets
//! populated, and already-applied keys are not rolled back unless the
//! processor guaranteed atomic application.

use std::fmt;

use crate::value::ValueSnapshot;

/// Overall outcome of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    /// Every offered value was applied
    Success,
    /// At least one offered value was rejected
    Failure,
    /// The operation failed for an unexpected reason; consult the
    /// rejected set for the values that did not apply
    Error,
    /// An event consumer cancelled the operation before it applied
    Cancelled,
    /// The target holder does not support this attribute family at all.
    /// This is an expected outcome, not an error.
    NoData,
}

/// The outcome record returned by every mutating operation.
///
/// `successful` and `rejected` are disjoint by construction; a `NoData`
/// result carries empty sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTransactionResult {
    result_type: ResultType,
    successful: Vec<ValueSnapshot>,
    replaced: Vec<ValueSnapshot>,
    rejected: Vec<ValueSnapshot>,
}

impl DataTransactionResult {
    /// An empty successful result
    pub fn successful() -> Self {
        Self::builder().result(ResultType::Success).build()
    }

    /// A successful result recording one applied value
    pub fn success_result(applied: ValueSnapshot) -> Self {
        Self::builder()
            .result(ResultType::Success)
            .success(applied)
            .build()
    }

    /// A successful result recording one applied value and the value it replaced
    pub fn success_replace(applied: ValueSnapshot, replaced: ValueSnapshot) -> Self {
        Self::builder()
            .result(ResultType::Success)
            .success(applied)
            .replace(replaced)
            .build()
    }

    /// A failure recording one rejected value
    pub fn fail_result(rejected: ValueSnapshot) -> Self {
        Self::builder()
            .result(ResultType::Failure)
            .reject(rejected)
            .build()
    }

    /// The uniform "holder does not support this attribute family" outcome
    pub fn fail_no_data() -> Self {
        Self::builder().result(ResultType::NoData).build()
    }

    /// An error recording one value that did not apply
    pub fn error_result(rejected: ValueSnapshot) -> Self {
        Self::builder()
            .result(ResultType::Error)
            .reject(rejected)
            .build()
    }

    /// Starts an empty builder
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The overall outcome
    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    /// True for `Success` results
    pub fn is_successful(&self) -> bool {
        self.result_type == ResultType::Success
    }

    /// Values that were applied
    pub fn successful_data(&self) -> &[ValueSnapshot] {
        &self.successful
    }

    /// Prior values that applied values overwrote
    pub fn replaced_data(&self) -> &[ValueSnapshot] {
        &self.replaced
    }

    /// Values that were not applied
    pub fn rejected_data(&self) -> &[ValueSnapshot] {
        &self.rejected
    }

    /// Merges two results.
    ///
    /// The sets concatenate pairwise; the merged outcome is `Success` only
    /// when both inputs were successful, `Failure` otherwise.
    pub fn merge(self, other: Self) -> Self {
        Builder::new().absorb_result(self).absorb_result(other).build()
    }
}

impl fmt::Display for DataTransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} (applied {}, replaced {}, rejected {})",
            self.result_type,
            self.successful.len(),
            self.replaced.len(),
            self.rejected.len()
        )
    }
}

/// Accumulates snapshots across the key-level operations of one logical
/// bulk mutation.
#[derive(Debug, Default)]
pub struct Builder {
    result_type: Option<ResultType>,
    successful: Vec<ValueSnapshot>,
    replaced: Vec<ValueSnapshot>,
    rejected: Vec<ValueSnapshot>,
}

impl Builder {
    /// Starts an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the overall outcome
    pub fn result(mut self, result_type: ResultType) -> Self {
        self.result_type = Some(result_type);
        self
    }

    /// Records an applied value.
    ///
    /// If the same snapshot was previously rejected it is promoted; the
    /// successful and rejected sets stay disjoint.
    pub fn success(mut self, snapshot: ValueSnapshot) -> Self {
        self.rejected.retain(|s| s != &snapshot);
        if !self.successful.contains(&snapshot) {
            self.successful.push(snapshot);
        }
        self
    }

    /// Records a prior value overwritten by an applied value
    pub fn replace(mut self, snapshot: ValueSnapshot) -> Self {
        self.replaced.push(snapshot);
        self
    }

    /// Records a value that was not applied
    pub fn reject(mut self, snapshot: ValueSnapshot) -> Self {
        if !self.successful.contains(&snapshot) && !self.rejected.contains(&snapshot) {
            self.rejected.push(snapshot);
        }
        self
    }

    /// Folds another result's sets into this builder.
    ///
    /// The builder's outcome becomes `Failure` as soon as any absorbed
    /// result is not successful.
    pub fn absorb_result(mut self, other: DataTransactionResult) -> Self {
        if !other.is_successful() {
            self.result_type = Some(ResultType::Failure);
        } else if self.result_type.is_none() {
            self.result_type = Some(ResultType::Success);
        }
        for snapshot in other.successful {
            self = self.success(snapshot);
        }
        for snapshot in other.replaced {
            self = self.replace(snapshot);
        }
        for snapshot in other.rejected {
            self = self.reject(snapshot);
        }
        self
    }

    /// Builds the result; an unset outcome defaults to `Success`
    pub fn build(self) -> DataTransactionResult {
        DataTransactionResult {
            result_type: self.result_type.unwrap_or(ResultType::Success),
            successful: self.successful,
            replaced: self.replaced,
            rejected: self.rejected,
        }
    }
}
