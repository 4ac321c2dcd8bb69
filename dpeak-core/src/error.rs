//! Error types for the dpeak core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row that exceeded the source bounds.
        index: usize,
    },
    /// Compared vectors had different dimensions.
    #[error("dimension mismatch: row {row} has {got} coordinates, expected {expected}")]
    DimensionMismatch {
        /// Row whose width disagreed with the first row.
        row: usize,
        /// Number of coordinates found in the offending row.
        got: usize,
        /// Number of coordinates established by the first row.
        expected: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("row {row} contains a non-finite coordinate at column {column}: {value}")]
    NonFinite {
        /// Row containing the offending coordinate.
        row: usize,
        /// Column of the offending coordinate.
        column: usize,
        /// The non-finite value itself.
        value: f32,
    },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
    /// Data source rows must have positive dimension.
    #[error("data source vectors must have positive dimension")]
    ZeroDimension,
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// Compared vectors had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "DATA_SOURCE_DIMENSION_MISMATCH",
        /// A coordinate was NaN or infinite.
        NonFinite => NonFinite { .. } => "DATA_SOURCE_NON_FINITE",
        /// Data source contained no rows.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source rows must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
    }
}

/// Error type produced when configuring or running [`crate::Dpc`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DpcError {
    /// The requested number of clusters must be at least one.
    #[error("cluster_count must be at least 1 (got {got})")]
    InvalidClusterCount {
        /// The invalid cluster count supplied by the caller.
        got: usize,
    },
    /// The cutoff quantile must lie in `[0, 1)`.
    #[error("cutoff_quantile must lie in [0, 1) (got {got})")]
    InvalidCutoffQuantile {
        /// The invalid quantile supplied by the caller.
        got: f64,
    },
    /// The supplied [`crate::DataSource`] contained no items.
    #[error("data source `{data_source}` contains no items")]
    EmptySource {
        /// Identifier for the empty data source.
        data_source: Arc<str>,
    },
    /// The [`crate::DataSource`] held fewer items than the pipeline needs.
    #[error("data source `{data_source}` has {items} items but at least {required} are required")]
    InsufficientItems {
        /// Identifier for the data source that lacked sufficient items.
        data_source: Arc<str>,
        /// Number of items available in the data source.
        items: usize,
        /// Minimum number of items the pipeline requires.
        required: usize,
    },
    /// More clusters were requested than items exist.
    #[error("data source `{data_source}` has {items} items but {cluster_count} clusters were requested")]
    ClusterCountExceedsItems {
        /// Identifier for the undersized data source.
        data_source: Arc<str>,
        /// Number of items available in the data source.
        items: usize,
        /// Number of clusters requested by the caller.
        cluster_count: usize,
    },
    /// A [`crate::DataSource`] operation failed while running the pipeline.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error bubbled up by the pipeline.
        error: DataSourceError,
    },
    /// An internal pipeline invariant was violated, indicating a logic error.
    #[error("pipeline invariant violated while {context}")]
    InvariantViolation {
        /// Human-readable context describing the violated invariant.
        context: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`DpcError`] variants.
    enum DpcErrorCode for DpcError {
        /// The requested number of clusters must be at least one.
        InvalidClusterCount => InvalidClusterCount { .. } => "DPC_INVALID_CLUSTER_COUNT",
        /// The cutoff quantile must lie in `[0, 1)`.
        InvalidCutoffQuantile => InvalidCutoffQuantile { .. } => "DPC_INVALID_CUTOFF_QUANTILE",
        /// The supplied [`crate::DataSource`] contained no items.
        EmptySource => EmptySource { .. } => "DPC_EMPTY_SOURCE",
        /// The [`crate::DataSource`] held fewer items than the pipeline needs.
        InsufficientItems => InsufficientItems { .. } => "DPC_INSUFFICIENT_ITEMS",
        /// More clusters were requested than items exist.
        ClusterCountExceedsItems => ClusterCountExceedsItems { .. } => "DPC_CLUSTER_COUNT_EXCEEDS_ITEMS",
        /// A [`crate::DataSource`] operation failed while running the pipeline.
        DataSourceFailure => DataSource { .. } => "DPC_DATA_SOURCE_FAILURE",
        /// An internal pipeline invariant was violated.
        InvariantViolation => InvariantViolation { .. } => "DPC_INVARIANT_VIOLATION",
    }
}

impl DpcError {
    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in a [`crate::DataSource`].
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DpcError>;
