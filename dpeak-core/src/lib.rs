//! Dpeak core library: density-peak clustering over pairwise distances.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod centers;
mod datasource;
mod delta;
mod density;
mod dpc;
mod error;
mod labels;
mod matrix;
mod points;
mod result;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DpcBuilder, TieBreak},
    datasource::DataSource,
    dpc::Dpc,
    error::{DataSourceError, DataSourceErrorCode, DpcError, DpcErrorCode, Result},
    matrix::DistanceMatrix,
    points::PointSet,
    result::{ClusterId, DpcResult, LabelingViolation},
};
