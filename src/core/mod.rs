pub mod cpi;
pub mod enrolled;
pub mod etl;
pub mod join;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod source;

pub use crate::domain::model::{
    CpiAggregate, EnrolledAggregate, MergedRow, RawRow, RawTable, SourceTables, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, EtlPipeline, Storage, TabularSource};
pub use crate::utils::error::Result;
