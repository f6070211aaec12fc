//! Orchestrator for the two source transforms and the year join.
//!
//! ```text
//!            load_enrolled            load_cpi
//!   Empty ──────────────► EnrolledLoaded ─────┐
//!     │                                       ▼
//!     └──► CpiLoaded ──────────────────► BothLoaded ──merge──► Merged
//!  load_cpi        load_enrolled
//! ```
//!
//! Every other call is a `PreconditionError`. Stage outputs are never
//! recomputed for the lifetime of a `Pipeline`. A pipeline has a single
//! owner; every operation takes `&mut self` and there is no internal locking.

use crate::core::cpi::CpiTransform;
use crate::core::enrolled::EnrolledStudentsTransform;
use crate::core::join::join_on_year;
use crate::domain::model::{CpiAggregate, EnrolledAggregate, MergedRow, TransformResult};
use crate::domain::ports::TabularSource;
use crate::utils::error::{EtlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Empty,
    EnrolledLoaded,
    CpiLoaded,
    BothLoaded,
    Merged,
}

#[derive(Debug, Default)]
enum PipelineState {
    #[default]
    Empty,
    EnrolledLoaded {
        enrolled: Vec<EnrolledAggregate>,
    },
    CpiLoaded {
        cpi: Vec<CpiAggregate>,
    },
    BothLoaded {
        enrolled: Vec<EnrolledAggregate>,
        cpi: Vec<CpiAggregate>,
    },
    Merged {
        enrolled: Vec<EnrolledAggregate>,
        cpi: Vec<CpiAggregate>,
        merged: Vec<MergedRow>,
    },
}

impl PipelineState {
    fn stage(&self) -> PipelineStage {
        match self {
            PipelineState::Empty => PipelineStage::Empty,
            PipelineState::EnrolledLoaded { .. } => PipelineStage::EnrolledLoaded,
            PipelineState::CpiLoaded { .. } => PipelineStage::CpiLoaded,
            PipelineState::BothLoaded { .. } => PipelineStage::BothLoaded,
            PipelineState::Merged { .. } => PipelineStage::Merged,
        }
    }
}

pub struct Pipeline<T: TabularSource> {
    source: T,
    enrolled_source: String,
    cpi_source: String,
    enrolled_transform: EnrolledStudentsTransform,
    cpi_transform: CpiTransform,
    state: PipelineState,
}

impl<T: TabularSource> Pipeline<T> {
    /// Source identifiers are forwarded to `source` unopened.
    pub fn new(source: T, enrolled_source: &str, cpi_source: &str) -> Self {
        Self {
            source,
            enrolled_source: enrolled_source.to_string(),
            cpi_source: cpi_source.to_string(),
            enrolled_transform: EnrolledStudentsTransform::default(),
            cpi_transform: CpiTransform::default(),
            state: PipelineState::Empty,
        }
    }

    pub fn with_transforms(
        mut self,
        enrolled: EnrolledStudentsTransform,
        cpi: CpiTransform,
    ) -> Self {
        self.enrolled_transform = enrolled;
        self.cpi_transform = cpi;
        self
    }

    pub fn stage(&self) -> PipelineStage {
        self.state.stage()
    }

    pub fn load_enrolled(&mut self) -> Result<()> {
        if !matches!(self.stage(), PipelineStage::Empty | PipelineStage::CpiLoaded) {
            return Err(EtlError::precondition(
                "enrolled students data is already loaded",
            ));
        }

        tracing::info!("📥 Loading enrolled students from {}", self.enrolled_source);
        let raw = self.source.load(&self.enrolled_source)?;
        let enrolled = self.enrolled_transform.transform(&raw)?;
        tracing::info!("📊 Enrolled students aggregated into {} years", enrolled.len());

        let (next, outcome) = match std::mem::take(&mut self.state) {
            PipelineState::Empty => (PipelineState::EnrolledLoaded { enrolled }, Ok(())),
            PipelineState::CpiLoaded { cpi } => {
                (PipelineState::BothLoaded { enrolled, cpi }, Ok(()))
            }
            other => (
                other,
                Err(EtlError::precondition("enrolled students data is already loaded")),
            ),
        };
        self.state = next;
        outcome
    }

    pub fn load_cpi(&mut self) -> Result<()> {
        if !matches!(self.stage(), PipelineStage::Empty | PipelineStage::EnrolledLoaded) {
            return Err(EtlError::precondition("CPI data is already loaded"));
        }

        tracing::info!("📥 Loading consumer price index from {}", self.cpi_source);
        let raw = self.source.load(&self.cpi_source)?;
        let cpi = self.cpi_transform.transform(&raw)?;
        tracing::info!("📊 CPI series has {} rows", cpi.len());

        let (next, outcome) = match std::mem::take(&mut self.state) {
            PipelineState::Empty => (PipelineState::CpiLoaded { cpi }, Ok(())),
            PipelineState::EnrolledLoaded { enrolled } => {
                (PipelineState::BothLoaded { enrolled, cpi }, Ok(()))
            }
            other => (other, Err(EtlError::precondition("CPI data is already loaded"))),
        };
        self.state = next;
        outcome
    }

    pub fn merge(&mut self) -> Result<()> {
        let (next, outcome) = match std::mem::take(&mut self.state) {
            PipelineState::BothLoaded { enrolled, cpi } => {
                let merged = join_on_year(&cpi, &enrolled);
                tracing::info!("🔗 Merged table has {} rows", merged.len());
                (
                    PipelineState::Merged {
                        enrolled,
                        cpi,
                        merged,
                    },
                    Ok(()),
                )
            }
            merged @ PipelineState::Merged { .. } => {
                (merged, Err(EtlError::precondition("merge has already run")))
            }
            other => (
                other,
                Err(EtlError::precondition("both sources must be loaded first")),
            ),
        };
        self.state = next;
        outcome
    }

    pub fn result(&self) -> Result<&[MergedRow]> {
        match &self.state {
            PipelineState::Merged { merged, .. } => Ok(merged),
            _ => Err(EtlError::precondition("merge has not run")),
        }
    }

    pub fn enrolled(&self) -> Option<&[EnrolledAggregate]> {
        match &self.state {
            PipelineState::EnrolledLoaded { enrolled }
            | PipelineState::BothLoaded { enrolled, .. }
            | PipelineState::Merged { enrolled, .. } => Some(enrolled),
            _ => None,
        }
    }

    pub fn cpi(&self) -> Option<&[CpiAggregate]> {
        match &self.state {
            PipelineState::CpiLoaded { cpi }
            | PipelineState::BothLoaded { cpi, .. }
            | PipelineState::Merged { cpi, .. } => Some(cpi),
            _ => None,
        }
    }

    /// Consumes a merged pipeline into all three of its tables.
    pub fn into_transform_result(self) -> Result<TransformResult> {
        match self.state {
            PipelineState::Merged {
                enrolled,
                cpi,
                merged,
            } => Ok(TransformResult {
                merged,
                enrolled,
                cpi,
            }),
            _ => Err(EtlError::precondition("merge has not run")),
        }
    }
}
