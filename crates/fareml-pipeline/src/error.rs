use fareml_core::TensorError;
use fareml_data::NumericColumn;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error("cannot {0} on an empty dataset")]
    EmptyDataset(&'static str),

    #[error("label column {0} is also listed as a feature")]
    LabelInFeatures(NumericColumn),

    #[error("pipeline for {0} has no feature columns")]
    NoFeatures(NumericColumn),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
