/// Errors raised by mesh sinks and exporters.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("mesh section {index} does not exist (sink holds {count})")]
    SectionOutOfRange { index: usize, count: usize },

    #[error("section {index} has {indices} triangle indices, not a multiple of 3")]
    MalformedTriangles { index: usize, indices: usize },

    #[error("failed to write mesh: {0}")]
    Io(#[from] std::io::Error),
}
