/// Errors from building or advancing an orbital system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrbitError {
    #[error("no body with id {0}")]
    UnknownBody(usize),

    #[error("body '{body}' names unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    #[error("body '{0}' cannot orbit itself")]
    SelfParent(String),

    #[error("a body named '{0}' already exists")]
    DuplicateName(String),

    #[error("parent chain of '{0}' loops back on itself")]
    Cycle(String),

    #[error("a closed spline needs at least {min} points, got {count}")]
    TooFewPoints { count: usize, min: usize },
}
