use crate::pipeline::VisualEvent;
use std::fmt::{Display, Formatter};

/// Restricts which events may enter the pending queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Events whose source or target is this component.
    Component(String),
    /// Events carrying this correlation id.
    Fsm(String),
}

impl Filter {
    pub fn admits(&self, event: &VisualEvent) -> bool {
        match self {
            Self::Component(id) => {
                event.source_id.as_deref() == Some(id.as_str())
                    || event.target_id.as_deref() == Some(id.as_str())
            }
            Self::Fsm(id) => event.fsm_id.as_deref() == Some(id.as_str()),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component(id) => write!(f, "component {id}"),
            Self::Fsm(id) => write!(f, "fsm {id}"),
        }
    }
}
