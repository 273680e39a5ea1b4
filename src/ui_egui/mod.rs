pub mod drag;
pub mod events;
pub mod feedback;
pub mod hover;
pub mod interaction;
pub mod layout;

pub use drag::{DragDirection, InteractionState, Session, SessionKind};
pub use events::{CandidatePreview, CellTarget, EventLog, GridEvent, GridEventSink, MoveCommit, PointerEvent};
pub use hover::{HoverCoordinator, PreviewKey};
pub use interaction::{InteractionController, SessionOutcome};
pub use layout::GridLayout;
