pub mod balance;
pub mod event;
pub mod schema;
pub mod triple_barrier;

pub use balance::LabelBalancer;
pub use event::{BarrierType, Event, Outcome, LABEL_COLUMN};
pub use schema::{validate_labels, LabelReport};
pub use triple_barrier::{LabelRun, LabelStats, TripleBarrierLabeler};
