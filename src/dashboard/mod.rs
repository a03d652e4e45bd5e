pub mod aggregates;
pub mod deletion;
pub mod form;
pub mod format;
pub mod notify;
pub mod repository;
pub mod router;

pub use aggregates::Aggregates;
pub use deletion::{DeletionFlow, DeletionState};
pub use form::{FieldInput, FormMode, FormSession, NumericField, SubmitError, Submitted, TextField};
pub use notify::{Level, Notification};
pub use repository::{CommittedCollection, LoadOutcome, VillaRepository};
pub use router::{View, ViewRouter};
