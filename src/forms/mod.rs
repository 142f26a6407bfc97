//! The data-driven form engine: declarative field descriptors, per-form
//! state with a submission status machine, and the controller that turns a
//! form into a multipart API request.

pub mod config;
pub mod field;
pub mod store;
pub mod submit;

pub use config::{ApiContext, ColumnGroup, FormConfig, FormId};
pub use field::{FieldDescriptor, FieldValue, ImageSource, InputKind};
pub use store::{ActionState, FormChange, FormEvent, FormState, FormStore, FormStoreError};
pub use submit::{GENERIC_FAILURE_MESSAGE, SubmissionController, SubmitOutcome};
