//! Credential entry dialog
//!
//! An explicit state machine for one create/edit session: `session` holds the
//! form state, `validation` and `view` derive from it, `payload` builds the
//! request body, and `controller` drives the open/save/cancel workflow through
//! an injected `CredentialService`.

pub mod controller;
pub mod payload;
pub mod session;
pub mod validation;
pub mod view;

pub use controller::{
    update, view, CredentialDialog, DialogContext, DialogEvent, DialogState, Msg, Notification,
    NotificationLevel,
};
pub use payload::build_payload;
pub use session::{
    AuthorizationMode, CredentialForm, DialogMode, DialogSession, FieldErrors, OpenSignal,
    RequestState, SessionId, TextField,
};
pub use validation::{can_save, FieldError};
pub use view::{Autofocus, DialogView, FieldId, FieldView, InputKind};
