//! Ingestion core: pure state machine, view-model helpers and the
//! observable selection store.
mod effect;
mod msg;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use selection::{DropPayload, SelectionChanged, SelectionHolder, SubscriptionId};
pub use state::{AppState, JobId, JobPhase, JobResultKind, COMPLETION_NOTICE};
pub use update::update;
pub use view_model::{AppViewModel, JobView};
