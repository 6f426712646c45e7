//! User parameter selection

pub mod emissivity;
pub mod session;

pub use emissivity::{emissivity_at, emissivity_index, EMISSIVITY_VALUES};
pub use session::{
    ParamGroup, ParameterSession, SessionInput, SessionOutcome, HUD_TEXT_LEN,
};
