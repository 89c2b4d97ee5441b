use crate::slot::SlotId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no slot at {0}")]
    UnknownSlot(SlotId),
    #[error("{0} is not active")]
    InactiveSlot(SlotId),
}
