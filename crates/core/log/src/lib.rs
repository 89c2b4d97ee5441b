mod init;

pub use init::init;
pub use tracing::{debug, error, info, trace, warn};
