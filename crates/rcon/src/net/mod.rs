mod endpoint;
mod protocol;
mod stats;

pub use endpoint::{DEFAULT_RECV_BUFFER_SIZE, RconEndpoint};
pub use protocol::{OOB_HEADER, build_frame, find_header};
pub use stats::NetworkStats;
