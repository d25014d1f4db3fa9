pub mod admission;
pub mod board;
pub mod dispatcher;
pub mod editions;
pub mod error;
pub mod locks;
pub mod queue;
pub mod registry;
pub mod summary;

mod seed;

pub use admission::{AdmissionGate, AdmissionReceipt, Admitted, PostSubmission};
pub use board::{ThreadBoard, ThreadTarget};
pub use dispatcher::{encode_event, BroadcastDispatcher, DeliveryReport};
pub use editions::{Edition, EditionService};
pub use error::{BoardError, Result};
pub use locks::ThreadLocks;
pub use queue::{SummaryQueue, SummaryTask};
pub use registry::{ConnectionId, ConnectionRegistry, DeliveryError, Frame, Subscriber};
pub use summary::SummaryService;
