pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::TaskflowError;
pub use result::TaskflowResult;
pub use traits::{
    AllowAll, Authorizer, Clock, EmptyDirectory, FixedClock, LabelDirectory, ReadOnly,
    ResourceKind, SystemClock,
};
