pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod scorer;
pub mod session;
pub mod storage;
pub mod text;
pub mod view;
// cmd and reports belong to the binary crate.

pub use config::{RankingMode, TallyConfig};
pub use error::{TallyError, TallyResult};
pub use session::{Notice, NoticeLevel, Session};
