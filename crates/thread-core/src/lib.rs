pub mod error;
pub mod models;
pub mod render;
pub mod report;
pub mod session;
pub mod thread;
pub mod traits;

pub use error::{Result, ThreadError};
pub use models::*;
pub use render::{avatar_size, format_comment_date, CommentList, Renderer};
pub use report::{FailureReporter, LogReporter};
pub use session::{CookieJar, SessionState, TOKEN_COOKIE};
pub use thread::CommentThreadClient;
pub use traits::{CommentSource, Page, RenderTarget};
