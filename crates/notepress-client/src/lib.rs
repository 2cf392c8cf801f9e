//! Talks to note.com on behalf of the compiler.
//!
//! - [`session`]: saved login cookies and their validation
//! - [`http`]: blocking client carrying the editor headers and cookies
//! - [`images`]: [`NoteImageUploader`], the hosted [`ImageBridge`](notepress_engine::ImageBridge)
//! - [`magazines`]: magazine key to numeric id lookup
//! - [`publish`]: the create, save and publish sequence
//!
//! Login itself (obtaining cookies) happens outside this crate; a session
//! file must already exist.

pub mod http;
pub mod images;
pub mod magazines;
pub mod publish;
pub mod session;

pub use http::{HttpClient, HttpError, HttpResponse, Method};
pub use images::{NoteImageUploader, upload_eyecatch};
pub use magazines::{MagazineError, MagazineResolver};
pub use publish::{PublishError, PublishOutcome, PublishRequest, Publisher};
pub use session::{Session, SessionError};

/// Root of the note.com site and API.
pub const NOTE_BASE_URL: &str = "https://note.com";

/// Origin of the note.com editor.
pub const EDITOR_BASE_URL: &str = "https://editor.note.com";
