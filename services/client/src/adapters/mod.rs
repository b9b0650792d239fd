pub mod http;
pub mod session_file;
pub mod session_memory;
pub mod terminal;

pub use http::HttpMovieApi;
pub use session_file::FileSessionStore;
pub use session_memory::MemorySessionStore;
pub use terminal::TerminalShell;
