use crate::WindowHandle;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An OS call failed. Carries the code reported by `GetLastError`.
    Windows(u32),
    /// The window has already been released.
    Disposed,
    /// No window handle has been bound yet.
    NotInitialized,
    AlreadyInitialized,
    /// Another live binding already owns this handle.
    AlreadyBound(WindowHandle),
    /// The window's message queue belongs to another thread.
    ForeignThread(WindowHandle),
    /// The OS did not report a window procedure to fall back on.
    NullProcedure,
    /// The window was created, but its binding never saw the creation message.
    CreationIncomplete,
}

pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Windows(code) => write!(f, "windowing call failed with error {code}"),
            Self::Disposed => write!(f, "the window has already been disposed"),
            Self::NotInitialized => write!(f, "the window has not been bound to a handle"),
            Self::AlreadyInitialized => write!(f, "the window has already been initialized"),
            Self::AlreadyBound(handle) => write!(f, "window {handle:?} is already bound"),
            Self::ForeignThread(handle) => {
                write!(f, "window {handle:?} is owned by another thread")
            }
            Self::NullProcedure => write!(f, "no base window procedure could be captured"),
            Self::CreationIncomplete => {
                write!(f, "the window was created without delivering its creation message")
            }
        }
    }
}

impl std::error::Error for Error {}
