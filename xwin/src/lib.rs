//! Binds Rust objects to Win32 window handles.
//!
//! A [`NativeWindow`] owns exactly one window handle. It swaps the window's
//! procedure for its own, hands every message to a [`WindowHandler`] first,
//! and destroys the window exactly once. Windows come either from a
//! [`WindowFactory`], which binds them from their first message, or from
//! [`NativeWindow::attach`], which takes over a window that already exists.
//!
//! The OS calls themselves go through [`WindowApi`]. On Windows, [`User32`]
//! implements it.

mod api;
mod error;
mod factory;
mod msg;
mod registry;
mod types;
#[cfg(windows)]
mod win32;
mod window;

#[cfg(test)]
mod fake;

pub use api::WindowApi;
pub use error::{Error, Result};
pub use factory::{class_style, ClassBase, CreateWindow, WindowClass, WindowFactory};
pub use msg::*;
pub use types::*;
#[cfg(windows)]
pub use win32::User32;
pub use window::{BindingState, NativeWindow, WindowHandler};

use core::marker::PhantomData;
use static_assertions::assert_not_impl_any;

/// A window bound through `user32.dll`.
#[cfg(windows)]
pub type Window<H = ()> = NativeWindow<User32, H>;

#[cfg(windows)]
assert_not_impl_any!(Window<()>: Send, Sync);

/// Pins a value to the thread that created it. Windows must only be touched
/// from the thread that owns their message queue.
#[derive(Clone)]
struct StuckToThread {
    #[cfg(debug_assertions)]
    thread_id: std::thread::ThreadId,
    not_send: PhantomData<*mut u8>,
}

assert_not_impl_any!(StuckToThread: Sync, Send, Copy);

impl StuckToThread {
    pub fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            thread_id: std::thread::current().id(),
            not_send: PhantomData,
        }
    }

    pub fn check(&self) {
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(
                std::thread::current().id(),
                self.thread_id,
                "Expected this object to be used only on the thread that created it."
            );
        }
    }
}
