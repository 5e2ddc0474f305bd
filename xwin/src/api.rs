//! The OS windowing service, as seen by a binding.
//!
//! Each method is one call into the windowing subsystem. Implementations
//! forward arguments unchanged and report results unchanged: no retries, no
//! caching, no translation of error codes beyond wrapping them in
//! [`Error::Windows`](crate::Error::Windows).

use crate::factory::{CreateWindow, WindowClass};
use crate::{
    InsertAfter, LResult, Message, PosFlags, Rect, Result, ShowCommand, WindowHandle,
    WindowLongIndex, WindowProcedure,
};

pub trait WindowApi: Clone + 'static {
    fn destroy_window(&self, hwnd: WindowHandle) -> Result<()>;

    fn get_window_long(&self, hwnd: WindowHandle, index: WindowLongIndex) -> Result<isize>;

    /// Returns the previous value of the field.
    fn set_window_long(
        &self,
        hwnd: WindowHandle,
        index: WindowLongIndex,
        value: isize,
    ) -> Result<isize>;

    fn set_window_text(&self, hwnd: WindowHandle, text: &str) -> Result<()>;

    #[allow(clippy::too_many_arguments)]
    fn set_window_pos(
        &self,
        hwnd: WindowHandle,
        insert_after: InsertAfter,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: PosFlags,
    ) -> Result<()>;

    fn get_window_rect(&self, hwnd: WindowHandle) -> Result<Rect>;

    fn get_client_rect(&self, hwnd: WindowHandle) -> Result<Rect>;

    /// Returns whether the window was previously visible.
    fn show_window(&self, hwnd: WindowHandle, command: ShowCommand) -> bool;

    /// The thread that owns the window's message queue.
    fn window_thread(&self, hwnd: WindowHandle) -> Result<u32>;

    fn current_thread(&self) -> u32;

    fn call_window_proc(&self, procedure: WindowProcedure, message: Message) -> LResult;

    /// The procedure a binding installs into `GWLP_WNDPROC`.
    fn instance_procedure(&self) -> WindowProcedure;

    /// The OS default window procedure.
    fn default_procedure(&self) -> WindowProcedure;

    /// Pulls the base procedure out of a `WM_NCCREATE` payload, if the window
    /// was created by a [`WindowFactory`](crate::WindowFactory).
    fn creation_base_procedure(&self, message: &Message) -> Option<WindowProcedure>;

    /// Registers a class whose procedure routes new windows to their pending
    /// binding. Returns the procedure that windows of the class fall back on.
    fn register_class(&self, class: &WindowClass) -> Result<WindowProcedure>;

    /// Creates a window of a class registered through `register_class`. The
    /// creation payload carries `base` to the window's binding.
    fn create_window(
        &self,
        class_name: &str,
        desc: &CreateWindow,
        base: WindowProcedure,
    ) -> Result<WindowHandle>;
}
