//! Binds a Rust object to one native window and interposes on its window
//! procedure.
//!
//! A [`NativeWindow`] starts out unbound. It becomes bound either when the
//! OS delivers `WM_NCCREATE` for a window made by a
//! [`WindowFactory`](crate::WindowFactory), or when it is attached to a
//! window that already exists. Binding captures the window's current
//! procedure, installs the crate's own procedure in its place, and from then
//! on every message goes through [`WindowHandler::dispatch`] first.
//!
//! The window is destroyed exactly once: by [`NativeWindow::dispose`], by
//! `Drop` if nobody disposed it, or by the OS itself, in which case the
//! binding only records that the handle is gone.

use crate::registry::{self, Bounced};
use crate::{
    Error, InsertAfter, LParam, LResult, Message, PosFlags, Rect, Result, ShowCommand,
    StuckToThread, WParam, WindowApi, WindowFactory, WindowHandle, WindowLongIndex,
    WindowProcedure, WM_NCCREATE, WM_NCDESTROY,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, trace, warn};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BindingState {
    Unbound,
    Initialized,
    Disposed,
}

/// The overridable part of a window.
///
/// Both hooks run synchronously inside the window procedure, on the thread
/// that owns the window.
pub trait WindowHandler<A: WindowApi>: Sized + 'static {
    /// Called once the window procedure has been swapped.
    fn on_ready(&self, _window: &NativeWindow<A, Self>) {}

    /// Handles one message. Anything not handled here should be passed to
    /// [`NativeWindow::call_base`].
    fn dispatch(&self, window: &NativeWindow<A, Self>, message: Message) -> LResult {
        window.call_base(message)
    }
}

impl<A: WindowApi> WindowHandler<A> for () {}

/// Binding capability used by whoever creates windows. Ordinary callers only
/// ever see the operational methods on [`NativeWindow`].
pub(crate) trait WindowInitializable<A: WindowApi> {
    fn initialize(&self, hwnd: WindowHandle, base: Option<WindowProcedure>) -> Result<()>;

    fn set_factory(&self, factory: Weak<WindowFactory<A>>);

    /// The procedure of the window's class, for messages that arrive before
    /// the window is bound.
    fn set_class_base(&self, base: WindowProcedure);
}

pub struct NativeWindow<A: WindowApi, H: WindowHandler<A> = ()> {
    api: A,
    handler: H,
    me: Weak<NativeWindow<A, H>>,
    stuck: StuckToThread,
    state: Cell<BindingState>,
    handle: Cell<Option<WindowHandle>>,
    base_procedure: Cell<Option<WindowProcedure>>,
    class_base: Cell<Option<WindowProcedure>>,
    factory: Cell<Weak<WindowFactory<A>>>,
}

impl<A: WindowApi, H: WindowHandler<A>> NativeWindow<A, H> {
    /// Creates an unbound window object.
    pub fn new(api: A, handler: H) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            api,
            handler,
            me: me.clone(),
            stuck: StuckToThread::new(),
            state: Cell::new(BindingState::Unbound),
            handle: Cell::new(None),
            base_procedure: Cell::new(None),
            class_base: Cell::new(None),
            factory: Cell::new(Weak::new()),
        })
    }

    /// Takes over an existing window. Its current procedure becomes the base
    /// procedure.
    pub fn attach(api: A, hwnd: WindowHandle, handler: H) -> Result<Rc<Self>> {
        let window = Self::new(api, handler);
        window.initialize(hwnd, None)?;
        Ok(window)
    }

    pub fn handle(&self) -> Option<WindowHandle> {
        self.handle.get()
    }

    pub fn base_procedure(&self) -> Option<WindowProcedure> {
        self.base_procedure.get()
    }

    pub fn state(&self) -> BindingState {
        self.state.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.get() == BindingState::Disposed
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The factory that created this window, if it is still alive.
    pub fn factory(&self) -> Option<Rc<WindowFactory<A>>> {
        let factory = self.factory.take();
        let result = factory.upgrade();
        self.factory.set(factory);
        result
    }

    /// Destroys the window. Calling this again does nothing.
    pub fn dispose(&self) -> Result<()> {
        match self.state.replace(BindingState::Disposed) {
            BindingState::Disposed => Ok(()),
            BindingState::Unbound => {
                debug!("disposing a window that was never bound");
                Ok(())
            }
            BindingState::Initialized => {
                let hwnd = self.handle.get().ok_or(Error::NotInitialized)?;
                // Teardown messages go straight to the base procedure from here on.
                registry::detach(hwnd);
                // A window that survived keeps its detached entry, so its
                // messages still reach the base procedure.
                self.api.destroy_window(hwnd)?;
                registry::release(hwnd);
                debug!("{hwnd:?}: disposed");
                Ok(())
            }
        }
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        let hwnd = self.live_handle()?;
        self.api.set_window_text(hwnd, text)
    }

    pub fn set_size(&self, width: i32, height: i32) -> Result<()> {
        let hwnd = self.live_handle()?;
        self.api.set_window_pos(
            hwnd,
            InsertAfter::Top,
            -1,
            -1,
            width,
            height,
            PosFlags::NOACTIVATE | PosFlags::NOMOVE | PosFlags::NOZORDER,
        )
    }

    pub fn set_position(&self, x: i32, y: i32) -> Result<()> {
        let hwnd = self.live_handle()?;
        self.api.set_window_pos(
            hwnd,
            InsertAfter::Top,
            x,
            y,
            -1,
            -1,
            PosFlags::NOACTIVATE | PosFlags::NOSIZE | PosFlags::NOZORDER,
        )
    }

    pub fn set_bounds(&self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        let hwnd = self.live_handle()?;
        self.api.set_window_pos(
            hwnd,
            InsertAfter::Top,
            x,
            y,
            width,
            height,
            PosFlags::NOACTIVATE | PosFlags::NOZORDER,
        )
    }

    pub fn set_bounds_with(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: PosFlags,
    ) -> Result<()> {
        let hwnd = self.live_handle()?;
        self.api
            .set_window_pos(hwnd, InsertAfter::Top, x, y, width, height, flags)
    }

    pub fn set_placement(
        &self,
        insert_after: InsertAfter,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: PosFlags,
    ) -> Result<()> {
        let hwnd = self.live_handle()?;
        self.api
            .set_window_pos(hwnd, insert_after, x, y, width, height, flags)
    }

    /// The window rectangle, in screen coordinates.
    pub fn get_position(&self) -> Result<Rect> {
        let hwnd = self.live_handle()?;
        self.api.get_window_rect(hwnd)
    }

    pub fn get_client_rect(&self) -> Result<Rect> {
        let hwnd = self.live_handle()?;
        self.api.get_client_rect(hwnd)
    }

    /// Returns the previous value.
    pub fn set_long(&self, index: WindowLongIndex, value: isize) -> Result<isize> {
        let hwnd = self.live_handle()?;
        self.api.set_window_long(hwnd, index, value)
    }

    pub fn get_long(&self, index: WindowLongIndex) -> Result<isize> {
        let hwnd = self.live_handle()?;
        self.api.get_window_long(hwnd, index)
    }

    /// Returns whether the window was visible before.
    pub fn show(&self) -> Result<bool> {
        self.set_state(ShowCommand::SHOW)
    }

    pub fn hide(&self) -> Result<bool> {
        self.set_state(ShowCommand::HIDE)
    }

    pub fn set_state(&self, command: ShowCommand) -> Result<bool> {
        let hwnd = self.live_handle()?;
        Ok(self.api.show_window(hwnd, command))
    }

    /// Passes a message to the procedure that was active before this binding
    /// took over. Before binding, that is the class procedure of a
    /// factory-made window, or the OS default procedure.
    pub fn call_base(&self, message: Message) -> LResult {
        let base = self
            .base_procedure
            .get()
            .or(self.class_base.get())
            .unwrap_or_else(|| self.api.default_procedure());
        self.api.call_window_proc(base, message)
    }

    /// The procedure the OS runs for this window.
    ///
    /// `WM_NCCREATE` binds the window, using the base procedure carried in
    /// the creation payload. Every message then goes to the handler's
    /// `dispatch`.
    pub fn procedure_entry_point(
        &self,
        hwnd: WindowHandle,
        message: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        let msg = Message::new(hwnd, message, wparam, lparam);

        if self.state.get() == BindingState::Disposed {
            return self.call_base(msg);
        }

        if message == WM_NCCREATE {
            let base = self.api.creation_base_procedure(&msg);
            if let Err(e) = self.initialize(hwnd, base) {
                error!("{hwnd:?}: could not bind window during creation: {e}");
                // Returning FALSE from WM_NCCREATE makes window creation fail.
                return LResult(0);
            }
            if self.state.get() == BindingState::Disposed {
                // `on_ready` disposed the window; creation cannot go on.
                return LResult(0);
            }
        }

        let result = self.handler.dispatch(self, msg);

        if message == WM_NCDESTROY {
            self.release_destroyed(hwnd);
        }

        result
    }

    fn live_handle(&self) -> Result<WindowHandle> {
        self.stuck.check();
        match self.state.get() {
            BindingState::Initialized => self.handle.get().ok_or(Error::NotInitialized),
            BindingState::Unbound => Err(Error::NotInitialized),
            BindingState::Disposed => Err(Error::Disposed),
        }
    }

    // The OS has destroyed the window on its own; there is nothing left to destroy.
    fn release_destroyed(&self, hwnd: WindowHandle) {
        if self.state.get() == BindingState::Initialized && self.handle.get() == Some(hwnd) {
            self.state.set(BindingState::Disposed);
            registry::release(hwnd);
            debug!("{hwnd:?}: destroyed by the system");
        }
    }
}

impl<A: WindowApi, H: WindowHandler<A>> WindowInitializable<A> for NativeWindow<A, H> {
    fn initialize(&self, hwnd: WindowHandle, base: Option<WindowProcedure>) -> Result<()> {
        self.stuck.check();
        match self.state.get() {
            BindingState::Unbound => {}
            BindingState::Initialized => return Err(Error::AlreadyInitialized),
            BindingState::Disposed => return Err(Error::Disposed),
        }

        if registry::is_bound(hwnd) {
            return Err(Error::AlreadyBound(hwnd));
        }

        // The registry is per thread, and only the owning thread sees the messages.
        if self.api.window_thread(hwnd)? != self.api.current_thread() {
            return Err(Error::ForeignThread(hwnd));
        }

        let base = match base.filter(|base| !base.is_null()) {
            Some(base) => base,
            None => WindowProcedure(self.api.get_window_long(hwnd, WindowLongIndex::WNDPROC)?),
        };
        if base.is_null() {
            return Err(Error::NullProcedure);
        }

        let instance = self.api.instance_procedure();
        if base == instance {
            // Forwarding to ourselves would never terminate.
            return Err(Error::AlreadyBound(hwnd));
        }

        let me: Weak<dyn Bounced> = self.me.clone();
        registry::claim(hwnd, me, base)?;
        self.handle.set(Some(hwnd));
        self.base_procedure.set(Some(base));
        self.state.set(BindingState::Initialized);

        if let Err(e) = self
            .api
            .set_window_long(hwnd, WindowLongIndex::WNDPROC, instance.0)
        {
            registry::release(hwnd);
            self.handle.set(None);
            self.base_procedure.set(None);
            self.state.set(BindingState::Unbound);
            return Err(e);
        }

        debug!("{hwnd:?}: bound, base {base:?}");
        self.handler.on_ready(self);
        Ok(())
    }

    fn set_factory(&self, factory: Weak<WindowFactory<A>>) {
        self.factory.set(factory);
    }

    fn set_class_base(&self, base: WindowProcedure) {
        self.class_base.set(Some(base));
    }
}

impl<A: WindowApi, H: WindowHandler<A>> Bounced for NativeWindow<A, H> {
    fn wndproc(
        &self,
        hwnd: WindowHandle,
        message: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        trace!("{hwnd:?}: message 0x{message:04x}");
        self.procedure_entry_point(hwnd, message, wparam, lparam)
    }

    fn is_unbound(&self) -> bool {
        self.state.get() == BindingState::Unbound
    }
}

impl<A: WindowApi, H: WindowHandler<A>> Drop for NativeWindow<A, H> {
    fn drop(&mut self) {
        if self.state.get() == BindingState::Initialized {
            debug!("{:?}: dropped without dispose", self.handle.get());
            if let Err(e) = self.dispose() {
                warn!("failed to destroy window on drop: {e}");
            }
        }
    }
}

impl<A: WindowApi, H: WindowHandler<A>> core::fmt::Debug for NativeWindow<A, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeWindow")
            .field("handle", &self.handle.get())
            .field("state", &self.state.get())
            .field("base_procedure", &self.base_procedure.get())
            .finish()
    }
}
