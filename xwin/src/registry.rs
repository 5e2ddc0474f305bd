//! Per-thread map from window handle to the binding that owns it.
//!
//! Every bound window shares one installed procedure, so that procedure
//! needs a way back to the Rust object for a given handle. Windows are
//! serviced on the thread that created them, which makes a thread-local map
//! sufficient.

use crate::{
    Error, LParam, LResult, Message, Result, WParam, WindowApi, WindowHandle, WindowProcedure,
    WM_NCDESTROY,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::trace;

/// The type-erased face of a binding that the procedures call into.
pub(crate) trait Bounced {
    fn wndproc(&self, hwnd: WindowHandle, message: u32, wparam: WParam, lparam: LParam)
        -> LResult;

    fn is_unbound(&self) -> bool;
}

struct Entry {
    binding: Weak<dyn Bounced>,
    base: WindowProcedure,
}

thread_local! {
    static BOUND: RefCell<HashMap<WindowHandle, Entry>> = RefCell::new(HashMap::new());
    static PENDING: RefCell<Vec<Rc<dyn Bounced>>> = const { RefCell::new(Vec::new()) };
}

pub(crate) enum Route {
    Bound(Rc<dyn Bounced>),
    /// The binding has let go; messages continue to the captured procedure.
    Detached(WindowProcedure),
    Unknown,
}

pub(crate) fn is_bound(hwnd: WindowHandle) -> bool {
    BOUND.with(|bound| bound.borrow().contains_key(&hwnd))
}

pub(crate) fn claim(
    hwnd: WindowHandle,
    binding: Weak<dyn Bounced>,
    base: WindowProcedure,
) -> Result<()> {
    BOUND.with(|bound| {
        let mut bound = bound.borrow_mut();
        if bound.contains_key(&hwnd) {
            return Err(Error::AlreadyBound(hwnd));
        }
        bound.insert(hwnd, Entry { binding, base });
        Ok(())
    })
}

/// Stops routing messages to the binding, but keeps the entry so the
/// window's remaining messages reach its base procedure. The entry goes away
/// with the window's `WM_NCDESTROY`.
pub(crate) fn detach(hwnd: WindowHandle) {
    BOUND.with(|bound| {
        if let Some(entry) = bound.borrow_mut().get_mut(&hwnd) {
            entry.binding = Weak::<Detached>::new() as Weak<dyn Bounced>;
        }
    })
}

pub(crate) fn release(hwnd: WindowHandle) {
    BOUND.with(|bound| {
        bound.borrow_mut().remove(&hwnd);
    })
}

pub(crate) fn route(hwnd: WindowHandle) -> Route {
    BOUND.with(|bound| match bound.borrow().get(&hwnd) {
        Some(entry) => match entry.binding.upgrade() {
            Some(binding) => Route::Bound(binding),
            None => Route::Detached(entry.base),
        },
        None => Route::Unknown,
    })
}

/// Runs `f` with `binding` marked as the window currently being created on
/// this thread. Creation can nest, so this is a stack.
pub(crate) fn with_pending<R>(binding: Rc<dyn Bounced>, f: impl FnOnce() -> R) -> R {
    struct PopOnDrop;

    impl Drop for PopOnDrop {
        fn drop(&mut self) {
            PENDING.with(|pending| {
                pending.borrow_mut().pop();
            })
        }
    }

    PENDING.with(|pending| pending.borrow_mut().push(binding));
    let _pop = PopOnDrop;
    f()
}

/// The innermost binding under creation, if it has not seen its creation
/// message yet.
pub(crate) fn pending() -> Option<Rc<dyn Bounced>> {
    PENDING.with(|pending| {
        pending
            .borrow()
            .last()
            .filter(|binding| binding.is_unbound())
            .cloned()
    })
}

/// Hands one message to whoever is responsible for `hwnd`.
///
/// No registry borrow is held while the message is processed, so procedures
/// are free to re-enter.
#[cfg_attr(not(any(windows, test)), allow(dead_code))]
pub(crate) fn deliver<A: WindowApi>(
    api: &A,
    hwnd: WindowHandle,
    message: u32,
    wparam: WParam,
    lparam: LParam,
) -> LResult {
    match route(hwnd) {
        Route::Bound(binding) => binding.wndproc(hwnd, message, wparam, lparam),
        Route::Detached(base) => {
            trace!("{hwnd:?}: message 0x{message:04x} to detached base procedure");
            let result = api.call_window_proc(base, Message::new(hwnd, message, wparam, lparam));
            if message == WM_NCDESTROY {
                release(hwnd);
            }
            result
        }
        Route::Unknown => api.call_window_proc(
            api.default_procedure(),
            Message::new(hwnd, message, wparam, lparam),
        ),
    }
}

/// Like [`deliver`], but gives a window that is still being created to its
/// pending binding.
#[cfg_attr(not(any(windows, test)), allow(dead_code))]
pub(crate) fn deliver_creation<A: WindowApi>(
    api: &A,
    hwnd: WindowHandle,
    message: u32,
    wparam: WParam,
    lparam: LParam,
) -> LResult {
    if !is_bound(hwnd) {
        if let Some(binding) = pending() {
            return binding.wndproc(hwnd, message, wparam, lparam);
        }
    }
    deliver(api, hwnd, message, wparam, lparam)
}

// Only exists to give `detach` a concrete type to build an empty `Weak` from.
struct Detached;

impl Bounced for Detached {
    fn wndproc(&self, _: WindowHandle, _: u32, _: WParam, _: LParam) -> LResult {
        LResult(0)
    }

    fn is_unbound(&self) -> bool {
        false
    }
}
