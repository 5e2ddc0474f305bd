//! A recording stand-in for the OS windowing service.
//!
//! It keeps just enough window state to answer queries, and delivers
//! messages the way the OS does: to whatever procedure the window currently
//! has installed.

use crate::factory::{ClassBase, CreateWindow, WindowClass};
use crate::registry;
use crate::{
    Error, InsertAfter, LParam, LResult, Message, PosFlags, Rect, Result, ShowCommand, WParam,
    WindowApi, WindowHandle, WindowLongIndex, WindowProcedure, WM_CREATE, WM_DESTROY,
    WM_GETMINMAXINFO, WM_NCCREATE, WM_NCDESTROY,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicIsize, Ordering};

pub(crate) const INSTANCE_PROC: WindowProcedure = WindowProcedure(0x1_0000);
pub(crate) const DEFAULT_PROC: WindowProcedure = WindowProcedure(0x2_0000);
pub(crate) const BOOTSTRAP_PROC: WindowProcedure = WindowProcedure(0x3_0000);
pub(crate) const SUPERCLASS_PROC: WindowProcedure = WindowProcedure(0x4_0000);

/// The thread every fake window belongs to unless told otherwise.
pub(crate) const UI_THREAD: u32 = 1;

const ERROR_INVALID_WINDOW_HANDLE: u32 = 1400;

// Handles are unique across the whole test run, since the registry is keyed by them.
static NEXT_HANDLE: AtomicIsize = AtomicIsize::new(0x10_0000);

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    DestroyWindow(WindowHandle),
    GetWindowLong(WindowHandle, WindowLongIndex),
    SetWindowLong(WindowHandle, WindowLongIndex, isize),
    SetWindowText(WindowHandle, String),
    SetWindowPos {
        hwnd: WindowHandle,
        insert_after: InsertAfter,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: PosFlags,
    },
    GetWindowRect(WindowHandle),
    GetClientRect(WindowHandle),
    GetWindowThread(WindowHandle),
    ShowWindow(WindowHandle, ShowCommand),
    CallWindowProc(WindowProcedure, Message),
    RegisterClass(String),
    CreateWindow(String),
}

struct FakeWindow {
    longs: HashMap<WindowLongIndex, isize>,
    text: String,
    rect: Rect,
    visible: bool,
    thread: u32,
}

impl Default for FakeWindow {
    fn default() -> Self {
        Self {
            longs: HashMap::new(),
            text: String::new(),
            rect: Rect::default(),
            visible: false,
            thread: UI_THREAD,
        }
    }
}

#[derive(Default)]
struct FakeOs {
    calls: RefCell<Vec<Call>>,
    windows: RefCell<HashMap<WindowHandle, FakeWindow>>,
    failure: Cell<Option<u32>>,
    proc_result: Cell<isize>,
    creation_base: Cell<Option<WindowProcedure>>,
    skip_creation_message: Cell<bool>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    os: Rc<FakeOs>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes a window that already exists, with `procedure` installed.
    pub(crate) fn spawn_window(&self, procedure: WindowProcedure) -> WindowHandle {
        let hwnd = WindowHandle::from_raw(NEXT_HANDLE.fetch_add(0x10, Ordering::Relaxed));
        let mut window = FakeWindow::default();
        window.longs.insert(WindowLongIndex::WNDPROC, procedure.0);
        self.os.windows.borrow_mut().insert(hwnd, window);
        hwnd
    }

    pub(crate) fn set_window_thread(&self, hwnd: WindowHandle, thread: u32) {
        self.with_window(hwnd, |window| window.thread = thread);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.os.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.os.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.os.calls.borrow().iter().filter(|call| f(call)).count()
    }

    /// Makes every fallible call fail with `code` until cleared.
    pub(crate) fn fail_with(&self, code: Option<u32>) {
        self.os.failure.set(code);
    }

    pub(crate) fn set_proc_result(&self, result: isize) {
        self.os.proc_result.set(result);
    }

    pub(crate) fn set_creation_base(&self, base: Option<WindowProcedure>) {
        self.os.creation_base.set(base);
    }

    pub(crate) fn skip_creation_message(&self, skip: bool) {
        self.os.skip_creation_message.set(skip);
    }

    pub(crate) fn is_alive(&self, hwnd: WindowHandle) -> bool {
        self.os.windows.borrow().contains_key(&hwnd)
    }

    /// Reads a window field without recording a call.
    pub(crate) fn window_long(&self, hwnd: WindowHandle, index: WindowLongIndex) -> isize {
        self.os
            .windows
            .borrow()
            .get(&hwnd)
            .and_then(|window| window.longs.get(&index).copied())
            .unwrap_or(0)
    }

    pub(crate) fn window_text(&self, hwnd: WindowHandle) -> String {
        self.os
            .windows
            .borrow()
            .get(&hwnd)
            .map(|window| window.text.clone())
            .unwrap_or_default()
    }

    /// Delivers a message to the window's installed procedure.
    pub(crate) fn send(
        &self,
        hwnd: WindowHandle,
        message: u32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        let procedure = WindowProcedure(self.window_long(hwnd, WindowLongIndex::WNDPROC));
        if procedure == INSTANCE_PROC {
            registry::deliver(self, hwnd, message, wparam, lparam)
        } else if procedure == BOOTSTRAP_PROC {
            registry::deliver_creation(self, hwnd, message, wparam, lparam)
        } else {
            self.call_window_proc(procedure, Message::new(hwnd, message, wparam, lparam))
        }
    }

    /// Destroys a window the way closing it from the UI would.
    pub(crate) fn destroy_by_system(&self, hwnd: WindowHandle) {
        self.tear_down(hwnd);
    }

    fn tear_down(&self, hwnd: WindowHandle) {
        self.send(hwnd, WM_DESTROY, WParam(0), LParam(0));
        self.send(hwnd, WM_NCDESTROY, WParam(0), LParam(0));
        self.os.windows.borrow_mut().remove(&hwnd);
    }

    fn record(&self, call: Call) {
        self.os.calls.borrow_mut().push(call);
    }

    fn check(&self, hwnd: WindowHandle) -> Result<()> {
        if let Some(code) = self.os.failure.get() {
            return Err(Error::Windows(code));
        }
        if !self.is_alive(hwnd) {
            return Err(Error::Windows(ERROR_INVALID_WINDOW_HANDLE));
        }
        Ok(())
    }

    fn with_window<R>(&self, hwnd: WindowHandle, f: impl FnOnce(&mut FakeWindow) -> R) -> R {
        let mut windows = self.os.windows.borrow_mut();
        let window = windows.entry(hwnd).or_default();
        f(window)
    }
}

impl WindowApi for FakeApi {
    fn destroy_window(&self, hwnd: WindowHandle) -> Result<()> {
        self.record(Call::DestroyWindow(hwnd));
        self.check(hwnd)?;
        self.tear_down(hwnd);
        Ok(())
    }

    fn get_window_long(&self, hwnd: WindowHandle, index: WindowLongIndex) -> Result<isize> {
        self.record(Call::GetWindowLong(hwnd, index));
        self.check(hwnd)?;
        Ok(self.window_long(hwnd, index))
    }

    fn set_window_long(
        &self,
        hwnd: WindowHandle,
        index: WindowLongIndex,
        value: isize,
    ) -> Result<isize> {
        self.record(Call::SetWindowLong(hwnd, index, value));
        self.check(hwnd)?;
        Ok(self.with_window(hwnd, |window| {
            window.longs.insert(index, value).unwrap_or(0)
        }))
    }

    fn set_window_text(&self, hwnd: WindowHandle, text: &str) -> Result<()> {
        self.record(Call::SetWindowText(hwnd, text.to_string()));
        self.check(hwnd)?;
        self.with_window(hwnd, |window| window.text = text.to_string());
        Ok(())
    }

    fn set_window_pos(
        &self,
        hwnd: WindowHandle,
        insert_after: InsertAfter,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: PosFlags,
    ) -> Result<()> {
        self.record(Call::SetWindowPos {
            hwnd,
            insert_after,
            x,
            y,
            width,
            height,
            flags,
        });
        self.check(hwnd)?;
        self.with_window(hwnd, |window| {
            let rect = &mut window.rect;
            let (old_width, old_height) = (rect.width(), rect.height());
            if !flags.contains(PosFlags::NOMOVE) {
                rect.left = x;
                rect.top = y;
            }
            let (width, height) = if flags.contains(PosFlags::NOSIZE) {
                (old_width, old_height)
            } else {
                (width, height)
            };
            rect.right = rect.left + width;
            rect.bottom = rect.top + height;
        });
        Ok(())
    }

    fn get_window_rect(&self, hwnd: WindowHandle) -> Result<Rect> {
        self.record(Call::GetWindowRect(hwnd));
        self.check(hwnd)?;
        Ok(self.with_window(hwnd, |window| window.rect))
    }

    fn get_client_rect(&self, hwnd: WindowHandle) -> Result<Rect> {
        self.record(Call::GetClientRect(hwnd));
        self.check(hwnd)?;
        Ok(self.with_window(hwnd, |window| Rect {
            left: 0,
            top: 0,
            right: window.rect.width(),
            bottom: window.rect.height(),
        }))
    }

    fn show_window(&self, hwnd: WindowHandle, command: ShowCommand) -> bool {
        self.record(Call::ShowWindow(hwnd, command));
        self.with_window(hwnd, |window| {
            core::mem::replace(&mut window.visible, command != ShowCommand::HIDE)
        })
    }

    fn window_thread(&self, hwnd: WindowHandle) -> Result<u32> {
        self.record(Call::GetWindowThread(hwnd));
        self.check(hwnd)?;
        Ok(self.with_window(hwnd, |window| window.thread))
    }

    fn current_thread(&self) -> u32 {
        UI_THREAD
    }

    fn call_window_proc(&self, procedure: WindowProcedure, message: Message) -> LResult {
        self.record(Call::CallWindowProc(procedure, message));
        if message.id == WM_NCCREATE {
            // Any real procedure accepts creation.
            return LResult(1);
        }
        LResult(self.os.proc_result.get())
    }

    fn instance_procedure(&self) -> WindowProcedure {
        INSTANCE_PROC
    }

    fn default_procedure(&self) -> WindowProcedure {
        DEFAULT_PROC
    }

    fn creation_base_procedure(&self, _message: &Message) -> Option<WindowProcedure> {
        self.os.creation_base.get()
    }

    fn register_class(&self, class: &WindowClass) -> Result<WindowProcedure> {
        self.record(Call::RegisterClass(class.name().to_string()));
        if let Some(code) = self.os.failure.get() {
            return Err(Error::Windows(code));
        }
        Ok(match class.base() {
            ClassBase::Default => DEFAULT_PROC,
            ClassBase::Superclass(_) => SUPERCLASS_PROC,
        })
    }

    fn create_window(
        &self,
        class_name: &str,
        desc: &CreateWindow,
        base: WindowProcedure,
    ) -> Result<WindowHandle> {
        self.record(Call::CreateWindow(class_name.to_string()));
        if let Some(code) = self.os.failure.get() {
            return Err(Error::Windows(code));
        }

        let hwnd = self.spawn_window(BOOTSTRAP_PROC);
        self.with_window(hwnd, |window| {
            window.text = desc.window_text().unwrap_or_default().to_string();
            window.visible = desc.style_bits() & crate::style::VISIBLE != 0;
        });

        if self.os.skip_creation_message.get() {
            return Ok(hwnd);
        }

        if desc.style_bits() & crate::style::CHILD == 0 {
            // Top-level windows are asked for their size limits before anything else.
            self.send(hwnd, WM_GETMINMAXINFO, WParam(0), LParam(0));
        }

        self.os.creation_base.set(Some(base));
        let accepted = self.send(hwnd, WM_NCCREATE, WParam(0), LParam(0));
        if accepted.0 == 0 {
            self.os.windows.borrow_mut().remove(&hwnd);
            return Err(Error::Windows(0));
        }
        self.send(hwnd, WM_CREATE, WParam(0), LParam(0));
        Ok(hwnd)
    }
}
