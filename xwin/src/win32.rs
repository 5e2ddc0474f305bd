//! The Win32 implementation of [`WindowApi`].

use crate::factory::{ClassBase, CreateWindow, WindowClass};
use crate::registry;
use crate::{
    Error, InsertAfter, LParam, LResult, Message, PosFlags, Rect, Result, ShowCommand, WParam,
    WindowApi, WindowHandle, WindowLongIndex, WindowProcedure,
};
use core::ffi::c_void;
use core::mem::{size_of, zeroed};
use core::ptr::{null, null_mut};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, trace};
use widestring::U16CString;
use windows_sys::Win32::Foundation::{
    GetLastError, SetLastError, BOOL, HWND, LPARAM, LRESULT, RECT, WPARAM,
};
use windows_sys::Win32::Graphics::Gdi::HBRUSH;
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, CreateWindowExW, DefWindowProcW, DestroyWindow, GetClassInfoExW,
    GetClientRect, GetWindowRect, GetWindowThreadProcessId, LoadCursorW, RegisterClassExW,
    SetWindowPos, SetWindowTextW, ShowWindow, CREATESTRUCTW, IDC_ARROW, WNDCLASSEXW, WNDPROC,
};

/// Calls straight into `user32.dll`.
#[derive(Copy, Clone, Debug, Default)]
pub struct User32;

/// What a factory passes through `lpCreateParams`.
#[repr(C)]
struct CreateParams {
    magic: u32,
    base_procedure: isize,
}

// "xwin" in ASCII; rules out creation payloads that did not come from us.
const CREATE_PARAMS_MAGIC: u32 = 0x7877_696e;

fn hwnd(handle: WindowHandle) -> HWND {
    handle.raw() as HWND
}

fn last_error() -> Error {
    Error::Windows(unsafe { GetLastError() })
}

fn check(ok: BOOL) -> Result<()> {
    if ok != 0 {
        Ok(())
    } else {
        Err(last_error())
    }
}

fn to_wndproc(procedure: WindowProcedure) -> WNDPROC {
    // WNDPROC is a nullable function pointer, the same size as isize.
    unsafe { core::mem::transmute::<isize, WNDPROC>(procedure.0) }
}

fn from_wndproc(procedure: WNDPROC) -> WindowProcedure {
    WindowProcedure(procedure.map_or(0, |f| f as usize as isize))
}

fn rect_from(rect: &RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

#[cfg(target_pointer_width = "64")]
unsafe fn get_window_long_ptr(hwnd: HWND, index: i32) -> isize {
    windows_sys::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, index)
}

#[cfg(target_pointer_width = "32")]
unsafe fn get_window_long_ptr(hwnd: HWND, index: i32) -> isize {
    windows_sys::Win32::UI::WindowsAndMessaging::GetWindowLongW(hwnd, index) as isize
}

#[cfg(target_pointer_width = "64")]
unsafe fn set_window_long_ptr(hwnd: HWND, index: i32, value: isize) -> isize {
    windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, index, value)
}

#[cfg(target_pointer_width = "32")]
unsafe fn set_window_long_ptr(hwnd: HWND, index: i32, value: isize) -> isize {
    windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongW(hwnd, index, value as i32)
        as isize
}

impl WindowApi for User32 {
    fn destroy_window(&self, handle: WindowHandle) -> Result<()> {
        check(unsafe { DestroyWindow(hwnd(handle)) })
    }

    fn get_window_long(&self, handle: WindowHandle, index: WindowLongIndex) -> Result<isize> {
        unsafe {
            // Zero is a legitimate value, so failure is only visible through GetLastError.
            SetLastError(0);
            let value = get_window_long_ptr(hwnd(handle), index.0);
            if value == 0 && GetLastError() != 0 {
                return Err(last_error());
            }
            Ok(value)
        }
    }

    fn set_window_long(
        &self,
        handle: WindowHandle,
        index: WindowLongIndex,
        value: isize,
    ) -> Result<isize> {
        unsafe {
            SetLastError(0);
            let previous = set_window_long_ptr(hwnd(handle), index.0, value);
            if previous == 0 && GetLastError() != 0 {
                return Err(last_error());
            }
            Ok(previous)
        }
    }

    fn set_window_text(&self, handle: WindowHandle, text: &str) -> Result<()> {
        let text = U16CString::from_str_truncate(text);
        check(unsafe { SetWindowTextW(hwnd(handle), text.as_ptr()) })
    }

    fn set_window_pos(
        &self,
        handle: WindowHandle,
        insert_after: InsertAfter,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: PosFlags,
    ) -> Result<()> {
        check(unsafe {
            SetWindowPos(
                hwnd(handle),
                insert_after.raw() as HWND,
                x,
                y,
                width,
                height,
                flags.0,
            )
        })
    }

    fn get_window_rect(&self, handle: WindowHandle) -> Result<Rect> {
        unsafe {
            let mut rect: RECT = zeroed();
            check(GetWindowRect(hwnd(handle), &mut rect))?;
            Ok(rect_from(&rect))
        }
    }

    fn get_client_rect(&self, handle: WindowHandle) -> Result<Rect> {
        unsafe {
            let mut rect: RECT = zeroed();
            check(GetClientRect(hwnd(handle), &mut rect))?;
            Ok(rect_from(&rect))
        }
    }

    fn show_window(&self, handle: WindowHandle, command: ShowCommand) -> bool {
        unsafe { ShowWindow(hwnd(handle), command.0) != 0 }
    }

    fn window_thread(&self, handle: WindowHandle) -> Result<u32> {
        match unsafe { GetWindowThreadProcessId(hwnd(handle), null_mut()) } {
            0 => Err(last_error()),
            thread => Ok(thread),
        }
    }

    fn current_thread(&self) -> u32 {
        unsafe { GetCurrentThreadId() }
    }

    fn call_window_proc(&self, procedure: WindowProcedure, message: Message) -> LResult {
        unsafe {
            LResult(CallWindowProcW(
                to_wndproc(procedure),
                hwnd(message.hwnd),
                message.id,
                message.wparam.0,
                message.lparam.0,
            ))
        }
    }

    fn instance_procedure(&self) -> WindowProcedure {
        from_wndproc(Some(instance_proc))
    }

    fn default_procedure(&self) -> WindowProcedure {
        from_wndproc(Some(DefWindowProcW))
    }

    fn creation_base_procedure(&self, message: &Message) -> Option<WindowProcedure> {
        if message.lparam.0 == 0 {
            return None;
        }
        unsafe {
            let create_struct = message.lparam.0 as *const CREATESTRUCTW;
            let params = (*create_struct).lpCreateParams as *const CreateParams;
            if params.is_null() || (*params).magic != CREATE_PARAMS_MAGIC {
                return None;
            }
            Some(WindowProcedure((*params).base_procedure))
        }
    }

    fn register_class(&self, class: &WindowClass) -> Result<WindowProcedure> {
        unsafe {
            let instance = GetModuleHandleW(null());
            let class_name = U16CString::from_str_truncate(class.name());

            let mut class_ex: WNDCLASSEXW = zeroed();
            class_ex.cbSize = size_of::<WNDCLASSEXW>() as u32;

            let base = match class.base() {
                ClassBase::Default => {
                    class_ex.hCursor = LoadCursorW(null_mut(), IDC_ARROW);
                    from_wndproc(Some(DefWindowProcW))
                }
                ClassBase::Superclass(system_class) => {
                    let system_name = U16CString::from_str_truncate(system_class);
                    check(GetClassInfoExW(
                        null_mut(),
                        system_name.as_ptr(),
                        &mut class_ex,
                    ))?;
                    from_wndproc(class_ex.lpfnWndProc)
                }
            };

            class_ex.cbSize = size_of::<WNDCLASSEXW>() as u32;
            class_ex.hInstance = instance;
            class_ex.lpszClassName = class_name.as_ptr();
            class_ex.lpszMenuName = null();
            class_ex.lpfnWndProc = Some(bootstrap_proc);
            class_ex.style |= class.style_bits();
            if let Some(color) = class.background_color() {
                class_ex.hbrBackground = (color + 1) as usize as HBRUSH;
            }

            if RegisterClassExW(&class_ex) == 0 {
                return Err(last_error());
            }
            Ok(base)
        }
    }

    fn create_window(
        &self,
        class_name: &str,
        desc: &CreateWindow,
        base: WindowProcedure,
    ) -> Result<WindowHandle> {
        let class_name = U16CString::from_str_truncate(class_name);
        let text = desc.window_text().map(U16CString::from_str_truncate);
        let params = CreateParams {
            magic: CREATE_PARAMS_MAGIC,
            base_procedure: base.0,
        };

        let handle = unsafe {
            CreateWindowExW(
                desc.ex_style_bits(),
                class_name.as_ptr(),
                text.as_ref().map_or(null(), |text| text.as_ptr()),
                desc.style_bits(),
                desc.x(),
                desc.y(),
                desc.width(),
                desc.height(),
                desc.parent_handle().map_or(null_mut(), hwnd),
                null_mut(),
                GetModuleHandleW(null()),
                &params as *const CreateParams as *const c_void,
            )
        };

        if handle.is_null() {
            return Err(last_error());
        }
        Ok(WindowHandle::from_raw(handle as isize))
    }
}

// A panic cannot unwind into user32, so it ends the process here instead.
fn guard(f: impl FnOnce() -> LResult) -> LRESULT {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result.0,
        Err(_) => {
            error!("panic in window procedure");
            std::process::abort();
        }
    }
}

/// Installed in `GWLP_WNDPROC` of every bound window.
unsafe extern "system" fn instance_proc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    guard(|| {
        registry::deliver(
            &User32,
            WindowHandle::from_raw(hwnd as isize),
            message,
            WParam(wparam),
            LParam(lparam),
        )
    })
}

/// Class procedure of factory classes. Only sees messages until the window's
/// binding swaps in `instance_proc`.
unsafe extern "system" fn bootstrap_proc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    trace!("bootstrap_proc: message 0x{message:04x}");
    guard(|| {
        registry::deliver_creation(
            &User32,
            WindowHandle::from_raw(hwnd as isize),
            message,
            WParam(wparam),
            LParam(lparam),
        )
    })
}
