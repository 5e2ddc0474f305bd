//! Window messages as they arrive at a window procedure.

use crate::{LParam, WParam, WindowHandle};

pub const WM_CREATE: u32 = 0x0001;
pub const WM_DESTROY: u32 = 0x0002;
pub const WM_MOVE: u32 = 0x0003;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_SETTEXT: u32 = 0x000C;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_SHOWWINDOW: u32 = 0x0018;
pub const WM_GETMINMAXINFO: u32 = 0x0024;
pub const WM_WINDOWPOSCHANGED: u32 = 0x0047;
pub const WM_NCCREATE: u32 = 0x0081;
pub const WM_NCDESTROY: u32 = 0x0082;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_USER: u32 = 0x0400;

/// The four values the OS hands to a window procedure.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Message {
    pub hwnd: WindowHandle,
    pub id: u32,
    pub wparam: WParam,
    pub lparam: LParam,
}

impl Message {
    pub fn new(hwnd: WindowHandle, id: u32, wparam: WParam, lparam: LParam) -> Self {
        Self {
            hwnd,
            id,
            wparam,
            lparam,
        }
    }

    pub fn is(&self, id: u32) -> bool {
        self.id == id
    }
}

// WM_SIZE packs the client size into lparam; mouse messages pack signed coordinates.

pub fn loword(lparam: LParam) -> u16 {
    (lparam.0 & 0xffff) as u16
}

pub fn hiword(lparam: LParam) -> u16 {
    ((lparam.0 >> 16) & 0xffff) as u16
}

pub fn get_x_lparam(lparam: LParam) -> i16 {
    loword(lparam) as i16
}

pub fn get_y_lparam(lparam: LParam) -> i16 {
    hiword(lparam) as i16
}
