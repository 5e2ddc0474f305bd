//! Plain values that cross the windowing API boundary.

use core::ops::{BitOr, BitOrAssign};

/// Opaque OS identifier of one native window.
///
/// This is only an identifier. Ownership of the underlying window lives in
/// [`NativeWindow`](crate::NativeWindow).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> isize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "hwnd {:#x}", self.0)
    }
}

/// Address of a window procedure, as stored in the `GWLP_WNDPROC` slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowProcedure(pub isize);

impl WindowProcedure {
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Debug for WindowProcedure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "wndproc {:#x}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct WParam(pub usize);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LParam(pub isize);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LResult(pub isize);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Index of a window long pointer field (`GWLP_*` / `GWL_*`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WindowLongIndex(pub i32);

impl WindowLongIndex {
    pub const WNDPROC: Self = Self(-4);
    pub const HINSTANCE: Self = Self(-6);
    pub const HWNDPARENT: Self = Self(-8);
    pub const ID: Self = Self(-12);
    pub const STYLE: Self = Self(-16);
    pub const EXSTYLE: Self = Self(-20);
    pub const USERDATA: Self = Self(-21);
}

/// `SWP_*` flags for `SetWindowPos`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PosFlags(pub u32);

impl PosFlags {
    pub const NOSIZE: Self = Self(0x0001);
    pub const NOMOVE: Self = Self(0x0002);
    pub const NOZORDER: Self = Self(0x0004);
    pub const NOREDRAW: Self = Self(0x0008);
    pub const NOACTIVATE: Self = Self(0x0010);
    pub const FRAMECHANGED: Self = Self(0x0020);
    pub const SHOWWINDOW: Self = Self(0x0040);
    pub const HIDEWINDOW: Self = Self(0x0080);
    pub const NOCOPYBITS: Self = Self(0x0100);
    pub const NOOWNERZORDER: Self = Self(0x0200);
    pub const NOSENDCHANGING: Self = Self(0x0400);
    pub const DEFERERASE: Self = Self(0x2000);
    pub const ASYNCWINDOWPOS: Self = Self(0x4000);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PosFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PosFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// `SW_*` commands for `ShowWindow`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ShowCommand(pub i32);

impl ShowCommand {
    pub const HIDE: Self = Self(0);
    pub const SHOWNORMAL: Self = Self(1);
    pub const SHOWMINIMIZED: Self = Self(2);
    pub const MAXIMIZE: Self = Self(3);
    pub const SHOWNOACTIVATE: Self = Self(4);
    pub const SHOW: Self = Self(5);
    pub const MINIMIZE: Self = Self(6);
    pub const SHOWMINNOACTIVE: Self = Self(7);
    pub const SHOWNA: Self = Self(8);
    pub const RESTORE: Self = Self(9);
    pub const SHOWDEFAULT: Self = Self(10);
    pub const FORCEMINIMIZE: Self = Self(11);
}

/// Where a window goes in the z-order when it is repositioned.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InsertAfter {
    Top,
    Bottom,
    TopMost,
    NoTopMost,
    Window(WindowHandle),
}

impl InsertAfter {
    /// The `hWndInsertAfter` value the OS expects.
    pub fn raw(self) -> isize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
            Self::TopMost => -1,
            Self::NoTopMost => -2,
            Self::Window(handle) => handle.raw(),
        }
    }
}

/// Window styles (`WS_*`) used by the window builders.
pub mod style {
    pub const OVERLAPPED_WINDOW: u32 = 0x00CF_0000;
    pub const VISIBLE: u32 = 0x1000_0000;
    pub const CHILD: u32 = 0x4000_0000;
    pub const CLIP_SIBLINGS: u32 = 0x0400_0000;
    pub const CLIP_CHILDREN: u32 = 0x0200_0000;
    pub const TAB_STOP: u32 = 0x0001_0000;
}

/// Lets the OS pick a position or size (`CW_USEDEFAULT`).
pub const USE_DEFAULT: i32 = 0x8000_0000_u32 as i32;
