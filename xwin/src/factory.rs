//! Creates windows that are bound from their very first message.
//!
//! A factory owns one window class. The class procedure is a bootstrap
//! trampoline: while a window is being created, its messages go to the
//! binding that asked for it, and `WM_NCCREATE` carries the class's base
//! procedure to that binding.

use crate::registry::{self, Bounced};
use crate::window::WindowInitializable;
use crate::{
    style, Error, NativeWindow, Result, WindowApi, WindowHandle, WindowHandler, WindowProcedure,
    USE_DEFAULT,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Class styles (`CS_*`).
pub mod class_style {
    pub const VREDRAW: u32 = 0x0001;
    pub const HREDRAW: u32 = 0x0002;
    pub const DBLCLKS: u32 = 0x0008;
    pub const OWNDC: u32 = 0x0020;
}

/// `COLOR_WINDOW`, the default class background.
const COLOR_WINDOW: i32 = 5;

/// Where windows of a class send the messages their handler passes on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClassBase {
    /// The OS default window procedure.
    Default,
    /// The procedure of an existing class, such as `BUTTON` or `EDIT`.
    Superclass(String),
}

#[derive(Clone, Debug)]
pub struct WindowClass {
    name: String,
    style: u32,
    base: ClassBase,
    background: Option<i32>,
}

impl WindowClass {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            style: class_style::HREDRAW | class_style::VREDRAW,
            base: ClassBase::Default,
            background: Some(COLOR_WINDOW),
        }
    }

    /// A class that behaves like `system_class` underneath its handler.
    /// The system class's own style and background are kept.
    pub fn superclass(name: &str, system_class: &str) -> Self {
        Self {
            name: name.to_string(),
            style: 0,
            base: ClassBase::Superclass(system_class.to_string()),
            background: None,
        }
    }

    #[must_use]
    pub fn style(mut self, style: u32) -> Self {
        self.style = style;
        self
    }

    /// Background brush as a system color index (`COLOR_*`).
    #[must_use]
    pub fn background(mut self, color: Option<i32>) -> Self {
        self.background = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style_bits(&self) -> u32 {
        self.style
    }

    pub fn base(&self) -> &ClassBase {
        &self.base
    }

    pub fn background_color(&self) -> Option<i32> {
        self.background
    }
}

/// Describes one window to create.
#[derive(Clone, Debug)]
pub struct CreateWindow {
    text: Option<String>,
    position: Option<(i32, i32)>,
    size: Option<(i32, i32)>,
    style: u32,
    ex_style: u32,
    parent: Option<WindowHandle>,
}

impl Default for CreateWindow {
    fn default() -> Self {
        Self {
            text: None,
            position: None,
            size: None,
            style: style::OVERLAPPED_WINDOW,
            ex_style: 0,
            parent: None,
        }
    }
}

impl CreateWindow {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    #[must_use]
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Some((width, height));
        self
    }

    #[must_use]
    pub fn style(mut self, style: u32) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn ex_style(mut self, ex_style: u32) -> Self {
        self.ex_style = ex_style;
        self
    }

    #[must_use]
    pub fn parent(mut self, parent: WindowHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn window_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn x(&self) -> i32 {
        self.position.map_or(USE_DEFAULT, |(x, _)| x)
    }

    pub fn y(&self) -> i32 {
        self.position.map_or(USE_DEFAULT, |(_, y)| y)
    }

    pub fn width(&self) -> i32 {
        self.size.map_or(USE_DEFAULT, |(w, _)| w)
    }

    pub fn height(&self) -> i32 {
        self.size.map_or(USE_DEFAULT, |(_, h)| h)
    }

    pub fn style_bits(&self) -> u32 {
        self.style
    }

    pub fn ex_style_bits(&self) -> u32 {
        self.ex_style
    }

    pub fn parent_handle(&self) -> Option<WindowHandle> {
        self.parent
    }
}

pub struct WindowFactory<A: WindowApi> {
    api: A,
    class: WindowClass,
    base_procedure: Cell<Option<WindowProcedure>>,
    me: Weak<WindowFactory<A>>,
}

impl<A: WindowApi> WindowFactory<A> {
    pub fn new(api: A, class: WindowClass) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            api,
            class,
            base_procedure: Cell::new(None),
            me: me.clone(),
        })
    }

    pub fn class(&self) -> &WindowClass {
        &self.class
    }

    /// Creates a window and binds `handler` to it.
    ///
    /// The returned window has already seen `WM_NCCREATE` and `WM_CREATE`.
    pub fn create<H>(&self, desc: &CreateWindow, handler: H) -> Result<Rc<NativeWindow<A, H>>>
    where
        H: WindowHandler<A>,
    {
        let base = self.register_class_lazy()?;

        let window = NativeWindow::new(self.api.clone(), handler);
        window.set_factory(self.me.clone());
        window.set_class_base(base);

        let pending: Rc<dyn Bounced> = window.clone();
        let hwnd = registry::with_pending(pending, || {
            self.api.create_window(&self.class.name, desc, base)
        })?;

        if window.handle() != Some(hwnd) {
            warn!("{hwnd:?}: created, but its binding never saw WM_NCCREATE");
            if let Err(e) = self.api.destroy_window(hwnd) {
                warn!("{hwnd:?}: failed to destroy unbound window: {e}");
            }
            return Err(Error::CreationIncomplete);
        }

        debug!("{hwnd:?}: created as '{}'", self.class.name);
        Ok(window)
    }

    fn register_class_lazy(&self) -> Result<WindowProcedure> {
        if let Some(base) = self.base_procedure.get() {
            return Ok(base);
        }

        let base = self.api.register_class(&self.class)?;
        debug!("registered class '{}', base {base:?}", self.class.name);
        self.base_procedure.set(Some(base));
        Ok(base)
    }
}
