//! Opens a window with one superclassed button, logs a few messages, and
//! quits when the window is closed.
//!
//! Run with `RUST_LOG=debug` to see the binding lifecycle.

#[cfg(windows)]
mod demo {
    use tracing::info;
    use tracing_subscriber::EnvFilter;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, PostQuitMessage, TranslateMessage, MSG,
    };
    use xwin::*;

    struct MainWindow;

    impl WindowHandler<User32> for MainWindow {
        fn on_ready(&self, window: &Window<Self>) {
            info!("main window bound: {:?}", window.handle());
        }

        fn dispatch(&self, window: &Window<Self>, message: Message) -> LResult {
            match message.id {
                WM_SIZE => {
                    info!(
                        "client area is now {}x{}",
                        loword(message.lparam),
                        hiword(message.lparam)
                    );
                }
                WM_CLOSE => {
                    info!("closing");
                    unsafe { PostQuitMessage(0) };
                }
                _ => {}
            }
            window.call_base(message)
        }
    }

    struct ClickLogger;

    impl WindowHandler<User32> for ClickLogger {
        fn dispatch(&self, window: &Window<Self>, message: Message) -> LResult {
            if message.is(WM_LBUTTONDOWN) {
                let (x, y) = (get_x_lparam(message.lparam), get_y_lparam(message.lparam));
                info!("button pressed at {x},{y}");
            }
            window.call_base(message)
        }
    }

    fn run_message_loop() {
        unsafe {
            let mut msg: MSG = core::mem::zeroed();
            while GetMessageW(&mut msg, core::ptr::null_mut(), 0, 0) > 0 {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    pub fn run() -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();

        let windows = WindowFactory::new(User32, WindowClass::new("xwin.hello"));
        let window = windows.create(
            &CreateWindow::new().text("Hello, xwin").size(640, 480),
            MainWindow,
        )?;

        let buttons = WindowFactory::new(
            User32,
            WindowClass::superclass("xwin.hello.button", "BUTTON"),
        );
        let parent = window.handle().ok_or(Error::NotInitialized)?;
        let button = buttons.create(
            &CreateWindow::new()
                .text("Press me")
                .style(style::CHILD | style::VISIBLE | style::TAB_STOP)
                .position(20, 20)
                .size(140, 32)
                .parent(parent),
            ClickLogger,
        )?;

        window.show()?;
        run_message_loop();

        // Closing the window destroyed both already; these only confirm it.
        button.dispose()?;
        window.dispose()?;
        Ok(())
    }
}

#[cfg(windows)]
fn main() -> xwin::Result<()> {
    demo::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("this demo needs Windows");
}
